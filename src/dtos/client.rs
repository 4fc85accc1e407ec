use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::{ContractsError, ContractsResult},
    models::{Client, ClientChanges, ClientType, NewClient},
};

use super::is_blank;

/// Input DTO for `POST /clients/create-client`.
///
/// The client is a `COMPANY` when `companyIdentifier` is present and not blank, otherwise a
/// `PERSON`. Persons must carry a `birthdate`; companies must not.
///
/// ## Example
/// ```json
/// {
///   "phone": "+41 79 123 45 67",
///   "email": "jane.doe@example.com",
///   "name": "Jane Doe",
///   "birthdate": "1990-04-12"
/// }
/// ```
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateClientDto {
    /// 7 to 20 characters of digits, spaces, `+`, `(`, `)`, `.` or `-`.
    pub phone: Option<String>,
    /// Unique across clients, compared case-insensitively.
    pub email: Option<String>,
    /// Max 255 characters.
    pub name: Option<String>,
    /// Required for persons, rejected for companies.
    pub birthdate: Option<NaiveDate>,
    /// Max 255 characters. A non-blank value makes the client a company.
    pub company_identifier: Option<String>,
}

impl CreateClientDto {
    pub fn client_type(&self) -> ClientType {
        if is_blank(self.company_identifier.as_deref()) {
            ClientType::Person
        } else {
            ClientType::Company
        }
    }

    /// Apply the person/company rules and build the row to insert.
    pub fn resolve(self) -> ContractsResult<NewClient> {
        let client_type = self.client_type();
        match (client_type, self.birthdate) {
            (ClientType::Company, Some(_)) => {
                return Err(ContractsError::Validation(
                    "Companies must not include a birthdate.".to_string(),
                ));
            }
            (ClientType::Person, None) => {
                return Err(ContractsError::Validation(
                    "Persons must include a birthdate.".to_string(),
                ));
            }
            _ => {}
        }

        Ok(NewClient {
            client_type,
            email: self.email.unwrap_or_default().trim().to_string(),
            phone: self.phone.unwrap_or_default().trim().to_string(),
            name: self.name.unwrap_or_default().trim().to_string(),
            birthdate: match client_type {
                ClientType::Person => self.birthdate,
                ClientType::Company => None,
            },
            company_identifier: match client_type {
                ClientType::Company => self.company_identifier.map(|c| c.trim().to_string()),
                ClientType::Person => None,
            },
        })
    }
}

/// Input DTO for `PUT /clients/update-client`. Overwrites the contact fields of a client.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClientDto {
    /// Identifier of the client to update.
    pub id: Option<i64>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub name: Option<String>,
}

impl UpdateClientDto {
    /// Split into the target id and the changeset, stamping `updated_at`.
    pub fn resolve(self, now: DateTime<Utc>) -> (i64, ClientChanges) {
        (
            self.id.unwrap_or_default(),
            ClientChanges {
                email: self.email.unwrap_or_default().trim().to_string(),
                phone: self.phone.unwrap_or_default().trim().to_string(),
                name: self.name.unwrap_or_default().trim().to_string(),
                updated_at: now,
            },
        )
    }
}

/// A stored client.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientDto {
    pub id: i64,
    pub client_type: ClientType,
    pub email: String,
    pub phone: String,
    pub name: String,
    /// Null for companies.
    pub birthdate: Option<NaiveDate>,
    /// Null for persons.
    pub company_identifier: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Client> for ClientDto {
    fn from(client: Client) -> Self {
        Self {
            id: client.id,
            client_type: client.client_type,
            email: client.email,
            phone: client.phone,
            name: client.name,
            birthdate: client.birthdate,
            company_identifier: client.company_identifier,
            created_at: client.created_at,
            updated_at: client.updated_at,
        }
    }
}
