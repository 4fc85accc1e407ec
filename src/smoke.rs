//! Black-box checks against a running server.
//!
//! Each scenario truncates both tables, seeds rows over a direct PostgreSQL connection,
//! calls the HTTP API and checks the response and the resulting rows.

use std::process::ExitCode;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use futures_util::future::BoxFuture;
use reqwest::StatusCode;
use serde_json::{Value, json};
use thiserror::Error;

const READINESS_ATTEMPTS: u32 = 30;
const READINESS_DELAY: Duration = Duration::from_millis(500);

#[derive(Error, Debug)]
enum SmokeError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("database error: {0}")]
    Db(#[from] tokio_postgres::Error),

    #[error("check failed: {0}")]
    Check(String),
}

fn ensure(condition: bool, message: impl Into<String>) -> Result<(), SmokeError> {
    if condition {
        Ok(())
    } else {
        Err(SmokeError::Check(message.into()))
    }
}

#[derive(Debug)]
struct SmokeConfig {
    api_base_url: String,
    database_url: String,
}

impl SmokeConfig {
    fn from_env() -> Result<Self, SmokeError> {
        let api_base_url = std::env::var("API_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:8884".to_string())
            .trim_end_matches('/')
            .to_string();

        if let Ok(database_url) = std::env::var("DATABASE_URL") {
            return Ok(Self {
                api_base_url,
                database_url,
            });
        }

        let keys = [
            "POSTGRES_HOST",
            "POSTGRES_PORT",
            "POSTGRES_DB",
            "POSTGRES_USER",
            "POSTGRES_PASSWORD",
        ];
        let values: Vec<Option<String>> = keys.iter().map(|k| std::env::var(k).ok()).collect();
        let missing: Vec<&str> = keys
            .iter()
            .zip(&values)
            .filter(|(_, v)| v.is_none())
            .map(|(k, _)| *k)
            .collect();
        if !missing.is_empty() {
            return Err(SmokeError::Config(format!(
                "DATABASE_URL is not set and these keys are missing: {}",
                missing.join(", ")
            )));
        }

        let value = |i: usize| values[i].clone().unwrap_or_default();
        Ok(Self {
            api_base_url,
            database_url: format!(
                "postgres://{}:{}@{}:{}/{}",
                value(3),
                value(4),
                value(0),
                value(1),
                value(2)
            ),
        })
    }
}

struct Smoke {
    http: reqwest::Client,
    db: tokio_postgres::Client,
    base_url: String,
    today: NaiveDate,
}

impl Smoke {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn reset(&self) -> Result<(), SmokeError> {
        self.db
            .batch_execute("TRUNCATE contracts, clients RESTART IDENTITY CASCADE")
            .await?;
        Ok(())
    }

    async fn seed_person(&self, email: &str) -> Result<i64, SmokeError> {
        let row = self
            .db
            .query_one(
                "INSERT INTO clients (client_type, email, phone, name, birthdate) \
                 VALUES ('PERSON', $1, '+41 79 000 00 00', 'Smoke Person', DATE '1990-01-01') \
                 RETURNING id",
                &[&email],
            )
            .await?;
        Ok(row.get(0))
    }

    async fn seed_contract(
        &self,
        client_id: i64,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
        cost: &str,
    ) -> Result<i64, SmokeError> {
        let row = self
            .db
            .query_one(
                "INSERT INTO contracts (client_id, start_date, end_date, cost_amount) \
                 VALUES ($1, $2, $3, $4::text::numeric) RETURNING id",
                &[&client_id, &start_date, &end_date, &cost],
            )
            .await?;
        Ok(row.get(0))
    }

    async fn set_updated_at(&self, contract_id: i64, at: DateTime<Utc>) -> Result<(), SmokeError> {
        self.db
            .execute(
                "UPDATE contracts SET updated_at = $2 WHERE id = $1",
                &[&contract_id, &at],
            )
            .await?;
        Ok(())
    }

    async fn contract_row(
        &self,
        contract_id: i64,
    ) -> Result<(Option<NaiveDate>, String), SmokeError> {
        let row = self
            .db
            .query_one(
                "SELECT end_date, cost_amount::text FROM contracts WHERE id = $1",
                &[&contract_id],
            )
            .await?;
        Ok((row.get(0), row.get(1)))
    }

    async fn client_count(&self, client_id: i64) -> Result<i64, SmokeError> {
        let row = self
            .db
            .query_one("SELECT count(*) FROM clients WHERE id = $1", &[&client_id])
            .await?;
        Ok(row.get(0))
    }

    async fn get_json(&self, path: &str) -> Result<(StatusCode, Value), SmokeError> {
        let resp = self.http.get(self.url(path)).send().await?;
        let status = resp.status();
        Ok((status, resp.json().await?))
    }

    async fn send_json(
        &self,
        method: reqwest::Method,
        path: &str,
        body: &Value,
    ) -> Result<(StatusCode, Value), SmokeError> {
        let resp = self
            .http
            .request(method, self.url(path))
            .json(body)
            .send()
            .await?;
        let status = resp.status();
        Ok((status, resp.json().await?))
    }
}

fn ids(body: &Value) -> Vec<i64> {
    body.as_array()
        .map(|items| items.iter().filter_map(|c| c["id"].as_i64()).collect())
        .unwrap_or_default()
}

fn create_client(s: &Smoke) -> BoxFuture<'_, Result<(), SmokeError>> {
    Box::pin(async move {
        let (status, body) = s
            .send_json(
                reqwest::Method::POST,
                "/clients/create-client",
                &json!({
                    "phone": "+41 79 123 45 67",
                    "email": "Jane.Doe@example.com",
                    "name": "Jane Doe",
                    "birthdate": "1990-04-12"
                }),
            )
            .await?;
        ensure(status == StatusCode::CREATED, format!("expected 201, got {status}"))?;
        ensure(body["clientType"] == "PERSON", "clientType should be PERSON")?;
        let id = body["id"].as_i64().unwrap_or_default();
        ensure(s.client_count(id).await? == 1, "client row missing")?;

        let (status, body) = s
            .send_json(
                reqwest::Method::POST,
                "/clients/create-client",
                &json!({
                    "phone": "+41 79 123 45 68",
                    "email": "jane.doe@EXAMPLE.com",
                    "name": "Jane Again",
                    "birthdate": "1991-04-12"
                }),
            )
            .await?;
        ensure(status == StatusCode::BAD_REQUEST, "duplicate email should be rejected")?;
        ensure(
            body["detail"] == "Client with email jane.doe@EXAMPLE.com already exists.",
            format!("unexpected detail {}", body["detail"]),
        )
    })
}

fn get_client(s: &Smoke) -> BoxFuture<'_, Result<(), SmokeError>> {
    Box::pin(async move {
        let id = s.seed_person("get@example.com").await?;
        let (status, body) = s.get_json(&format!("/clients/{id}")).await?;
        ensure(status == StatusCode::OK, format!("expected 200, got {status}"))?;
        ensure(body["email"] == "get@example.com", "email mismatch")?;

        let (status, body) = s.get_json(&format!("/clients/{}", id + 1000)).await?;
        ensure(status == StatusCode::NOT_FOUND, "unknown client should be 404")?;
        ensure(body["title"] == "Not Found", "problem title should be Not Found")
    })
}

fn update_client(s: &Smoke) -> BoxFuture<'_, Result<(), SmokeError>> {
    Box::pin(async move {
        let id = s.seed_person("before@example.com").await?;
        let (status, body) = s
            .send_json(
                reqwest::Method::PUT,
                "/clients/update-client",
                &json!({"id": id, "email": "after@example.com", "phone": "0791112233", "name": "After"}),
            )
            .await?;
        ensure(status == StatusCode::OK, format!("expected 200, got {status}"))?;
        ensure(body["name"] == "After", "name not updated in response")?;

        let row = s
            .db
            .query_one("SELECT email FROM clients WHERE id = $1", &[&id])
            .await?;
        let email: String = row.get(0);
        ensure(email == "after@example.com", "email not updated in database")
    })
}

fn create_contract(s: &Smoke) -> BoxFuture<'_, Result<(), SmokeError>> {
    Box::pin(async move {
        let client_id = s.seed_person("contract@example.com").await?;
        let (status, body) = s
            .send_json(
                reqwest::Method::POST,
                "/contracts/create-contract",
                &json!({"clientId": client_id, "costAmount": 120.75}),
            )
            .await?;
        ensure(status == StatusCode::CREATED, format!("expected 201, got {status}"))?;
        ensure(
            body["startDate"] == s.today.to_string(),
            "startDate should default to today",
        )?;
        ensure(body["endDate"].is_null(), "endDate should be null")?;

        let (status, body) = s
            .send_json(
                reqwest::Method::POST,
                "/contracts/create-contract",
                &json!({
                    "clientId": client_id,
                    "startDate": "2024-06-10",
                    "endDate": "2024-06-09",
                    "costAmount": 1
                }),
            )
            .await?;
        ensure(status == StatusCode::BAD_REQUEST, "end before start should be rejected")?;
        ensure(
            body["detail"] == "End date must be on or after the start date.",
            format!("unexpected detail {}", body["detail"]),
        )
    })
}

fn update_contract(s: &Smoke) -> BoxFuture<'_, Result<(), SmokeError>> {
    Box::pin(async move {
        let client_id = s.seed_person("cost@example.com").await?;
        let contract_id = s
            .seed_contract(client_id, s.today - TimeDelta::days(10), None, "50.00")
            .await?;
        let (status, _) = s
            .send_json(
                reqwest::Method::PATCH,
                "/contracts/update-contract",
                &json!({"contractId": contract_id, "costAmount": 99.99}),
            )
            .await?;
        ensure(status == StatusCode::OK, format!("expected 200, got {status}"))?;
        let (_, cost) = s.contract_row(contract_id).await?;
        ensure(cost == "99.99", format!("cost should be 99.99, got {cost}"))
    })
}

fn active_cost(s: &Smoke) -> BoxFuture<'_, Result<(), SmokeError>> {
    Box::pin(async move {
        let today = s.today;
        let client_id = s.seed_person("sum@example.com").await?;
        s.seed_contract(client_id, today - TimeDelta::days(30), None, "120.75")
            .await?;
        s.seed_contract(
            client_id,
            today - TimeDelta::days(60),
            Some(today + TimeDelta::days(15)),
            "89.25",
        )
        .await?;
        s.seed_contract(
            client_id,
            today - TimeDelta::days(120),
            Some(today - TimeDelta::days(1)),
            "300.00",
        )
        .await?;

        let (status, body) = s
            .get_json(&format!("/contracts/clients/{client_id}/active-cost"))
            .await?;
        ensure(status == StatusCode::OK, format!("expected 200, got {status}"))?;
        ensure(
            body["activeCostAmount"].to_string() == "210.00",
            format!("expected 210.00, got {}", body["activeCostAmount"]),
        )
    })
}

fn list_contracts_sorted(s: &Smoke) -> BoxFuture<'_, Result<(), SmokeError>> {
    Box::pin(async move {
        let today = s.today;
        let client_id = s.seed_person("list@example.com").await?;
        let recent = s
            .seed_contract(client_id, today - TimeDelta::days(90), None, "200.00")
            .await?;
        s.seed_contract(
            client_id,
            today - TimeDelta::days(60),
            Some(today - TimeDelta::days(1)),
            "300.00",
        )
        .await?;
        let oldest = s
            .seed_contract(
                client_id,
                today - TimeDelta::days(180),
                Some(today + TimeDelta::days(10)),
                "100.00",
            )
            .await?;

        let (status, body) = s
            .get_json(&format!("/contracts/clients/{client_id}/contracts"))
            .await?;
        ensure(status == StatusCode::OK, format!("expected 200, got {status}"))?;
        ensure(
            ids(&body) == vec![oldest, recent],
            format!("expected [{oldest}, {recent}], got {:?}", ids(&body)),
        )
    })
}

fn list_contracts_updated_since(s: &Smoke) -> BoxFuture<'_, Result<(), SmokeError>> {
    Box::pin(async move {
        let today = s.today;
        let client_id = s.seed_person("since@example.com").await?;
        let stale = s
            .seed_contract(client_id, today - TimeDelta::days(40), None, "10.00")
            .await?;
        let fresh = s
            .seed_contract(client_id, today - TimeDelta::days(20), None, "20.00")
            .await?;
        let cutoff = Utc::now() - TimeDelta::hours(1);
        s.set_updated_at(stale, cutoff - TimeDelta::hours(2)).await?;
        s.set_updated_at(fresh, cutoff + TimeDelta::minutes(30)).await?;

        let since = cutoff.to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
        let resp = s
            .http
            .get(s.url(&format!("/contracts/clients/{client_id}/contracts")))
            .query(&[("updatedSince", since.as_str())])
            .send()
            .await?;
        ensure(
            resp.status() == StatusCode::OK,
            format!("expected 200, got {}", resp.status()),
        )?;
        let body: Value = resp.json().await?;
        ensure(
            ids(&body) == vec![fresh],
            format!("expected [{fresh}], got {:?}", ids(&body)),
        )
    })
}

fn delete_client(s: &Smoke) -> BoxFuture<'_, Result<(), SmokeError>> {
    Box::pin(async move {
        let today = s.today;
        let client_id = s.seed_person("delete@example.com").await?;
        let open = s
            .seed_contract(client_id, today - TimeDelta::days(30), None, "10.00")
            .await?;
        let closed_on = today - TimeDelta::days(5);
        let closed = s
            .seed_contract(client_id, today - TimeDelta::days(60), Some(closed_on), "20.00")
            .await?;

        let resp = s
            .http
            .delete(s.url(&format!("/clients/delete-client/{client_id}")))
            .send()
            .await?;
        ensure(
            resp.status() == StatusCode::NO_CONTENT,
            format!("expected 204, got {}", resp.status()),
        )?;

        ensure(s.client_count(client_id).await? == 0, "client row still present")?;
        let (open_end, _) = s.contract_row(open).await?;
        ensure(
            open_end == Some(today),
            format!("open contract should end {today}, got {open_end:?}"),
        )?;
        let (closed_end, _) = s.contract_row(closed).await?;
        ensure(
            closed_end == Some(closed_on),
            "already closed contract must keep its end date",
        )
    })
}

type Scenario = for<'a> fn(&'a Smoke) -> BoxFuture<'a, Result<(), SmokeError>>;

const SCENARIOS: &[(&str, Scenario)] = &[
    ("create client", create_client),
    ("get client", get_client),
    ("update client", update_client),
    ("create contract", create_contract),
    ("update contract", update_contract),
    ("active cost", active_cost),
    ("list contracts (sort)", list_contracts_sorted),
    ("list contracts (updatedSince)", list_contracts_updated_since),
    ("delete client", delete_client),
];

async fn wait_for_server(http: &reqwest::Client, base_url: &str) -> Result<(), SmokeError> {
    let health = format!("{base_url}/health");
    for attempt in 1..=READINESS_ATTEMPTS {
        match http.get(&health).send().await {
            Ok(resp) if resp.status().is_success() => return Ok(()),
            Ok(resp) => log::debug!("Server not ready (attempt {attempt}): {}", resp.status()),
            Err(e) => log::debug!("Server not reachable (attempt {attempt}): {e}"),
        }
        tokio::time::sleep(READINESS_DELAY).await;
    }
    Err(SmokeError::Check(format!(
        "{health} not healthy after {READINESS_ATTEMPTS} attempts"
    )))
}

async fn connect(config: &SmokeConfig) -> Result<Smoke, SmokeError> {
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()?;
    wait_for_server(&http, &config.api_base_url).await?;

    let (db, connection) =
        tokio_postgres::connect(&config.database_url, tokio_postgres::NoTls).await?;
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            log::error!("Database connection error: {}", e);
        }
    });

    Ok(Smoke {
        http,
        db,
        base_url: config.api_base_url.clone(),
        today: chrono::Local::now().date_naive(),
    })
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let smoke = match SmokeConfig::from_env() {
        Ok(config) => match connect(&config).await {
            Ok(smoke) => smoke,
            Err(e) => {
                log::error!("Setup failed: {}", e);
                return ExitCode::FAILURE;
            }
        },
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    for (name, scenario) in SCENARIOS {
        let outcome = match smoke.reset().await {
            Ok(()) => scenario(&smoke).await,
            Err(e) => Err(e),
        };
        match outcome {
            Ok(()) => log::info!("PASS {}", name),
            Err(e) => {
                log::error!("FAIL {}: {}", name, e);
                return ExitCode::FAILURE;
            }
        }
    }

    log::info!("All {} smoke scenarios passed", SCENARIOS.len());
    ExitCode::SUCCESS
}
