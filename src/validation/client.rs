use crate::dtos::{CreateClientDto, UpdateClientDto, is_blank};

use super::{
    MAX_COMPANY_IDENTIFIER_LEN, MAX_NAME_LEN, PHONE_EXTRA_CHARS, PHONE_MAX_LEN, PHONE_MIN_LEN,
    ValidationError, ValidationResult, finish,
};

/// Validates a client creation request. Person/company rules are applied afterwards by
/// `CreateClientDto::resolve`.
pub fn validate_create_client(dto: &CreateClientDto) -> ValidationResult {
    let mut errors = Vec::new();

    check_phone(dto.phone.as_deref(), &mut errors);
    check_email(dto.email.as_deref(), &mut errors);
    check_name(dto.name.as_deref(), &mut errors);

    if let Some(ref company_identifier) = dto.company_identifier {
        if company_identifier.chars().count() > MAX_COMPANY_IDENTIFIER_LEN {
            errors.push(ValidationError::new(
                "companyIdentifier",
                "Company identifier cannot exceed 255 characters.",
            ));
        }
    }

    finish(errors)
}

/// Validates a client update request.
pub fn validate_update_client(dto: &UpdateClientDto) -> ValidationResult {
    let mut errors = Vec::new();

    if dto.id.is_none() {
        errors.push(ValidationError::new("id", "Client id is required."));
    }
    check_email(dto.email.as_deref(), &mut errors);
    check_phone(dto.phone.as_deref(), &mut errors);
    check_name(dto.name.as_deref(), &mut errors);

    finish(errors)
}

fn check_phone(phone: Option<&str>, errors: &mut Vec<ValidationError>) {
    match phone {
        _ if is_blank(phone) => {
            errors.push(ValidationError::new("phone", "Phone must not be blank."));
        }
        Some(phone) if !is_valid_phone(phone) => {
            errors.push(ValidationError::new(
                "phone",
                "Phone must be 7 to 20 characters of digits, spaces, '+', '(', ')', '.' or '-'.",
            ));
        }
        _ => {}
    }
}

fn check_email(email: Option<&str>, errors: &mut Vec<ValidationError>) {
    match email {
        _ if is_blank(email) => {
            errors.push(ValidationError::new("email", "Email must not be blank."));
        }
        Some(email) if !is_valid_email(email.trim()) => {
            errors.push(ValidationError::new(
                "email",
                "Email must be a well-formed email address.",
            ));
        }
        _ => {}
    }
}

fn check_name(name: Option<&str>, errors: &mut Vec<ValidationError>) {
    match name {
        _ if is_blank(name) => {
            errors.push(ValidationError::new("name", "Name must not be blank."));
        }
        Some(name) if name.chars().count() > MAX_NAME_LEN => {
            errors.push(ValidationError::new(
                "name",
                "Name cannot exceed 255 characters.",
            ));
        }
        _ => {}
    }
}

pub(crate) fn is_valid_phone(phone: &str) -> bool {
    let len = phone.chars().count();
    (PHONE_MIN_LEN..=PHONE_MAX_LEN).contains(&len)
        && phone
            .chars()
            .all(|c| c.is_ascii_digit() || PHONE_EXTRA_CHARS.contains(&c))
}

/// A single `@` with a non-empty local part and a dot-separated domain of non-empty labels.
pub(crate) fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }
    if email.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return false;
    }
    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return false;
    }
    domain.split('.').all(|label| {
        !label.is_empty()
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_alphanumeric() || c == '-')
    })
}
