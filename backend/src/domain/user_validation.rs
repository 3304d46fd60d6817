//! Pure field validation for create/update inputs.
//!
//! Validation collects every violation instead of failing fast, so the
//! caller can re-render a form with all inline messages at once. Email
//! uniqueness is not checked here; that is a store invariant the service
//! layers on top of this pass.

use crate::domain::ports::{CreateUserRequest, UpdateUserRequest};
use crate::domain::{EmailAddress, FieldViolation, UserFieldError, UserName};

/// Field name constants shared with the uniqueness violation in the service.
pub const FIELD_NAME: &str = "name";
/// Field name for email violations.
pub const FIELD_EMAIL: &str = "email";

/// Validated create input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedCreate {
    /// Validated account name.
    pub name: UserName,
    /// Validated email address (uniqueness still unchecked).
    pub email: EmailAddress,
}

/// Validated partial-update input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidatedUpdate {
    /// Replacement name, when the request provided one.
    pub name: Option<UserName>,
    /// Replacement email, when the request provided one.
    pub email: Option<EmailAddress>,
}

fn violation(field: &'static str, error: &UserFieldError) -> FieldViolation {
    let code = match error {
        UserFieldError::EmptyName | UserFieldError::EmptyEmail => "required",
        UserFieldError::NameTooLong { .. } | UserFieldError::EmailTooLong { .. } => "too_long",
        UserFieldError::EmailInvalid => "invalid",
        UserFieldError::InvalidId => "invalid",
    };
    FieldViolation::new(field, code, error.to_string())
}

/// Validate create input, returning all field violations on failure.
pub fn validate_create(request: &CreateUserRequest) -> Result<ValidatedCreate, Vec<FieldViolation>> {
    let mut violations = Vec::new();

    let name = UserName::new(request.name.clone())
        .map_err(|err| violations.push(violation(FIELD_NAME, &err)))
        .ok();
    let email = EmailAddress::new(request.email.clone())
        .map_err(|err| violations.push(violation(FIELD_EMAIL, &err)))
        .ok();

    match (name, email) {
        (Some(name), Some(email)) => Ok(ValidatedCreate { name, email }),
        _ => Err(violations),
    }
}

/// Validate the provided fields of an update, returning all violations.
///
/// Absent fields are skipped entirely; they stay untouched on the record.
pub fn validate_update(request: &UpdateUserRequest) -> Result<ValidatedUpdate, Vec<FieldViolation>> {
    let mut violations = Vec::new();
    let mut validated = ValidatedUpdate::default();

    if let Some(name) = &request.name {
        match UserName::new(name.clone()) {
            Ok(name) => validated.name = Some(name),
            Err(err) => violations.push(violation(FIELD_NAME, &err)),
        }
    }
    if let Some(email) = &request.email {
        match EmailAddress::new(email.clone()) {
            Ok(email) => validated.email = Some(email),
            Err(err) => violations.push(violation(FIELD_EMAIL, &err)),
        }
    }

    if violations.is_empty() {
        Ok(validated)
    } else {
        Err(violations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::USER_NAME_MAX;

    fn create_request(name: &str, email: &str) -> CreateUserRequest {
        CreateUserRequest {
            name: name.to_owned(),
            email: email.to_owned(),
            ..CreateUserRequest::default()
        }
    }

    #[test]
    fn create_accepts_valid_input() {
        let validated =
            validate_create(&create_request("Jane Doe", "jane@example.com")).expect("valid");
        assert_eq!(validated.name.as_ref(), "Jane Doe");
        assert_eq!(validated.email.as_ref(), "jane@example.com");
    }

    #[test]
    fn create_collects_violations_for_every_bad_field() {
        let violations =
            validate_create(&create_request("", "not-an-email")).expect_err("two violations");
        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].field, FIELD_NAME);
        assert_eq!(violations[0].code, "required");
        assert_eq!(violations[1].field, FIELD_EMAIL);
        assert_eq!(violations[1].code, "invalid");
    }

    #[test]
    fn create_flags_overlong_name() {
        let long_name = "x".repeat(USER_NAME_MAX + 1);
        let violations =
            validate_create(&create_request(&long_name, "jane@example.com")).expect_err("invalid");
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].code, "too_long");
    }

    #[test]
    fn update_with_no_fields_is_valid_and_empty() {
        let validated = validate_update(&UpdateUserRequest::default()).expect("valid");
        assert_eq!(validated, ValidatedUpdate::default());
    }

    #[test]
    fn update_validates_only_provided_fields() {
        let request = UpdateUserRequest {
            name: None,
            email: Some("broken".to_owned()),
        };
        let violations = validate_update(&request).expect_err("email invalid");
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, FIELD_EMAIL);
    }
}
