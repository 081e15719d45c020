//! Structural validation of creation payloads.
//!
//! Runs at the API boundary, before any store call, and collects a message
//! for every failing field rather than stopping at the first.

use crate::error::{AppError, FieldErrors};
use crate::model::{CustomerPayload, DocumentType, NewCustomer};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

const MAX_FIRST_NAME: usize = 100;
const MAX_LAST_NAME: usize = 150;
const MAX_DOCUMENT_NUMBER: usize = 20;
const MAX_EMAIL: usize = 254;
const MAX_PHONE: usize = 20;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern compiles"));

pub struct RequestValidator;

impl RequestValidator {
    /// Validate the wire payload and convert it into a typed candidate.
    pub fn validate(payload: &CustomerPayload) -> Result<NewCustomer, AppError> {
        let mut errors = FieldErrors::new();

        let first_name = required_text("first_name", &payload.first_name, MAX_FIRST_NAME, &mut errors);
        let last_name = required_text("last_name", &payload.last_name, MAX_LAST_NAME, &mut errors);
        let document_number = required_text(
            "document_number",
            &payload.document_number,
            MAX_DOCUMENT_NUMBER,
            &mut errors,
        );

        let document_type = match payload.document_type.as_deref().map(str::trim) {
            None | Some("") => {
                push(&mut errors, "document_type", "document_type is required");
                None
            }
            Some(s) => match DocumentType::parse(s) {
                Some(t) => Some(t),
                None => {
                    push(
                        &mut errors,
                        "document_type",
                        format!("document_type must be one of: {}", DocumentType::ALL.join(", ")),
                    );
                    None
                }
            },
        };

        let email = match required_text("email", &payload.email, MAX_EMAIL, &mut errors) {
            Some(s) if !EMAIL_RE.is_match(&s) => {
                push(&mut errors, "email", "email must be a valid email address");
                None
            }
            other => other,
        };

        let phone = match payload.phone.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(s) if s.chars().count() > MAX_PHONE => {
                push(
                    &mut errors,
                    "phone",
                    format!("phone must be at most {} characters", MAX_PHONE),
                );
                None
            }
            Some(s) => Some(s.to_string()),
        };

        let birth_date = match payload.birth_date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(s) => match NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                Ok(d) => Some(d),
                Err(_) => {
                    push(
                        &mut errors,
                        "birth_date",
                        "birth_date must be a date in YYYY-MM-DD format",
                    );
                    None
                }
            },
        };

        match (first_name, last_name, document_type, document_number, email) {
            (
                Some(first_name),
                Some(last_name),
                Some(document_type),
                Some(document_number),
                Some(email),
            ) if errors.is_empty() => Ok(NewCustomer {
                first_name,
                last_name,
                document_type,
                document_number,
                email,
                phone,
                birth_date,
            }),
            _ => Err(AppError::Validation(errors)),
        }
    }
}

fn push(errors: &mut FieldErrors, field: &'static str, message: impl Into<String>) {
    errors.entry(field).or_default().push(message.into());
}

/// Required, trimmed, non-empty text of bounded length.
fn required_text(
    field: &'static str,
    value: &Option<String>,
    max: usize,
    errors: &mut FieldErrors,
) -> Option<String> {
    match value.as_deref().map(str::trim) {
        None | Some("") => {
            push(errors, field, format!("{} is required", field));
            None
        }
        Some(s) if s.chars().count() > max => {
            push(
                errors,
                field,
                format!("{} must be at most {} characters", field, max),
            );
            None
        }
        Some(s) => Some(s.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_payload() -> CustomerPayload {
        CustomerPayload {
            first_name: Some("Ana".into()),
            last_name: Some("Ruiz".into()),
            document_type: Some("DNI".into()),
            document_number: Some("12345678".into()),
            email: Some("ana@example.com".into()),
            phone: Some("999888777".into()),
            birth_date: Some("1990-04-12".into()),
        }
    }

    fn fields_of(err: AppError) -> FieldErrors {
        match err {
            AppError::Validation(fields) => fields,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn valid_payload_converts_to_typed_candidate() {
        let candidate = RequestValidator::validate(&full_payload()).unwrap();
        assert_eq!(candidate.first_name, "Ana");
        assert_eq!(candidate.document_type, DocumentType::Dni);
        assert_eq!(
            candidate.birth_date,
            Some(NaiveDate::from_ymd_opt(1990, 4, 12).unwrap())
        );
        assert_eq!(candidate.phone.as_deref(), Some("999888777"));
    }

    #[test]
    fn optional_fields_may_be_absent() {
        let payload = CustomerPayload {
            phone: None,
            birth_date: None,
            ..full_payload()
        };
        let candidate = RequestValidator::validate(&payload).unwrap();
        assert_eq!(candidate.phone, None);
        assert_eq!(candidate.birth_date, None);
    }

    #[test]
    fn empty_payload_reports_every_required_field() {
        let fields = fields_of(RequestValidator::validate(&CustomerPayload::default()).unwrap_err());
        for field in [
            "first_name",
            "last_name",
            "document_type",
            "document_number",
            "email",
        ] {
            assert!(fields.contains_key(field), "missing error for {}", field);
        }
        assert!(!fields.contains_key("phone"));
        assert!(!fields.contains_key("birth_date"));
    }

    #[test]
    fn whitespace_only_counts_as_missing() {
        let payload = CustomerPayload {
            first_name: Some("   ".into()),
            ..full_payload()
        };
        let fields = fields_of(RequestValidator::validate(&payload).unwrap_err());
        assert_eq!(fields["first_name"], vec!["first_name is required"]);
    }

    #[test]
    fn unknown_document_type_is_rejected() {
        let payload = CustomerPayload {
            document_type: Some("XYZ".into()),
            ..full_payload()
        };
        let fields = fields_of(RequestValidator::validate(&payload).unwrap_err());
        assert!(fields["document_type"][0].contains("must be one of"));
    }

    #[test]
    fn malformed_email_is_rejected() {
        for bad in ["not-an-email", "a@b", "a b@example.com", "@example.com"] {
            let payload = CustomerPayload {
                email: Some(bad.into()),
                ..full_payload()
            };
            let fields = fields_of(RequestValidator::validate(&payload).unwrap_err());
            assert!(fields.contains_key("email"), "accepted {:?}", bad);
        }
    }

    #[test]
    fn overlong_fields_are_rejected() {
        let payload = CustomerPayload {
            first_name: Some("x".repeat(MAX_FIRST_NAME + 1)),
            document_number: Some("9".repeat(MAX_DOCUMENT_NUMBER + 1)),
            ..full_payload()
        };
        let fields = fields_of(RequestValidator::validate(&payload).unwrap_err());
        assert!(fields["first_name"][0].contains("at most"));
        assert!(fields["document_number"][0].contains("at most"));
    }

    #[test]
    fn bad_birth_date_format_is_rejected() {
        for bad in ["12/04/1990", "1990-13-01", "yesterday"] {
            let payload = CustomerPayload {
                birth_date: Some(bad.into()),
                ..full_payload()
            };
            let fields = fields_of(RequestValidator::validate(&payload).unwrap_err());
            assert!(fields.contains_key("birth_date"), "accepted {:?}", bad);
        }
    }

    #[test]
    fn values_are_trimmed() {
        let payload = CustomerPayload {
            first_name: Some("  Ana  ".into()),
            email: Some(" ana.trim@example.com ".into()),
            ..full_payload()
        };
        let candidate = RequestValidator::validate(&payload).unwrap();
        assert_eq!(candidate.first_name, "Ana");
        assert_eq!(candidate.email, "ana.trim@example.com");
    }
}
