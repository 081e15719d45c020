//! Customer record and wire payload types with explicit conversion.
//! The persisted row (`Customer`), the raw wire input (`CustomerPayload`),
//! and the validated candidate (`NewCustomer`) are separate types; nothing
//! is mapped by reflection.

use crate::error::{AppError, FieldErrors};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};
use utoipa::ToSchema;

/// Closed set of identity document types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, ToSchema)]
pub enum DocumentType {
    /// National identity document.
    #[serde(rename = "DNI")]
    Dni,
    /// Foreign resident card.
    #[serde(rename = "CE")]
    Ce,
    /// Passport.
    #[serde(rename = "PAS")]
    Pas,
}

impl DocumentType {
    pub const ALL: [&'static str; 3] = ["DNI", "CE", "PAS"];

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Dni => "DNI",
            DocumentType::Ce => "CE",
            DocumentType::Pas => "PAS",
        }
    }

    pub fn parse(s: &str) -> Option<DocumentType> {
        match s {
            "DNI" => Some(DocumentType::Dni),
            "CE" => Some(DocumentType::Ce),
            "PAS" => Some(DocumentType::Pas),
            _ => None,
        }
    }
}

/// Persisted customer row. `id`, `created_at`, `updated_at`, and
/// `is_active` are store-managed and never accepted from a client.
#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct Customer {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub document_type: DocumentType,
    pub document_number: String,
    pub email: String,
    pub phone: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_active: bool,
}

impl FromRow<'_, PgRow> for Customer {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        let raw_type: String = row.try_get("document_type")?;
        let document_type =
            DocumentType::parse(&raw_type).ok_or_else(|| sqlx::Error::ColumnDecode {
                index: "document_type".into(),
                source: format!("unknown document type '{}'", raw_type).into(),
            })?;
        Ok(Customer {
            id: row.try_get("id")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            document_type,
            document_number: row.try_get("document_number")?,
            email: row.try_get("email")?,
            phone: row.try_get("phone")?,
            birth_date: row.try_get("birth_date")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
            is_active: row.try_get("is_active")?,
        })
    }
}

/// Raw creation payload as received on the wire. Every field is optional
/// here; presence and format are the validator's job, so failures come back
/// keyed by field instead of as a serde error.
#[derive(Clone, Debug, Default, ToSchema)]
pub struct CustomerPayload {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub document_type: Option<String>,
    pub document_number: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub birth_date: Option<String>,
}

impl CustomerPayload {
    /// Convert a raw JSON body into the wire payload. Only the JSON shape is
    /// checked here (object at the top, strings in the fields); presence and
    /// content rules live in the validator. Unknown keys are ignored.
    pub fn from_value(body: Value) -> Result<CustomerPayload, AppError> {
        let mut map = match body {
            Value::Object(map) => map,
            _ => {
                let mut errors = FieldErrors::new();
                errors
                    .entry("body")
                    .or_default()
                    .push("body must be a JSON object".to_string());
                return Err(AppError::Validation(errors));
            }
        };
        let mut errors = FieldErrors::new();
        let payload = CustomerPayload {
            first_name: take_string(&mut map, &mut errors, "first_name"),
            last_name: take_string(&mut map, &mut errors, "last_name"),
            document_type: take_string(&mut map, &mut errors, "document_type"),
            document_number: take_string(&mut map, &mut errors, "document_number"),
            email: take_string(&mut map, &mut errors, "email"),
            phone: take_string(&mut map, &mut errors, "phone"),
            birth_date: take_string(&mut map, &mut errors, "birth_date"),
        };
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }
        Ok(payload)
    }
}

fn take_string(
    map: &mut serde_json::Map<String, Value>,
    errors: &mut FieldErrors,
    field: &'static str,
) -> Option<String> {
    match map.remove(field) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(_) => {
            errors
                .entry(field)
                .or_default()
                .push(format!("{} must be a string", field));
            None
        }
    }
}

/// Validated candidate accepted by the store. Produced only by the request
/// validator.
#[derive(Clone, Debug)]
pub struct NewCustomer {
    pub first_name: String,
    pub last_name: String,
    pub document_type: DocumentType,
    pub document_number: String,
    pub email: String,
    pub phone: Option<String>,
    pub birth_date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn document_type_round_trips() {
        for s in DocumentType::ALL {
            let t = DocumentType::parse(s).unwrap();
            assert_eq!(t.as_str(), s);
        }
        assert_eq!(DocumentType::parse("XYZ"), None);
        assert_eq!(DocumentType::parse("dni"), None);
    }

    #[test]
    fn document_type_serializes_as_code() {
        assert_eq!(
            serde_json::to_value(DocumentType::Dni).unwrap(),
            json!("DNI")
        );
    }

    #[test]
    fn payload_from_object_keeps_strings_and_drops_nulls() {
        let payload = CustomerPayload::from_value(json!({
            "first_name": "Ana",
            "phone": null,
            "unknown": 42
        }))
        .unwrap();
        assert_eq!(payload.first_name.as_deref(), Some("Ana"));
        assert_eq!(payload.phone, None);
        assert_eq!(payload.last_name, None);
    }

    #[test]
    fn payload_rejects_non_object_body() {
        let err = CustomerPayload::from_value(json!([1, 2])).unwrap_err();
        match err {
            AppError::Validation(fields) => assert!(fields.contains_key("body")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn payload_rejects_non_string_fields_keyed_by_field() {
        let err = CustomerPayload::from_value(json!({
            "first_name": 7,
            "email": true
        }))
        .unwrap_err();
        match err {
            AppError::Validation(fields) => {
                assert!(fields.contains_key("first_name"));
                assert!(fields.contains_key("email"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
