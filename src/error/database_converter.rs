use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

use crate::error::{AppError, ConstraintParser};

/// Maps diesel errors onto [`AppError`] variants.
///
/// Constraint violations become client errors that name the offending JSON
/// field; everything else is an opaque `Database` error.
pub struct DatabaseErrorConverter;

impl DatabaseErrorConverter {
    pub fn convert_diesel_error(error: DieselError, operation: &str) -> AppError {
        match error {
            DieselError::DatabaseError(kind, info) => {
                Self::convert_database_error(kind, info.as_ref(), operation)
            }
            DieselError::NotFound => AppError::NotFound {
                entity: "resource".to_string(),
                field: "id".to_string(),
                value: "unknown".to_string(),
            },
            other => AppError::Database {
                operation: operation.to_string(),
                source: anyhow::Error::from(other),
            },
        }
    }

    fn convert_database_error(
        kind: DatabaseErrorKind,
        info: &(dyn DatabaseErrorInformation + Send + Sync),
        operation: &str,
    ) -> AppError {
        // The Key (...)=(...) part lives in DETAIL, not the primary message
        let message = match info.details() {
            Some(details) => format!("{}\n{}", info.message(), details),
            None => info.message().to_string(),
        };
        let table = info.table_name();
        let constraint_name = info.constraint_name();

        let parsed = match kind {
            DatabaseErrorKind::UniqueViolation => {
                ConstraintParser::parse_unique_violation(&message, table, constraint_name).map(
                    |(entity, field, value)| AppError::Duplicate {
                        entity,
                        field: ConstraintParser::wire_field_name(&field),
                        value,
                    },
                )
            }
            DatabaseErrorKind::NotNullViolation => {
                ConstraintParser::parse_not_null_violation(&message, table).map(|(entity, field)| {
                    AppError::Validation {
                        field: ConstraintParser::wire_field_name(&field),
                        reason: format!("Field is required for {entity}"),
                    }
                })
            }
            DatabaseErrorKind::ForeignKeyViolation => {
                ConstraintParser::parse_foreign_key_violation(&message, table, constraint_name).map(
                    |(_, field, value)| AppError::Validation {
                        field: ConstraintParser::wire_field_name(&field),
                        reason: format!("Referenced record '{value}' does not exist"),
                    },
                )
            }
            _ => None,
        };

        parsed.unwrap_or_else(|| AppError::Database {
            operation: operation.to_string(),
            source: anyhow::Error::msg(format!("{kind:?}: {message}")),
        })
    }
}
