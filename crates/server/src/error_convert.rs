use shared_types::AppError;

/// Convert a sqlx::Error into an AppError.
pub fn sqlx_to_app_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::RowNotFound => AppError::not_found("Resource not found"),
        sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
            // unique_violation
            Some("23505") => {
                let detail = format!(
                    "{} {}",
                    db_err.constraint().unwrap_or_default(),
                    db_err.message()
                );
                AppError::conflict(unique_violation_message(&detail))
            }
            // foreign_key_violation
            Some("23503") => AppError::bad_request("Referenced record does not exist"),
            // check_violation
            Some("23514") => AppError::bad_request("Value is not allowed for this field"),
            // string_data_right_truncation
            Some("22001") => AppError::bad_request("Value is too long for this field"),
            _ => AppError::database(err.to_string()),
        },
        _ => AppError::database(err.to_string()),
    }
}

fn unique_violation_message(detail: &str) -> &'static str {
    if detail.contains("email") {
        "An account with this email already exists"
    } else if detail.contains("phone") {
        "This phone number is already in use"
    } else if detail.contains("slug") {
        "A specialization with this slug already exists"
    } else if detail.contains("bar_council") {
        "This bar council number is already registered"
    } else {
        "A record with this value already exists"
    }
}

/// Extension trait providing `.into_app_error()` on sqlx::Error.
pub trait SqlxErrorExt {
    fn into_app_error(self) -> AppError;
}

impl SqlxErrorExt for sqlx::Error {
    fn into_app_error(self) -> AppError {
        sqlx_to_app_error(self)
    }
}

/// Trait for validating request DTOs before processing.
pub trait ValidateRequest {
    fn validate_request(&self) -> Result<(), AppError>;
}

impl<T: validator::Validate> ValidateRequest for T {
    fn validate_request(&self) -> Result<(), AppError> {
        self.validate().map_err(AppError::from)
    }
}
