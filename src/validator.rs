use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::utils::errors::AppError;

fn collect_errors(errors: &ValidationErrors) -> Vec<String> {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| match &error.message {
                Some(msg) => format!("{}: {}", field, msg),
                None => format!("{} is invalid", field),
            })
        })
        .collect();
    // field_errors() iterates a map; sort for a stable order.
    messages.sort();
    messages
}

/// JSON extractor that runs `validator` rules after deserialization and
/// reports every failing field at once instead of stopping at the first.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                let error_msg = rejection.body_text();

                if error_msg.contains("missing field") {
                    let field = error_msg
                        .split("missing field `")
                        .nth(1)
                        .and_then(|s| s.split('`').next())
                        .unwrap_or("unknown");
                    return AppError::bad_request(format!("{} is required", field));
                }

                if error_msg.contains("unknown variant") {
                    return AppError::bad_request("Invalid field value in request body");
                }

                if error_msg.contains("invalid type") {
                    return AppError::bad_request("Invalid field type in request body");
                }

                if matches!(rejection, JsonRejection::MissingJsonContentType(_)) {
                    return AppError::bad_request(
                        "Missing 'Content-Type: application/json' header",
                    );
                }

                AppError::bad_request("Invalid request body")
            })?;

        value
            .validate()
            .map_err(|errors| AppError::Validation(collect_errors(&errors)))?;

        Ok(ValidatedJson(value))
    }
}
