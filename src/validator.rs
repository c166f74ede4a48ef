use anyhow::anyhow;
use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
    http::StatusCode,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::utils::errors::AppError;

/// Flattens validator's per-field error map into one readable line.
fn format_errors(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| match &error.message {
                Some(message) => message.to_string(),
                None => format!("{} is invalid", field),
            })
        })
        .collect();
    messages.sort();
    messages.join(", ")
}

fn rejection_to_error(rejection: JsonRejection) -> AppError {
    let message = match &rejection {
        JsonRejection::MissingJsonContentType(_) => {
            "Missing 'Content-Type: application/json' header".to_string()
        }
        JsonRejection::JsonDataError(err) => {
            // Serde reports missing fields as `missing field \`name\``;
            // surface the field name on its own.
            let body = err.body_text();
            if let Some(field) = body
                .split("missing field `")
                .nth(1)
                .and_then(|rest| rest.split('`').next())
            {
                format!("{} is required", field)
            } else if body.contains("invalid type") {
                "Invalid field type in request".to_string()
            } else {
                "Invalid request body".to_string()
            }
        }
        JsonRejection::JsonSyntaxError(_) => "Request body is not valid JSON".to_string(),
        _ => "Invalid request body".to_string(),
    };

    AppError::new(StatusCode::BAD_REQUEST, anyhow!("{}", message))
}

/// JSON extractor that runs `validator::Validate` on the payload and
/// turns both deserialization and validation failures into readable
/// error responses.
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
            .map_err(rejection_to_error)?;

        value.validate().map_err(|errors| {
            AppError::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                anyhow!("{}", format_errors(&errors)),
            )
        })?;

        Ok(ValidatedJson(value))
    }
}
