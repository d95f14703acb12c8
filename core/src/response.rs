//! Maps an `HttpResponse` to a typed result or a `ClientError`.
//!
//! # Design
//! Success is any 2xx. A 2xx other than the operation's documented status
//! is accepted and logged, since servers differ on 200 vs 201 vs 204.
//! Non-2xx bodies are decoded as `ErrorReport`; when the body is something
//! else (a proxy page, plain text, nothing) a report is synthesized so the
//! caller always gets a non-empty message.

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::ClientError;
use crate::http::HttpResponse;
use crate::operation::Operation;
use crate::types::ErrorReport;

/// Decode a 2xx JSON body into `T`.
pub fn decode_json<T: DeserializeOwned>(operation: &Operation, response: HttpResponse) -> Result<T, ClientError> {
    check_status(operation, &response)?;
    serde_json::from_str(&response.body)
        .map_err(|e| ClientError::Decode(format!("{}: {e}", operation.id)))
}

/// Accept a 2xx response and discard its body.
pub fn decode_empty(operation: &Operation, response: HttpResponse) -> Result<(), ClientError> {
    check_status(operation, &response)
}

fn check_status(operation: &Operation, response: &HttpResponse) -> Result<(), ClientError> {
    if response.is_success() {
        if response.status != operation.success_status {
            debug!(
                operation = operation.id,
                status = response.status,
                documented = operation.success_status,
                "undocumented success status"
            );
        }
        return Ok(());
    }
    let report = error_report(response);
    debug!(operation = operation.id, status = response.status, message = %report.message, "request failed");
    Err(ClientError::Api {
        status: response.status,
        report,
    })
}

fn error_report(response: &HttpResponse) -> ErrorReport {
    match serde_json::from_str::<ErrorReport>(&response.body) {
        Ok(mut report) => {
            if report.message.trim().is_empty() {
                report.message = format!("HTTP {}", response.status);
            }
            report
        }
        Err(_) => {
            let body = response.body.trim();
            ErrorReport {
                source: "client".to_string(),
                message: if body.is_empty() {
                    format!("HTTP {}", response.status)
                } else {
                    body.to_string()
                },
                status_code: Some(response.status),
                ..Default::default()
            }
        }
    }
}
