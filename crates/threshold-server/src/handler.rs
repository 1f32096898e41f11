//! HTTP handlers for the webhook listener.

use std::sync::Arc;

use axum::{body::Bytes, extract::State, http::StatusCode};
use threshold_core::ThresholdError;

use crate::event::{Delivery, PullRequestEvent};
use crate::reactor::react;
use crate::state::AppState;

pub async fn health() -> &'static str {
    "ok"
}

pub async fn webhook(State(state): State<Arc<AppState>>, body: Bytes) -> (StatusCode, String) {
    handle_delivery(&state, &body).await
}

/// Run one webhook delivery through parse, filter, evaluate and react.
///
/// Returns the status code and the plain-text body, which is also logged.
pub async fn handle_delivery(state: &AppState, body: &[u8]) -> (StatusCode, String) {
    let event = match PullRequestEvent::parse(body) {
        Ok(event) => event,
        Err(e) => return respond_error(&e, None),
    };

    let pr = match event.into_delivery() {
        Ok(Delivery::Evaluate(pr)) => pr,
        Ok(Delivery::Ignored(reason)) => {
            let message = format!("Ignoring event: {reason}");
            tracing::info!("{message}");
            return (StatusCode::OK, message);
        }
        Err(e) => return respond_error(&e, None),
    };

    let label = pr.to_string();
    match react(state.client.as_ref(), &state.thresholds, pr).await {
        Ok(reaction) => {
            let message = reaction.message();
            tracing::info!("{message}");
            (StatusCode::OK, message)
        }
        Err(e) => respond_error(&e, Some(&label)),
    }
}

fn respond_error(err: &ThresholdError, pr: Option<&str>) -> (StatusCode, String) {
    let code = status_for(err);
    let message = match pr {
        Some(pr) => format!("{pr}: {err}"),
        None => err.to_string(),
    };
    if code.is_server_error() {
        tracing::error!("{message}");
    } else {
        tracing::warn!("{message}");
    }
    (code, message)
}

fn status_for(err: &ThresholdError) -> StatusCode {
    match err {
        ThresholdError::MalformedInput(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_input_maps_to_bad_request() {
        let err = ThresholdError::MalformedInput("eof".into());
        assert_eq!(status_for(&err), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn upstream_and_invalid_state_map_to_server_error() {
        assert_eq!(
            status_for(&ThresholdError::Upstream("boom".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_for(&ThresholdError::InvalidState("pending".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn health_says_ok() {
        assert_eq!(health().await, "ok");
    }
}
