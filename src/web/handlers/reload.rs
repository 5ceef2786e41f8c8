use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;

use crate::server::AppState;

/// Run one rotation pipeline synchronously and translate its outcome.
///
/// 200 with a short body when the pipeline completes, including the
/// zero-matched-processes case; 422 with the failed stage's category
/// string when it aborts. The full cause goes to the log, never to the
/// caller.
pub async fn reload_handler(State(state): State<AppState>) -> Response {
    match state.pipeline.execute().await {
        Ok(_) => (StatusCode::OK, "OK").into_response(),
        Err(e) => {
            error!(stage = e.stage(), error = %e, "reload pipeline aborted");
            (StatusCode::UNPROCESSABLE_ENTITY, e.category()).into_response()
        }
    }
}
