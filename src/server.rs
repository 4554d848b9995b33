use std::sync::Arc;

use axum::Router;
use axum::extract::{Request, State};
use axum::http::{Method, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use log::{debug, warn};

use crate::dispatcher::{DispatchOutcome, Dispatcher};
use crate::error::Result;
use crate::executor::CommandRunner;
use crate::payload::Payload;

const ONLY_POST_JSON: &str = "Only POST requests with application/json Content-Type are allowed";
const UNREADABLE_BODY: &str = "Failed to read request body";

pub fn router<R>(dispatcher: Arc<Dispatcher<R>>) -> Router
where
    R: CommandRunner + Send + Sync + 'static,
{
    // One route, any method: the handler rejects non-POST itself so the
    // response body matches the documented plain-text message.
    Router::new()
        .route("/", any(handle::<R>))
        .with_state(dispatcher)
}

async fn handle<R>(State(dispatcher): State<Arc<Dispatcher<R>>>, request: Request) -> Response
where
    R: CommandRunner + Send + Sync + 'static,
{
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    if request.method() != Method::POST || content_type != "application/json" {
        return (StatusCode::BAD_REQUEST, ONLY_POST_JSON).into_response();
    }

    let body = match axum::body::to_bytes(request.into_body(), usize::MAX).await {
        Ok(body) => body,
        Err(err) => {
            warn!("failed reading request body: {err}");
            return (StatusCode::INTERNAL_SERVER_ERROR, UNREADABLE_BODY).into_response();
        }
    };

    match process_body(&dispatcher, &body).await {
        Ok(outcome) => {
            debug!("dispatched: {outcome:?}");
            StatusCode::OK.into_response()
        }
        Err(err) => {
            warn!("rejecting request: {err}");
            (
                StatusCode::BAD_REQUEST,
                format!("failed processing body: {err}"),
            )
                .into_response()
        }
    }
}

async fn process_body<R>(dispatcher: &Dispatcher<R>, body: &[u8]) -> Result<DispatchOutcome>
where
    R: CommandRunner + Send + Sync,
{
    let payload: Payload = serde_json::from_slice(body)?;
    dispatcher.dispatch(&payload).await
}
