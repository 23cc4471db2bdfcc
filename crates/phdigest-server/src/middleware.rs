use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Instrument;
use uuid::Uuid;

const REQUEST_ID_HEADER: &str = "x-request-id";
const MAX_REQUEST_ID_LEN: usize = 64;

/// Request ID stored as a request extension and echoed on the response.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Caller-supplied IDs are reused only when short and printable; anything
/// else is replaced so log lines stay readable.
fn accepted_request_id(value: &HeaderValue) -> Option<String> {
    let id = value.to_str().ok()?.trim();
    let printable = id.chars().all(|c| c.is_ascii_graphic());
    (!id.is_empty() && id.len() <= MAX_REQUEST_ID_LEN && printable).then(|| id.to_string())
}

/// Attaches a [`RequestId`] and runs the rest of the stack inside a
/// `request` span carrying it, so pipeline logs for one page render can be
/// correlated.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(accepted_request_id)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    req.extensions_mut().insert(RequestId(id.clone()));

    let span = tracing::info_span!("request", request_id = %id, path = %req.uri().path());
    let mut res = next.run(req).instrument(span).await;

    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert(REQUEST_ID_HEADER, val);
    }

    res
}
