use axum::{extract::Request, http::header, middleware::Next, response::Response};
use tracing::Instrument;
use uuid::Uuid;

/// Request ID stored in request extensions for correlating log lines
#[derive(Clone, Debug)]
pub struct RequestId(pub Uuid);

/// Middleware that tags every request with a UUID v4.
///
/// The ID is stored in request extensions and echoed back in the
/// `x-request-id` response header, so a registry delivery can be matched to
/// the log lines it produced.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = RequestId(Uuid::new_v4());
    request.extensions_mut().insert(request_id.clone());

    let span = tracing::info_span!("request", request_id = %request_id.0);
    let mut response = next.run(request).instrument(span).await;

    response.headers_mut().insert(
        header::HeaderName::from_static("x-request-id"),
        header::HeaderValue::from_str(&request_id.0.to_string())
            .unwrap_or_else(|_| header::HeaderValue::from_static("invalid")),
    );

    response
}
