use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Answers `OPTIONS` on any path with an empty 200 before routing happens.
///
/// The CORS headers themselves are added by the outer header layers, so the
/// preflight reply carries them like every other response.
pub async fn preflight(request: Request<Body>, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }

    next.run(request).await
}
