use axum::{
    extract::Request,
    http::{header, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// The one non-local origin allowed to call this gateway.
const PRODUCTION_ORIGIN: &str = "https://house-rank.carlyzach.com";

const ALLOW_METHODS: &str = "GET, POST";
const ALLOW_HEADERS: &str =
    "authorization, content-type, accept, accept-language, content-language, referrer";

fn origin_allowed(origin: &str) -> bool {
    origin.starts_with("http://localhost:") || origin == PRODUCTION_ORIGIN
}

/// Reflects allowed origins and short-circuits preflight with 204. Sits
/// outside the auth middleware so preflights never need a credential.
pub async fn cors_middleware(req: Request, next: Next) -> Response {
    let origin = req
        .headers()
        .get(header::ORIGIN)
        .and_then(|value| value.to_str().ok())
        .filter(|origin| origin_allowed(origin))
        .map(str::to_owned);

    let mut response = if req.method() == Method::OPTIONS {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(req).await
    };

    if let Some(origin) = origin {
        if let Ok(origin) = HeaderValue::from_str(&origin) {
            let headers = response.headers_mut();
            headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
            headers.insert(
                header::ACCESS_CONTROL_ALLOW_METHODS,
                HeaderValue::from_static(ALLOW_METHODS),
            );
            headers.insert(
                header::ACCESS_CONTROL_ALLOW_HEADERS,
                HeaderValue::from_static(ALLOW_HEADERS),
            );
            headers.insert(
                header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
                HeaderValue::from_static("true"),
            );
        }
    }
    response
}
