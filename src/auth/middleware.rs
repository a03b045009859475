use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::warn;
use uuid::Uuid;

use super::jwt::TokenService;
use crate::error::AppError;

/// Identity attached to a request once its bearer token has been verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: Uuid,
    pub role: Option<String>,
}

/// Splits `Authorization: Bearer <token>`. The scheme is case-insensitive.
fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or(AppError::Unauthorized("Missing Authorization header"))?
        .to_str()
        .map_err(|_| AppError::Unauthorized("Invalid Authorization header"))?;

    let (scheme, token) = header
        .split_once(' ')
        .ok_or(AppError::Unauthorized("Invalid Authorization header"))?;
    let token = token.trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(AppError::Unauthorized("Invalid Authorization header"));
    }
    Ok(token)
}

/// Rejects the request with 401 unless it carries a valid bearer token.
/// The subject is not looked up in the account store.
pub async fn require_auth(
    State(tokens): State<TokenService>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers())?;
    let claims = tokens.verify(token).map_err(|_| {
        warn!("invalid or expired token");
        AppError::Unauthorized("Invalid or expired token")
    })?;

    request.extensions_mut().insert(AuthUser {
        id: claims.sub,
        role: claims.role,
    });
    Ok(next.run(request).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(AppError::Unauthorized("Authentication required"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Method, StatusCode},
        middleware::from_fn_with_state,
        routing::get,
        Router,
    };
    use tower::ServiceExt;

    use crate::config::test_config;

    fn tokens() -> TokenService {
        TokenService::new(&test_config().jwt)
    }

    async fn whoami(user: AuthUser) -> String {
        user.id.to_string()
    }

    fn app(tokens: TokenService) -> Router {
        Router::new()
            .route("/whoami", get(whoami))
            .layer(from_fn_with_state(tokens, require_auth))
    }

    fn request(auth: Option<&str>) -> Request {
        let mut builder = axum::http::Request::builder()
            .method(Method::GET)
            .uri("/whoami");
        if let Some(value) = auth {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn bearer_parsing() {
        let mut headers = HeaderMap::new();
        assert!(bearer_token(&headers).is_err());

        headers.insert(AUTHORIZATION, "Bearer abc.def".parse().unwrap());
        assert_eq!(bearer_token(&headers).unwrap(), "abc.def");

        headers.insert(AUTHORIZATION, "bearer abc.def".parse().unwrap());
        assert_eq!(bearer_token(&headers).unwrap(), "abc.def");

        headers.insert(AUTHORIZATION, "Basic dXNlcjpwYXNz".parse().unwrap());
        assert!(bearer_token(&headers).is_err());

        headers.insert(AUTHORIZATION, "Bearer ".parse().unwrap());
        assert!(bearer_token(&headers).is_err());

        headers.insert(AUTHORIZATION, "abc.def".parse().unwrap());
        assert!(bearer_token(&headers).is_err());
    }

    #[tokio::test]
    async fn missing_header_is_unauthorized() {
        let response = app(tokens()).oneshot(request(None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn malformed_header_is_unauthorized() {
        let response = app(tokens())
            .oneshot(request(Some("Token something")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn invalid_token_is_unauthorized() {
        let response = app(tokens())
            .oneshot(request(Some("Bearer not-a-jwt")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn valid_token_attaches_identity() {
        let tokens = tokens();
        let user_id = Uuid::new_v4();
        let token = tokens.issue_default(user_id, Some("user")).unwrap();
        let response = app(tokens)
            .oneshot(request(Some(&format!("Bearer {token}"))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(body, user_id.to_string().as_bytes());
    }

    #[tokio::test]
    async fn extractor_without_middleware_is_unauthorized() {
        let app = Router::new().route("/whoami", get(whoami));
        let response = app.oneshot(request(None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
