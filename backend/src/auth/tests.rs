use super::*;
use crate::axum_http::error_responses::ErrorResponse;
use axum::{
    body::to_bytes,
    http::{Request, header::AUTHORIZATION},
};
use jsonwebtoken::{EncodingKey, Header, encode};

const SECRET: &str = "supersecretjwtsecretforunittesting123";

fn claims(exp: usize) -> UserClaims {
    UserClaims {
        sub: "123e4567-e89b-12d3-a456-426614174000".to_string(),
        role: "authenticated".to_string(),
        email: Some("test@example.com".to_string()),
        aud: "authenticated".to_string(),
        exp,
    }
}

fn sign(claims: &UserClaims, secret: &str) -> String {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

async fn extract(token: Option<String>, secret: Option<AuthSecret>) -> Result<AuthUser, Response> {
    let mut builder = Request::builder().uri("/me");
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, token);
    }
    let request = builder.body(()).unwrap();
    let (mut parts, _) = request.into_parts();
    if let Some(secret) = secret {
        parts.extensions.insert(secret);
    }
    AuthUser::from_request_parts(&mut parts, &()).await
}

async fn rejection(result: Result<AuthUser, Response>) -> (StatusCode, ErrorResponse) {
    let response = result.unwrap_err();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[test]
fn test_validate_jwt_success() {
    let my_claims = claims(9999999999);
    let token = sign(&my_claims, SECRET);

    let claims = validate_jwt(&token, &AuthSecret::new(SECRET)).expect("Valid token should pass");
    assert_eq!(claims.sub, my_claims.sub);
    assert_eq!(claims.email, my_claims.email);
}

#[test]
fn test_validate_jwt_expired() {
    let token = sign(&claims(1), SECRET);

    let result = validate_jwt(&token, &AuthSecret::new(SECRET));
    assert!(result.is_err());
}

#[test]
fn test_validate_jwt_invalid_signature() {
    let token = sign(&claims(9999999999), "wrongsecret");

    let result = validate_jwt(&token, &AuthSecret::new(SECRET));
    assert!(result.is_err());
}

#[test]
fn test_validate_jwt_wrong_audience() {
    let mut my_claims = claims(9999999999);
    my_claims.aud = "anon".to_string();
    let token = sign(&my_claims, SECRET);

    let result = validate_jwt(&token, &AuthSecret::new(SECRET));
    assert!(result.is_err());
}

#[tokio::test]
async fn extractor_returns_typed_user() {
    let token = sign(&claims(9999999999), SECRET);

    let user = extract(Some(format!("Bearer {token}")), Some(AuthSecret::new(SECRET)))
        .await
        .unwrap();

    assert_eq!(user.user_id, "123e4567-e89b-12d3-a456-426614174000");
}

#[tokio::test]
async fn extractor_rejects_missing_header() {
    let (status, body) = rejection(extract(None, Some(AuthSecret::new(SECRET))).await).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body.code, 401);
    assert_eq!(body.message, "Missing Authorization header");
}

#[tokio::test]
async fn extractor_rejects_non_bearer_scheme() {
    let token = sign(&claims(9999999999), SECRET);

    let (status, body) = rejection(
        extract(Some(format!("Basic {token}")), Some(AuthSecret::new(SECRET))).await,
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body.message, "Invalid Authorization header format");
}

#[tokio::test]
async fn extractor_fails_without_secret() {
    let token = sign(&claims(9999999999), SECRET);

    let (status, body) = rejection(extract(Some(format!("Bearer {token}")), None).await).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body.code, 500);
}
