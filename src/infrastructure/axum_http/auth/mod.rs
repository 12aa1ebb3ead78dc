use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::config_loader;
use crate::domain::value_objects::{enums::roles::Role, iam::AuthUserModel};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    pub email: Option<String>,
    pub exp: usize,
}

/// Authenticated caller, extracted from a `Bearer` token. Handlers
/// that require a login take this; handlers that degrade gracefully
/// for anonymous callers take [`MaybeAuthUser`] instead.
#[derive(Debug, Clone)]
pub struct AuthUser(pub AuthUserModel);

/// Optional authentication: a missing or invalid token yields `None`
/// rather than a rejection.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<AuthUserModel>);

pub fn validate_jwt(token: &str) -> Result<Claims, anyhow::Error> {
    let jwt = config_loader::get_jwt_secret()
        .map_err(|e| anyhow::anyhow!("Failed to load JWT secret: {}", e))?;

    let decoding_key = DecodingKey::from_secret(jwt.secret.as_bytes());
    let validation = Validation::new(jsonwebtoken::Algorithm::HS256);

    let token_data = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|e| anyhow::anyhow!("JWT validation failed: {}", e))?;

    Ok(token_data.claims)
}

fn user_from_parts(parts: &Parts) -> Result<AuthUserModel, (StatusCode, String)> {
    let auth_header = parts
        .headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or((
            StatusCode::UNAUTHORIZED,
            "Missing Authorization header".to_string(),
        ))?;

    let auth_str = auth_header.to_str().map_err(|_| {
        (
            StatusCode::UNAUTHORIZED,
            "Invalid Authorization header".to_string(),
        )
    })?;

    if !auth_str.starts_with("Bearer ") {
        return Err((
            StatusCode::UNAUTHORIZED,
            "Invalid Authorization header format".to_string(),
        ));
    }

    let token = &auth_str[7..];

    let claims =
        validate_jwt(token).map_err(|e| (StatusCode::UNAUTHORIZED, e.to_string()))?;

    let user_id = Uuid::parse_str(&claims.sub).map_err(|_| {
        (
            StatusCode::UNAUTHORIZED,
            "Invalid user ID in token".to_string(),
        )
    })?;

    Ok(AuthUserModel {
        user_id,
        email: claims.email,
        role: Role::from_str(&claims.role),
    })
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, String);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        user_from_parts(parts).map(AuthUser)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for MaybeAuthUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeAuthUser(user_from_parts(parts).ok()))
    }
}
