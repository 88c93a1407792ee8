//! Caller identity
//!
//! Identity arrives in request headers from the fronting authentication
//! layer: `x-user-id` (required) and `x-user-role` (`admin` or `user`,
//! default `user`).

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use formbuilder_core::{Identity, Role};

use crate::models::ApiError;

pub const USER_HEADER: &str = "x-user-id";
pub const ROLE_HEADER: &str = "x-user-role";

/// Authenticated caller
#[derive(Debug, Clone)]
pub struct Caller(pub Identity);

#[async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = header(parts, USER_HEADER)
            .filter(|v| !v.is_empty())
            .ok_or(ApiError::Unauthorized)?;
        let role = match header(parts, ROLE_HEADER) {
            Some(raw) => raw.parse::<Role>().map_err(ApiError::BadRequest)?,
            None => Role::User,
        };
        Ok(Caller(Identity::new(user_id, role)))
    }
}

fn header<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
}
