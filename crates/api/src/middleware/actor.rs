//! Acting-user extractor for Axum handlers.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use vendorhub_core::audit::DEFAULT_ACTOR;

/// Header carrying the display name recorded in audit entries.
pub const ACTOR_HEADER: &str = "x-actor";

/// The user an operation is attributed to.
///
/// Read from the `X-Actor` header. A missing, blank or non-UTF-8 header
/// falls back to [`DEFAULT_ACTOR`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor(pub String);

impl Actor {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<S: Send + Sync> FromRequestParts<S> for Actor {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let name = parts
            .headers
            .get(ACTOR_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_ACTOR);

        Ok(Actor(name.to_string()))
    }
}
