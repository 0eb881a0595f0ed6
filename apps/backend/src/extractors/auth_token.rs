use std::future::{ready, Ready};

use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use serde::Deserialize;

use crate::errors::ErrorCode;
use crate::AppError;

/// Bearer token taken from the Authorization header.
///
/// Browsers cannot set headers on a websocket upgrade, so a `token` query
/// parameter is accepted when the header is absent.
#[derive(Debug, Clone)]
pub struct AuthToken {
    pub token: String,
}

#[derive(Deserialize)]
struct TokenQuery {
    token: Option<String>,
}

impl AuthToken {
    fn from_header(req: &HttpRequest) -> Option<Result<String, AppError>> {
        let auth_value = req.headers().get(header::AUTHORIZATION)?;
        let missing = || AppError::unauthorized(ErrorCode::UnauthorizedMissingBearer);

        let parsed = auth_value.to_str().map_err(|_| missing()).and_then(|value| {
            // Parse "Bearer <token>" format
            let parts: Vec<&str> = value.split_whitespace().collect();
            match parts.as_slice() {
                ["Bearer", token] if !token.is_empty() => Ok((*token).to_string()),
                _ => Err(missing()),
            }
        });
        Some(parsed)
    }

    fn from_query(req: &HttpRequest) -> Option<String> {
        web::Query::<TokenQuery>::from_query(req.query_string())
            .ok()
            .and_then(|q| q.into_inner().token)
            .filter(|t| !t.is_empty())
    }

    /// Header first, then the query string.
    pub fn from_req(req: &HttpRequest) -> Result<Self, AppError> {
        let token = match Self::from_header(req) {
            Some(res) => res?,
            None => Self::from_query(req)
                .ok_or_else(|| AppError::unauthorized(ErrorCode::UnauthorizedMissingBearer))?,
        };
        Ok(AuthToken { token })
    }
}

impl FromRequest for AuthToken {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(Self::from_req(req))
    }
}
