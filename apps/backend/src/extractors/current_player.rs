use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};
use serde::Serialize;
use tracing::debug;

use crate::auth::jwt::verify_access_token;
use crate::domain::PlayerId;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::extractors::auth_token::AuthToken;
use crate::state::app_state::AppState;

/// The authenticated player behind a request.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct CurrentPlayer {
    pub id: PlayerId,
}

impl CurrentPlayer {
    fn extract(req: &HttpRequest) -> Result<Self, AppError> {
        let app_state = req.app_data::<web::Data<AppState>>().ok_or_else(|| {
            AppError::internal(ErrorCode::InternalError, "AppState not available")
        })?;

        let token = AuthToken::from_req(req)?;
        let claims = verify_access_token(&token.token, &app_state.security)?;
        let id = claims.player_id()?;
        debug!(player_id = %id, "Authenticated player");
        Ok(CurrentPlayer { id })
    }
}

impl FromRequest for CurrentPlayer {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(Self::extract(req))
    }
}
