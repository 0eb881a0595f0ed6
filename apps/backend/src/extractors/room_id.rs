use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use serde::Serialize;

use crate::domain::RoomId;
use crate::error::AppError;
use crate::errors::ErrorCode;

/// Room id taken from the `{room_id}` path segment.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct RoomIdPath(pub RoomId);

impl FromRequest for RoomIdPath {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let res = req
            .match_info()
            .get("room_id")
            .ok_or_else(|| {
                AppError::bad_request(ErrorCode::InvalidRoomId, "Missing room_id parameter")
            })
            .and_then(|raw| {
                raw.parse::<RoomId>().map(RoomIdPath).map_err(|_| {
                    AppError::bad_request(ErrorCode::InvalidRoomId, format!("Invalid room id: {raw}"))
                })
            });
        ready(res)
    }
}
