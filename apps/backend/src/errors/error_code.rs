//! Error codes for the Tiến Lên session backend.
//!
//! This module defines all error codes used throughout the application.
//! Add new codes here; never pass ad-hoc strings as error codes.
//!
//! All error codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings
//! that appear in HTTP responses and websocket error frames.

use core::fmt;

/// Centralized error codes for the session backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Authentication & Authorization
    /// Authentication required
    Unauthorized,
    /// Missing or malformed Bearer token
    UnauthorizedMissingBearer,
    /// Invalid JWT token
    UnauthorizedInvalidJwt,
    /// JWT token has expired
    UnauthorizedExpiredJwt,
    /// Caller is not seated in the session
    NotSeated,

    // Request Validation
    /// Invalid room ID provided
    InvalidRoomId,
    /// Cards do not form a legal play or do not beat the pile
    InvalidPlay,
    /// Someone other than the turn holder acted
    NotYourTurn,
    /// Deal math impossible
    InsufficientCards,
    /// Player not part of the session
    UnknownPlayer,
    /// Player list outside 2..=4
    InvalidPlayerCount,
    /// Player listed twice
    DuplicatePlayer,
    /// Parse card error
    ParseCard,
    /// Unknown stake tier
    ParseStakeTier,
    /// General validation error
    ValidationError,
    /// General bad request error
    BadRequest,
    /// Websocket client spoke an unsupported protocol version
    BadProtocol,

    // Resource Not Found
    /// No active session for the room
    SessionNotFound,
    /// No wallet for the player
    WalletNotFound,
    /// General not found error
    NotFound,

    // Business Logic Conflicts
    /// Room already has a live session
    SessionActive,
    /// Wallet debit would go negative
    InsufficientBalance,
    /// Generic conflict (fallback for unmatched conflicts)
    Conflict,

    // System Errors
    /// Card accounting violated; session terminated
    CardsNotInHand,
    /// Data corruption detected
    DataCorruption,
    /// Internal server error
    InternalError,
    /// Configuration error
    ConfigError,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    ///
    /// This is the exact string that appears in HTTP responses.
    pub const fn as_str(&self) -> &'static str {
        match self {
            // Authentication & Authorization
            Self::Unauthorized => "UNAUTHORIZED",
            Self::UnauthorizedMissingBearer => "UNAUTHORIZED_MISSING_BEARER",
            Self::UnauthorizedInvalidJwt => "UNAUTHORIZED_INVALID_JWT",
            Self::UnauthorizedExpiredJwt => "UNAUTHORIZED_EXPIRED_JWT",
            Self::NotSeated => "NOT_SEATED",

            // Request Validation
            Self::InvalidRoomId => "INVALID_ROOM_ID",
            Self::InvalidPlay => "INVALID_PLAY",
            Self::NotYourTurn => "NOT_YOUR_TURN",
            Self::InsufficientCards => "INSUFFICIENT_CARDS",
            Self::UnknownPlayer => "UNKNOWN_PLAYER",
            Self::InvalidPlayerCount => "INVALID_PLAYER_COUNT",
            Self::DuplicatePlayer => "DUPLICATE_PLAYER",
            Self::ParseCard => "PARSE_CARD",
            Self::ParseStakeTier => "PARSE_STAKE_TIER",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::BadRequest => "BAD_REQUEST",
            Self::BadProtocol => "BAD_PROTOCOL",

            // Resource Not Found
            Self::SessionNotFound => "SESSION_NOT_FOUND",
            Self::WalletNotFound => "WALLET_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",

            // Business Logic Conflicts
            Self::SessionActive => "SESSION_ACTIVE",
            Self::InsufficientBalance => "INSUFFICIENT_BALANCE",
            Self::Conflict => "CONFLICT",

            // System Errors
            Self::CardsNotInHand => "CARDS_NOT_IN_HAND",
            Self::DataCorruption => "DATA_CORRUPTION",
            Self::InternalError => "INTERNAL_ERROR",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
