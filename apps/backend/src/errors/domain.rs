//! Domain-level error type used across the engine and services.
//!
//! This error type is HTTP- and transport-agnostic. Handlers return
//! `Result<T, crate::error::AppError>` and convert from `DomainError`
//! using the provided `From<DomainError> for AppError` implementation.

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Rule and input violations. Reported to the acting player only.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationKind {
    /// Classification failed or the play does not beat the pile.
    InvalidPlay,
    /// Someone other than the turn holder tried to act.
    NotYourTurn,
    /// Deal math impossible for the requested player count.
    InsufficientCards,
    /// Player is not seated in the session.
    UnknownPlayer,
    InvalidPlayerCount,
    DuplicatePlayer,
    ParseCard,
    ParseStakeTier,
    Other(String),
}

/// Semantic conflicts with existing state.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConflictKind {
    /// A live session already exists for the room.
    SessionActive,
    /// Wallet debit would go negative.
    InsufficientBalance,
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NotFoundKind {
    Session,
    Wallet,
    Other(String),
}

/// Integrity violations. Fatal to the affected session.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum IntegrityKind {
    CardsNotInHand,
    Other(String),
}

/// Central domain error type
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Input/user validation or business rule violation
    Validation(ValidationKind, String),
    /// Semantic conflict
    Conflict(ConflictKind, String),
    /// Missing resource in domain terms
    NotFound(NotFoundKind, String),
    /// Card accounting no longer adds up
    Integrity(IntegrityKind, String),
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DomainError::Validation(kind, d) => write!(f, "validation error {kind:?}: {d}"),
            DomainError::Conflict(kind, d) => write!(f, "conflict {kind:?}: {d}"),
            DomainError::NotFound(kind, d) => write!(f, "not found {kind:?}: {d}"),
            DomainError::Integrity(kind, d) => write!(f, "integrity violation {kind:?}: {d}"),
        }
    }
}

impl Error for DomainError {}

impl DomainError {
    pub fn validation(kind: ValidationKind, detail: impl Into<String>) -> Self {
        Self::Validation(kind, detail.into())
    }
    pub fn validation_other(detail: impl Into<String>) -> Self {
        let detail = detail.into();
        Self::Validation(ValidationKind::Other(detail.clone()), detail)
    }
    pub fn conflict(kind: ConflictKind, detail: impl Into<String>) -> Self {
        Self::Conflict(kind, detail.into())
    }
    pub fn not_found(kind: NotFoundKind, detail: impl Into<String>) -> Self {
        Self::NotFound(kind, detail.into())
    }
    pub fn integrity(kind: IntegrityKind, detail: impl Into<String>) -> Self {
        Self::Integrity(kind, detail.into())
    }

    pub fn invalid_play(detail: impl Into<String>) -> Self {
        Self::validation(ValidationKind::InvalidPlay, detail)
    }

    pub fn session_not_found(room_id: impl Display) -> Self {
        Self::not_found(
            NotFoundKind::Session,
            format!("No active session for room {room_id}"),
        )
    }

    /// Integrity errors end the session; everything else leaves it untouched.
    pub fn is_fatal(&self) -> bool {
        matches!(self, DomainError::Integrity(..))
    }

    pub fn validation_kind(&self) -> Option<&ValidationKind> {
        match self {
            DomainError::Validation(kind, _) => Some(kind),
            _ => None,
        }
    }
}
