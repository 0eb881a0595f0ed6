//! Shared helpers for the backend's integration tests: logging setup,
//! Problem Details assertions, and fresh ids.

pub mod ids;
pub mod logging;
pub mod problem_details;
