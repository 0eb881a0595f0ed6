//! Fresh identifiers so tests sharing a process never collide.

use uuid::Uuid;

pub fn unique_room() -> Uuid {
    Uuid::new_v4()
}

/// `n` distinct player ids.
pub fn unique_players(n: usize) -> Vec<Uuid> {
    (0..n).map(|_| Uuid::new_v4()).collect()
}
