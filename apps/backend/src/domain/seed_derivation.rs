//! RNG seed derivation for deterministic dealing.
//!
//! A single configured base seed fans out into one seed per room so that two
//! rooms never share a shuffle even when the operator pins `DEAL_SEED`.

use uuid::Uuid;

/// Derive the dealing seed for a room from the configured base seed.
///
/// Same base + same room = same seed. The room id is folded in 64 bits at a
/// time through a SplitMix64 finaliser so neighbouring ids spread out.
pub fn derive_dealing_seed(base_seed: u64, room_id: Uuid) -> u64 {
    let (hi, lo) = room_id.as_u64_pair();
    mix(base_seed
        .wrapping_add(mix(hi))
        .wrapping_add(mix(lo).rotate_left(17))
        .wrapping_add(2))
}

fn mix(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E3779B97F4A7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}
