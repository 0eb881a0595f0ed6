pub mod claims;
pub mod jwt;

pub use claims::PlayerClaims;
pub use jwt::{mint_access_token, verify_access_token, ACCESS_TOKEN_TTL};
