pub mod auth_token;
pub mod current_player;
pub mod room_id;
pub mod validated_json;

pub use auth_token::AuthToken;
pub use current_player::CurrentPlayer;
pub use room_id::RoomIdPath;
pub use validated_json::ValidatedJson;
