pub mod events;

pub use events::{PrivateEvent, RoomEvent};
