pub mod errors;
pub mod id;
pub mod types;

pub use errors::{ConfigError, RoomsyncError, SyncError};
pub use id::{new_id, new_room_code, RoomId};
pub use types::{Color, Palette, Position, ScreenPoint};

pub type Result<T> = std::result::Result<T, RoomsyncError>;
