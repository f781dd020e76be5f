//! Room session controller.
//!
//! A [`RoomSession`] owns the local participant, the roster, the cursor
//! map, the authoritative snapshot and the transport link for exactly one
//! room. All handlers take `&mut self` and run to completion; the driver
//! in [`run_session`] interleaves them on a single task.

mod controller;
mod driver;
mod types;


pub use controller::RoomSession;
pub use driver::run_session;
pub use types::SessionConfig;
