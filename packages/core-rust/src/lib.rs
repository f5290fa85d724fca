//! `groupgate` Core — identity context, status taxonomy, and group API messages.

pub mod context;
pub mod messages;
pub mod status;

pub use context::{ClientAddress, IdentityContext};
pub use status::{Status, StatusCode};
