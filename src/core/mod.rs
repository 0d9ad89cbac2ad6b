//! Core engine: constants, content registry, the session and its tick.

pub mod constants;
pub mod content;
pub mod session;
pub mod tick;
pub mod view;

pub use constants::*;
pub use content::*;
pub use session::*;
pub use tick::*;
pub use view::*;
