//! Character model: attributes, class templates, pools, leveling and rebirth.

pub mod attributes;
pub mod cheats;
pub mod class;
pub mod derived_stats;
pub mod model;
pub mod progression;

pub use attributes::*;
pub use cheats::*;
pub use class::*;
pub use derived_stats::*;
pub use model::*;
pub use progression::*;
