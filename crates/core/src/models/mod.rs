//! Data models for The Move

mod comment;
mod moves;
mod status;
mod tags;
mod user;

pub use comment::*;
pub use moves::*;
pub use status::*;
pub use tags::*;
pub use user::*;
