//! Domain definitions.

pub mod record;
pub mod user;

pub use self::{record::Record, user::Session};
