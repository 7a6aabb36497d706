//! Long-running [`Task`]s definitions.

mod background;
pub mod session_gate;

pub use common::Handler as Task;

pub use self::{background::Background, session_gate::SessionGate};
