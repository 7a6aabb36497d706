//! Read entities definitions.

pub mod record;
