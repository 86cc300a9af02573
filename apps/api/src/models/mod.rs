//! Data shapes shared across modules.

pub mod record;
