//! Foundation utilities shared by the simulation core
//!
//! Math types and logging helpers. Everything here is domain-neutral;
//! the simulation modules build on top of it.

pub mod logging;
pub mod math;
