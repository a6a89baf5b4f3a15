//! Mirror fleet management
//!
//! This module provides:
//! - The static, ordered registry of mirror instances
//! - Concurrent availability probing and preferred-instance selection
//! - Concurrent stream resolution with first-in-registration-order selection

mod fleet;
mod registry;
mod resolver;

#[cfg(test)]
pub(crate) mod testing;

pub use fleet::MirrorFleet;
pub use registry::{Instance, MirrorRegistry};
pub use resolver::{ResolvedAudio, ResolvedStreams};
