//! tunegate upstream clients
//!
//! This crate provides the clients tunegate uses to talk to the outside
//! world: the mirror instances that resolve playable streams, and the
//! catalog provider that answers metadata queries.

pub mod catalog;
pub mod client;
pub mod error;
pub mod models;

#[cfg(test)]
mod testing;

pub use catalog::{CatalogClient, RemoteCatalog, RemoteCatalogConfig, WatchPlaylistRequest};
pub use client::{MirrorBackend, MirrorClient, MirrorClientConfig};
pub use error::{CatalogError, ProxyError};
pub use models::{StreamDescriptor, StreamVariant};
