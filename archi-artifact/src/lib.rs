//! # archi-artifact
//!
//! Slot storage for design documents. Every artifact type owns a `draft` and a
//! `result` slot holding one JSON document each.
//!
//! - [`ArtifactStore`] - backend trait (`read` / `write` / `exists`)
//! - [`FileArtifactStore`] - one pretty-printed file per slot, atomic replace
//! - [`InMemoryArtifactStore`] - map-backed store for tests and ephemeral servers
//! - [`ArtifactSlots`] - both slots of one artifact type

pub mod file;
pub mod inmemory;
pub mod scoped;
pub mod service;

pub use file::FileArtifactStore;
pub use inmemory::InMemoryArtifactStore;
pub use scoped::ArtifactSlots;
pub use service::{ArtifactStore, SlotKey};
