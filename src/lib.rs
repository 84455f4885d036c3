//! Discograph core: the pure computation engine behind the music-discovery
//! graph explorer.
//!
//! The crate ingests an NDJSON album dump, scores recommendation edges,
//! builds per-view node graphs, lays them out (grid or tree), sequences the
//! measure/layout handshake, and computes camera limits and visibility
//! windows. Rendering, gestures, and animation timing live in the frontend;
//! everything here is deterministic and synchronous.

pub mod catalog;
pub mod error;
pub mod layout;
pub mod output;
pub mod positioning;
pub mod recommend;
pub mod view;
pub mod viewport;
pub mod wasm;
pub mod windowing;

pub use error::{CoreError, Result};
