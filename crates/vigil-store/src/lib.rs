//! Persisted key-value storage for Vigil.
//!
//! This crate is the storage boundary of the stack. The session layer
//! never talks to a concrete storage mechanism; it only sees the
//! [`KeyValueStore`] trait defined here:
//!
//! - **Trait** ([`KeyValueStore`]) — `get`/`set`/`remove` over string
//!   entries, the same contract a browser's local storage offers.
//! - **Implementation** ([`MemoryStore`]) — an in-process map. The
//!   default store for embedding, and the fake used throughout tests.
//! - **Keys** ([`keys`]) — the well-known entry names shared with the
//!   rest of the console (credentials and the configured timeout).
//! - **Settings** ([`settings`]) — typed accessors over those entries
//!   with fallback-to-default parsing.
//!
//! # Architecture
//!
//! ```text
//! Session layer (above)  ← reads the timeout, clears credentials
//!     ↕
//! Store layer (this crate)  ← named string entries, no semantics
//! ```

// ---------------------------------------------------------------------------
// Module declarations
// ---------------------------------------------------------------------------

pub mod keys;
pub mod settings;
mod store;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use store::{KeyValueStore, MemoryStore};
