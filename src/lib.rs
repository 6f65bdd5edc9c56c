//! lsvedit - Baldur's Gate 3 save gold editor
//!
//! lsvedit unpacks `.lsv` save archives with LSLib's Divine tool, reads the
//! gold stacks out of the level data and writes an edited copy back as a new
//! archive, keeping a backup of the original.
//!
//! ## Layers
//!
//! 1. **Backend** ([`backend`]): the [`SaveBackend`](backend::SaveBackend)
//!    trait and its Divine-based implementation, which owns all process and
//!    file I/O.
//!
//! 2. **Gateway** ([`gateway`]): the typed command surface. Every backend
//!    failure is reported as `❌ <command>: <message>`, templated in exactly
//!    one place.
//!
//! 3. **Session** ([`session`]): the editing state a frontend binds to.
//!    Listing, extraction, gold editing and toolchain probing, each with its
//!    own status line.

pub mod backend;
pub mod config;
pub mod domain;
pub mod gateway;
pub mod session;

pub use domain::*;
