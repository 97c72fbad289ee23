//! Schema-driven admin panel for relational tables.
//!
//! The client side ([`Panel`]) lists tables, renders their rows and runs
//! create/update/delete round trips against any [`Backend`]. The server side
//! ([`router`] over a [`Store`]) exposes the REST surface it consumes.

pub mod libs;

pub use libs::*;
