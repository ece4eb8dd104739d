//! tickoff: a local task list with deadlines.
//!
//! The core (`model`, `ops`, `io`, `session`) has no terminal dependency; the
//! `cli` module is the `tk` front end built on top of it.

pub mod cli;
pub mod io;
pub mod model;
pub mod ops;
pub mod session;
