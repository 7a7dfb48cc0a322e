//! # keystone
//!
//! Command-line front end of the Keystone network metrics engine. The
//! binary in `main.rs` only initializes logging and dispatches to [`cli`].

pub mod cli;
