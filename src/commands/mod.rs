//! Command-line command handlers.
//!
//! `main` parses arguments and dispatches here. Handlers build nothing
//! themselves: they drive the `services` layer and report results.

pub mod health;
pub mod settings;
pub mod upload;
