//! Local persistence of client settings as a JSON file.
//!
//! Upload history is deliberately not persisted; it lives only as long as the store.

pub mod settings;
