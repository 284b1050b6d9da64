//! Literalura command-line front end.
//!
//! The binary in `main.rs` bootstraps configuration, logging and the catalog
//! database, then hands stdin/stdout to [`menu::Menu`].

pub mod menu;
