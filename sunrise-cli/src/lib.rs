//! # sunrise-cli
//!
//! Command-line launcher for the Sunrise Hospital assistant.
//!
//! ```text
//! sunrise --docs hospital_docs.json --embeddings hospital_embeddings.json
//! sunrise --docs hospital_docs.json --question "When are visiting hours?"
//! ```

pub mod cli;
pub mod repl;
pub mod telemetry;

pub use cli::{Cli, LogFormat};
