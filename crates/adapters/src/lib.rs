//! copy-variants adapters crate
//!
//! Infrastructure adapters implementing the domain ports:
//! - `llm`: copy writers for OpenAI-compatible and Anthropic APIs, plus
//!   stub and unconfigured writers for tests and offline runs

pub mod llm;
