//! copy-variants domain crate
//!
//! This crate contains the core domain logic following hexagonal architecture:
//! - `model`: Plans, variant specs, generated variants and their warnings
//! - `platforms`: Static catalog of publishing surfaces
//! - `rng`: Seeded generator that makes planning reproducible
//! - `text`: Normalization, paraphrase and the no-verbatim sanitizer
//! - `policy`: Budget and brand constraints
//! - `ports`: Trait definitions for external dependencies (adapters)
//! - `usecases`: Planning, generation, length fitting and diversification

pub mod model;
pub mod platforms;
pub mod policy;
pub mod ports;
pub mod rng;
pub mod text;
pub mod usecases;

pub use model::*;
pub use ports::*;
