//! Persona Core crate - configuration, error taxonomy, and shared domain types.
//!
//! Holds everything the pipeline stages agree on:
//! - The sectioned TOML configuration, including API credentials resolved
//!   into an explicit struct rather than read ambiently by components
//! - The top-level `PersonaError` type that subsystem errors convert into
//! - Raw collected-content records and the `ContentItem` assembly rule
//! - The canonical `Persona` schema shared by aggregation and rendering

pub mod config;
pub mod error;
pub mod persona;
pub mod types;

pub use config::PersonaConfig;
pub use error::{PersonaError, Result};
pub use persona::{Demographics, Persona, PersonaPoint, Psychographics};
pub use types::{CollectedContent, ContentItem, InsightCategory, RawInsight};
