//! Core library for the `weatherbot` assistant.
//!
//! This crate defines:
//! - Question understanding: location/keyword extraction and intent resolution
//! - Query building and answer composition
//! - Abstraction over weather providers
//! - Configuration & credentials handling
//!
//! It is used by `weatherbot-cli`, but can also be reused by other front ends
//! (a GUI or a voice loop only needs to feed text in and read text out).

pub mod assistant;
pub mod compose;
pub mod config;
pub mod error;
pub mod extract;
pub mod intent;
pub mod model;
pub mod nlp;
pub mod provider;
pub mod query;

pub use assistant::{Answer, Assistant};
pub use config::{Config, ProviderConfig};
pub use error::{BotError, ProviderError};
pub use model::{AttributeKind, IntentKind, Query, QueryDescriptor, Units, WeatherRecord};
pub use nlp::{LanguageModel, LexiconModel};
pub use provider::{ProviderId, WeatherProvider};
