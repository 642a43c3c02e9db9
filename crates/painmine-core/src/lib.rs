//! Shared domain types, configuration, and text utilities for the
//! painmine pipeline.

pub mod config;
pub mod dates;
pub mod error;
pub mod text;
pub mod types;

pub use config::{build_config, load_config, MiningConfig, Period};
pub use dates::parse_iso_date;
pub use error::CoreError;
pub use text::{sentence_spans, strip_markup};
pub use types::{
    CitationEdge, EmergingTopic, Idea, PainSignal, Post, ScoredSignal, SignalLocation, SignalType,
};
