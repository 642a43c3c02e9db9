//! Pipeline configuration.
//!
//! Defaults can be overridden by `PAINMINE_*` environment variables;
//! the CLI layers its flag overrides on top of whatever this module
//! resolves.

use crate::error::CoreError;

/// Period granularity for trend bucketing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Week,
    Month,
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Period::Week => write!(f, "week"),
            Period::Month => write!(f, "month"),
        }
    }
}

impl std::str::FromStr for Period {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "week" => Ok(Period::Week),
            "month" => Ok(Period::Month),
            other => Err(CoreError::InvalidConfig {
                key: "period".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

/// Tunable knobs of the mining pipeline.
///
/// The similarity threshold used by the clusterer is a fixed design
/// constant (see `painmine_analysis::cluster::SIMILARITY_THRESHOLD`),
/// not a config field.
#[derive(Debug, Clone)]
pub struct MiningConfig {
    /// Posts with a parseable date older than this are skipped during
    /// extraction. Posts without a parseable date are always kept.
    pub max_age_days: i64,
    /// Vocabulary cap for the shared signal vectorizer.
    pub max_features: usize,
    /// Trend bucketing granularity.
    pub period: Period,
    /// Cap on the number of returned ideas.
    pub top_n: usize,
}

impl Default for MiningConfig {
    fn default() -> Self {
        MiningConfig {
            max_age_days: 365,
            max_features: 200,
            period: Period::Month,
            top_n: 20,
        }
    }
}

/// Load configuration from the process environment, falling back to
/// defaults for unset variables. Loads `.env` files first.
///
/// # Errors
///
/// Returns `CoreError::InvalidConfig` if a set variable fails to parse.
pub fn load_config() -> Result<MiningConfig, CoreError> {
    dotenvy::dotenv().ok();
    build_config(|key| std::env::var(key))
}

/// Build configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a
/// plain map lookup.
pub fn build_config<F>(lookup: F) -> Result<MiningConfig, CoreError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let mut config = MiningConfig::default();

    if let Ok(raw) = lookup("PAINMINE_MAX_AGE_DAYS") {
        config.max_age_days = parse(&raw, "PAINMINE_MAX_AGE_DAYS")?;
    }
    if let Ok(raw) = lookup("PAINMINE_MAX_FEATURES") {
        config.max_features = parse(&raw, "PAINMINE_MAX_FEATURES")?;
    }
    if let Ok(raw) = lookup("PAINMINE_PERIOD") {
        config.period = raw.parse()?;
    }
    if let Ok(raw) = lookup("PAINMINE_TOP_N") {
        config.top_n = parse(&raw, "PAINMINE_TOP_N")?;
    }

    Ok(config)
}

fn parse<T: std::str::FromStr>(raw: &str, key: &str) -> Result<T, CoreError> {
    raw.parse().map_err(|_| CoreError::InvalidConfig {
        key: key.to_string(),
        value: raw.to_string(),
    })
}
