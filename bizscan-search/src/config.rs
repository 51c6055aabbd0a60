//! Configuration for bizscan-search
//!
//! Loaded from the TOML bootstrap file (see [`bizscan_common::config`]); every
//! field has a compiled default so an absent file yields a working setup.
//!
//! ```toml
//! [output]
//! dir = "reports"
//!
//! [rate_limits]
//! spending_records_secs = 0.5
//!
//! [entity_registry]
//! timeout_secs = 30
//! ```

use bizscan_common::config::LoggingConfig;
use bizscan_common::time::secs_f64_to_duration;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

/// Environment variable holding the entity registry API key
pub const ENTITY_REGISTRY_KEY_ENV: &str = "SAM_API_KEY";

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const ENTITY_REGISTRY_URL: &str = "https://api.sam.gov/entity-information/v3/entities";
const SPENDING_RECORDS_URL: &str = "https://api.usaspending.gov/api/v2/search/spending_by_award/";
const PUBLIC_FILINGS_URL: &str = "https://www.sec.gov/files/company_tickers.json";
const PUBLIC_FILINGS_USER_AGENT: &str = "Business Search Tool contact@yourcompany.com";

/// Top-level bizscan-search configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub logging: LoggingConfig,
    pub output: OutputConfig,
    pub rate_limits: RateLimitConfig,
    pub entity_registry: EntityRegistryConfig,
    pub spending_records: SpendingRecordsConfig,
    pub public_filings: PublicFilingsConfig,
}

/// Where reports are written
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub html: bool,
    pub json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            html: true,
            json: true,
        }
    }
}

/// Courtesy delays in seconds
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct RateLimitConfig {
    pub entity_registry_secs: f64,
    pub spending_records_secs: f64,
    pub public_filings_secs: f64,
    pub small_business_secs: f64,
    pub inter_business_secs: f64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            entity_registry_secs: 1.0,
            spending_records_secs: 0.5,
            public_filings_secs: 1.0,
            small_business_secs: 0.5,
            inter_business_secs: 1.0,
        }
    }
}

impl RateLimitConfig {
    /// All delays zero; used by tests and dry runs
    pub fn disabled() -> Self {
        Self {
            entity_registry_secs: 0.0,
            spending_records_secs: 0.0,
            public_filings_secs: 0.0,
            small_business_secs: 0.0,
            inter_business_secs: 0.0,
        }
    }

    pub fn inter_business(&self) -> Duration {
        secs_f64_to_duration(self.inter_business_secs)
    }
}

/// Entity registry endpoint and credential
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EntityRegistryConfig {
    pub base_url: String,
    /// Fallback API key; the environment variable takes priority
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for EntityRegistryConfig {
    fn default() -> Self {
        Self {
            base_url: ENTITY_REGISTRY_URL.to_string(),
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl EntityRegistryConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Spending records endpoint and search shape
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SpendingRecordsConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    /// Award type codes sent in the search filter (contracts)
    pub award_type_codes: Vec<String>,
    /// Maximum awards requested from the source
    pub result_limit: u32,
}

impl Default for SpendingRecordsConfig {
    fn default() -> Self {
        Self {
            base_url: SPENDING_RECORDS_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            award_type_codes: ["A", "B", "C", "D"].iter().map(|c| c.to_string()).collect(),
            result_limit: 10,
        }
    }
}

impl SpendingRecordsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Public filings directory endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PublicFilingsConfig {
    pub directory_url: String,
    /// Descriptive client identification the source requires
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for PublicFilingsConfig {
    fn default() -> Self {
        Self {
            directory_url: PUBLIC_FILINGS_URL.to_string(),
            user_agent: PUBLIC_FILINGS_USER_AGENT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl PublicFilingsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Resolve the entity registry API key
///
/// **Priority:** ENV → TOML. Returns `None` when neither holds a usable key,
/// in which case the entity registry adapter reports `RequiresCredential`.
pub fn resolve_entity_registry_api_key(toml_key: Option<&str>) -> Option<String> {
    let env_key = std::env::var(ENTITY_REGISTRY_KEY_ENV).ok();

    if let (Some(env), Some(toml)) = (&env_key, toml_key) {
        if is_valid_key(env) && is_valid_key(toml) {
            warn!(
                "Entity registry API key found in environment and TOML. Using environment (highest priority)."
            );
        }
    }

    if let Some(key) = env_key.filter(|k| is_valid_key(k)) {
        info!("Entity registry API key loaded from environment variable");
        return Some(key.trim().to_string());
    }

    if let Some(key) = toml_key.filter(|k| is_valid_key(k)) {
        info!("Entity registry API key loaded from TOML config");
        return Some(key.trim().to_string());
    }

    warn!(
        "Entity registry API key not configured (set {} or entity_registry.api_key)",
        ENTITY_REGISTRY_KEY_ENV
    );
    None
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}
