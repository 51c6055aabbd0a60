//! Entity registry (SAM.gov) adapter
//!
//! Looks a business up by legal name, optionally filtered by state. The
//! source requires an API key; without one the adapter reports
//! `RequiresCredential` and never touches the network.

use super::{scalar_text, SourceAdapter};
use crate::config::EntityRegistryConfig;
use crate::models::{BusinessIdentity, SourceEnvelope, SourceKind};
use crate::services::http_transport::{HttpRequest, HttpTransport};
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

const INCLUDE_SECTIONS: &str = "entityRegistration,coreData";

/// Top-level response shape; entity records stay raw JSON and are read field
/// by field
#[derive(Debug, Deserialize)]
struct EntitySearchResponse {
    #[serde(rename = "entityData", default)]
    entity_data: Option<Vec<Value>>,
}

/// Registration summary of the first matching entity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntitySummary {
    /// Unique entity identifier
    pub uei: Option<String>,
    /// Facility (CAGE) code
    pub cage_code: Option<String>,
    pub legal_name: Option<String>,
    pub registration_status: Option<String>,
    /// Industry classification codes
    pub naics_codes: Vec<String>,
}

/// SAM.gov entity lookup
pub struct EntityRegistryAdapter {
    transport: Arc<dyn HttpTransport>,
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl EntityRegistryAdapter {
    /// `api_key` is the already-resolved credential (see
    /// [`crate::config::resolve_entity_registry_api_key`])
    pub fn new(transport: Arc<dyn HttpTransport>, config: &EntityRegistryConfig, api_key: Option<String>) -> Self {
        Self {
            transport,
            base_url: config.base_url.clone(),
            api_key: api_key.filter(|k| crate::config::is_valid_key(k)),
            timeout: config.timeout(),
        }
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    fn build_request(&self, api_key: &str, identity: &BusinessIdentity) -> HttpRequest {
        let mut request = HttpRequest::get(&self.base_url, self.timeout)
            .query("api_key", api_key)
            .query("legalBusinessName", identity.name())
            .query("includeSections", INCLUDE_SECTIONS);

        if let Some(state) = identity.state() {
            request = request.query("stateOrProvinceCode", state);
        }

        request
    }
}

/// Pull the summary out of a 200 response body
///
/// Returns `Ok(None)` for an empty result set, `Err` when the body does not
/// have the expected top-level shape.
fn extract_entity(body: Value) -> Result<Option<EntitySummary>> {
    let response: EntitySearchResponse =
        serde_json::from_value(body).context("Failed to parse SAM.gov response")?;

    let Some(entity) = response.entity_data.unwrap_or_default().into_iter().next() else {
        return Ok(None);
    };

    if !entity.is_object() {
        bail!("SAM.gov entity record is not an object");
    }

    let text_at = |pointer: &str| entity.pointer(pointer).and_then(scalar_text);

    let legal_name = text_at("/coreData/legalBusinessName")
        .or_else(|| text_at("/entityRegistration/legalBusinessName"));

    let naics_codes = entity
        .pointer("/naicsInformation/primaryNaics")
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|n| n.get("naicsCode").and_then(scalar_text))
                .collect()
        })
        .unwrap_or_default();

    Ok(Some(EntitySummary {
        uei: text_at("/entityRegistration/ueiSAM"),
        cage_code: text_at("/entityRegistration/cageCode"),
        legal_name,
        registration_status: text_at("/entityRegistration/registrationStatus"),
        naics_codes,
    }))
}

#[async_trait]
impl SourceAdapter for EntityRegistryAdapter {
    fn kind(&self) -> SourceKind {
        SourceKind::EntityRegistry
    }

    async fn query(&self, identity: &BusinessIdentity) -> Result<SourceEnvelope> {
        let Some(api_key) = self.api_key.as_deref() else {
            info!(business = %identity.name(), "SAM.gov API key not configured, skipping lookup");
            return Ok(SourceEnvelope::requires_credential(self.kind()));
        };

        let request = self.build_request(api_key, identity);
        debug!(business = %identity.name(), state = ?identity.state(), "Querying SAM.gov");

        let response = self
            .transport
            .execute(request)
            .await
            .context("SAM.gov request failed")?;

        if !response.is_ok() {
            debug!(status = response.status, "SAM.gov returned non-200, treating as not found");
            return Ok(SourceEnvelope::not_found(self.kind()));
        }

        let body = response
            .body
            .context("SAM.gov returned a response body that is not JSON")?;

        match extract_entity(body)? {
            Some(summary) => {
                info!(
                    business = %identity.name(),
                    uei = ?summary.uei,
                    "Found SAM.gov registration"
                );
                Ok(SourceEnvelope::found_with(self.kind(), &summary)?)
            }
            None => Ok(SourceEnvelope::not_found(self.kind())),
        }
    }
}
