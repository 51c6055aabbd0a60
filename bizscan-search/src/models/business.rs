//! Business identity read from the input list

use crate::error::{SearchError, SearchResult};
use serde::{Deserialize, Serialize};

/// One business to look up
///
/// Immutable once built. `name` is never blank; optional location fields
/// are `None` rather than empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawIdentity")]
pub struct BusinessIdentity {
    name: String,
    city: Option<String>,
    state: Option<String>,
    zip: Option<String>,
}

impl BusinessIdentity {
    /// Create an identity from a business name (trimmed, must be non-empty)
    pub fn new(name: impl Into<String>) -> SearchResult<Self> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(SearchError::InvalidIdentity(
                "business name must not be empty".to_string(),
            ));
        }

        Ok(Self {
            name: trimmed.to_string(),
            city: None,
            state: None,
            zip: None,
        })
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = non_blank(city.into());
        self
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = non_blank(state.into());
        self
    }

    pub fn with_zip(mut self, zip: impl Into<String>) -> Self {
        self.zip = non_blank(zip.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    pub fn zip(&self) -> Option<&str> {
        self.zip.as_deref()
    }

    /// "City, ST, 12345" from whichever location parts are present
    pub fn location_label(&self) -> Option<String> {
        let parts: Vec<&str> = [self.city(), self.state(), self.zip()]
            .into_iter()
            .flatten()
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}

/// Unvalidated wire shape; deserialization goes through [`BusinessIdentity::new`]
#[derive(Deserialize)]
struct RawIdentity {
    name: String,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    zip: Option<String>,
}

impl TryFrom<RawIdentity> for BusinessIdentity {
    type Error = SearchError;

    fn try_from(raw: RawIdentity) -> SearchResult<Self> {
        let mut identity = BusinessIdentity::new(raw.name)?;
        identity.city = raw.city.and_then(non_blank);
        identity.state = raw.state.and_then(non_blank);
        identity.zip = raw.zip.and_then(non_blank);
        Ok(identity)
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
