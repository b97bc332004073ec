//! Provider entity: an organisation that supplies citable resources.

use crate::services::mapper::{IDENTIFIER_FIELD, IndexEntry, MapperError, ObjectMapper, Persistable};

/// Counter key used to mint provider identifiers
pub const PROVIDER_COUNTER_KEY: &str = "nxProvId";

/// Namespace tag for the provider index list
pub const PROVIDER_NAMESPACE: &str = "Provider";

/// A provider of resources, persisted as the hash `prov:<id>`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Provider {
    pub identifier: String,
    pub name: String,
    pub icon: String,
    pub logo: String,
    pub description: String,
}

impl Provider {
    /// Create a provider with a freshly allocated identifier.
    ///
    /// The provider is not persisted until it is passed to [`ObjectMapper::save`].
    pub async fn create(mapper: &ObjectMapper, name: &str) -> Result<Self, MapperError> {
        let id = mapper.next_id(PROVIDER_COUNTER_KEY).await?;
        Ok(Self {
            identifier: id.to_string(),
            name: name.to_string(),
            ..Default::default()
        })
    }

    /// Rebuild the listing view of a provider from its index entry
    pub fn from_index(entry: IndexEntry) -> Self {
        Self {
            identifier: entry.id,
            name: entry.label,
            ..Default::default()
        }
    }

    /// Path of this provider relative to the API version root
    pub fn uri(&self) -> String {
        format!("/providers/{}", self.identifier)
    }
}

impl Persistable for Provider {
    fn key(&self) -> String {
        format!("prov:{}", self.identifier)
    }

    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn label(&self) -> &str {
        &self.name
    }

    fn namespace_tag(&self) -> &'static str {
        PROVIDER_NAMESPACE
    }

    fn fields(&self) -> Vec<(&'static str, &str)> {
        vec![
            (IDENTIFIER_FIELD, &self.identifier),
            ("Name", &self.name),
            ("Icon", &self.icon),
            ("Logo", &self.logo),
            ("Description", &self.description),
        ]
    }
}
