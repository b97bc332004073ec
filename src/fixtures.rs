//! Seed data for local runs and integration tests.

use crate::{
    models::Provider,
    services::{MapperError, ObjectMapper, Persistable},
};
use tracing::info;

/// Sequence counters and their starting values
pub const FIXTURE_COUNTERS: [(&str, &str); 4] = [
    ("nxUserId", "1000"),
    ("nxProvId", "1000"),
    ("nxRsrcId", "1000"),
    ("nxTextId", "1000"),
];

pub const FIXTURE_PROVIDERS: [&str; 3] = [
    "National Library of Medicine",
    "FactCheck.org",
    "OpenLibrary.org",
];

/// Remove every key from the store behind `mapper`
pub async fn flush_store(mapper: &ObjectMapper) -> Result<(), MapperError> {
    mapper.store().flush_all().await?;
    info!(target: "store", "Flushed store");
    Ok(())
}

/// Reset the counters and save the fixture providers
pub async fn load_fixtures(mapper: &ObjectMapper) -> Result<Vec<Provider>, MapperError> {
    for (key, value) in FIXTURE_COUNTERS {
        mapper.store().set(key, value).await?;
    }

    let mut providers = Vec::with_capacity(FIXTURE_PROVIDERS.len());
    for name in FIXTURE_PROVIDERS {
        providers.push(Provider::create(mapper, name).await?);
    }

    let entities: Vec<&dyn Persistable> = providers.iter().map(|p| p as &dyn Persistable).collect();
    mapper.save(&entities).await?;

    info!(target: "store", providers = providers.len(), "Loaded fixtures");
    Ok(providers)
}
