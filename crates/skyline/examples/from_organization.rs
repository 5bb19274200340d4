//! Example: Computing and caching a layout for a small organization
//!
//! This example builds an in-memory organization, computes its layout through
//! a file-backed cache, and prints the resulting positions as JSON.

use skyline::{
    LayoutService,
    cache::FileCacheStore,
    config::AppConfig,
    item::LayoutItem,
    store::InMemoryEntityStore,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut entities = InMemoryEntityStore::new();

    entities.add_domain(LayoutItem::new("payments", "Payments"));
    entities.add_domain(LayoutItem::new("identity", "Identity"));

    entities.add_team("payments", LayoutItem::new("checkout", "Checkout").with_size(60.0));
    entities.add_team("payments", LayoutItem::new("ledger", "Ledger").with_size(30.0));
    entities.add_team("identity", LayoutItem::new("auth", "Auth"));

    for (team, service) in [
        ("checkout", "Cart API"),
        ("checkout", "Pricing"),
        ("ledger", "Journal"),
        ("auth", "Login"),
    ] {
        let id = service.to_lowercase().replace(' ', "-");
        entities.add_service(team, LayoutItem::new(id, service).with_tier("standard"));
    }

    let cache_dir = tempfile::tempdir()?;
    let service = LayoutService::from_config(
        &AppConfig::default(),
        entities,
        FileCacheStore::new(cache_dir.path())?,
    )?;

    let layout = service.get_layout()?;
    println!("{}", serde_json::to_string_pretty(&layout)?);
    println!("Cache state: {:?}", service.cache_state()?);

    Ok(())
}
