//! # Catalog Demo
//!
//! Runs a short session against the catalog:
//! 1. Loads [`CatalogConfig`] from the environment.
//! 2. Builds the [`CatalogSystem`].
//! 3. Creates items (one of them invalid), renames, searches and deletes.
//!
//! ```bash
//! RUST_LOG=info cargo run -p mediator-sample
//! CATALOG_MAX_NAME_LEN=8 RUST_LOG=debug cargo run -p mediator-sample
//! ```

use mediator_framework::tracing::setup_tracing;
use mediator_sample::config::CatalogConfig;
use mediator_sample::lifecycle::CatalogSystem;
use tracing::{error, info, Instrument};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Setup tracing once for the entire application
    setup_tracing();

    let config = CatalogConfig::from_env()?;
    info!(max_name_len = config.max_name_len, "Starting catalog demo");

    let system = CatalogSystem::new(config);

    let span = tracing::info_span!("item_creation");
    let lamp = async { system.client.create_item("Desk Lamp", 39.90).await }
        .instrument(span)
        .await?;
    info!(item_id = %lamp, "Item created successfully");

    let chair = system.client.create_item("Office Chair", 149.00).await?;
    info!(item_id = %chair, "Item created successfully");

    // Blank name and negative price: rejected before reaching the handler
    match system.client.create_item("   ", -5.0).await {
        Ok(id) => error!(item_id = %id, "Invalid item was accepted"),
        Err(e) => info!(error = %e, fields = ?e.invalid_fields(), "Invalid item rejected"),
    }

    // Same name twice: rejected by the handler
    if let Err(e) = system.client.create_item("desk lamp", 10.0).await {
        info!(error = %e, "Duplicate item rejected");
    }

    let renamed = system.client.rename_item(lamp, "Reading Lamp").await?;
    info!(item_id = %renamed.id, name = %renamed.name, "Item renamed");

    let hits = system.search.search("lamp").await;
    info!(?hits, "Search for 'lamp'");

    system.client.delete_item(chair).await?;
    let line = system.client.describe_item(chair).await?;
    info!(%line, "After delete");

    for entry in system.audit.entries().await {
        info!(%entry, "Audit");
    }

    let items = system.store.len().await;
    info!(items, "Demo completed successfully");
    Ok(())
}
