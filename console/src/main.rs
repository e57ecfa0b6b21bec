//! Beereign console - terminal lot browser
//!
//! Usage: `beereign-console [raw-materials|products]`

use std::sync::Arc;

use beereign_console::config::Config;
use beereign_console::coordinator::{CoordinatorOptions, ListCoordinator};
use beereign_console::logging::{init_tracing, Logger};
use beereign_console::notify::LogNotifier;
use beereign_console::remote::ApiClient;
use beereign_console::session::{LotBrowser, HELP};
use beereign_console::ConsoleContext;
use shared::{EntityKind, ListQuery, Product, ProductBatch, RawMaterial, RawMaterialBatch};
use tokio::io::BufReader;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    // Load configuration
    let config = Config::load()?;
    tracing::info!("Starting Beereign console");
    tracing::info!("Environment: {}", config.environment);
    tracing::info!("API: {}", config.api.base_url);

    let client = ApiClient::new(&config.api)?;
    let context = ConsoleContext::new(Logger::default(), Arc::new(LogNotifier), config.language);

    let query = ListQuery {
        limit: config.listing.page_size,
        order: config.listing.order,
        stock_filter: config.listing.stock_filter,
        ..ListQuery::default()
    };
    let listing = |kind: EntityKind| {
        CoordinatorOptions::new(kind)
            .with_query(query.clone())
            .with_debounce(config.listing.debounce())
    };

    let target = std::env::args().nth(1).unwrap_or_else(|| "raw-materials".to_string());
    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    println!("{}", HELP);

    match target.as_str() {
        "products" => {
            let batches = Arc::new(client.resource::<ProductBatch>());
            let coordinator = ListCoordinator::<ProductBatch>::spawn(
                batches.clone(),
                listing(EntityKind::ProductBatch),
                context.clone(),
            );
            let products = Arc::new(client.resource::<Product>());
            LotBrowser::<Product, _, _>::new(coordinator, products, batches, context)
                .run(stdin, &mut stdout)
                .await?;
        }
        "raw-materials" => {
            let batches = Arc::new(client.resource::<RawMaterialBatch>());
            let coordinator = ListCoordinator::<RawMaterialBatch>::spawn(
                batches.clone(),
                listing(EntityKind::RawMaterialBatch),
                context.clone(),
            );
            let materials = Arc::new(client.resource::<RawMaterial>());
            LotBrowser::<RawMaterial, _, _>::new(coordinator, materials, batches, context)
                .run(stdin, &mut stdout)
                .await?;
        }
        other => anyhow::bail!("unknown lot list '{}', expected raw-materials or products", other),
    }

    tracing::info!("Console closed");
    Ok(())
}
