//! # Seed Data Generator
//!
//! Fills a local store with the sample kitchenware catalogue for development.
//!
//! ## Usage
//! ```bash
//! # Seed ./estoque_dev.db (or $ESTOQUE_DB_PATH)
//! cargo run -p estoque-store --bin seed
//!
//! # Specify database path
//! cargo run -p estoque-store --bin seed -- --db ./data/estoque.db
//! ```
//!
//! Seeding is skipped when the collection already has products.

use std::env;

use estoque_core::samples::sample_products;
use estoque_store::{Database, DbConfig, LocalProductStore};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_DB_PATH: &str = "./estoque_dev.db";

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,estoque=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args: Vec<String> = env::args().collect();

    let mut db_path = env::var("ESTOQUE_DB_PATH").unwrap_or_else(|_| DEFAULT_DB_PATH.to_string());

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Estoque Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: {DEFAULT_DB_PATH})");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            other => warn!(arg = %other, "Ignoring unknown argument"),
        }
        i += 1;
    }

    info!(path = %db_path, "Seeding local store");

    let db = Database::new(DbConfig::new(&db_path)).await?;
    let products = LocalProductStore::new(db.clone());

    let existing = products.count().await?;
    if existing > 0 {
        warn!(existing, "Store already has products, skipping seed");
        println!("Database already has {existing} products. Delete the file to regenerate.");
        db.close().await;
        return Ok(());
    }

    let mut created = 0usize;
    for sample in sample_products() {
        let name = sample.name.clone();
        match products.create(sample).await {
            Ok(product) => {
                info!(id = %product.id, name = %product.name, "Seeded product");
                created += 1;
            }
            Err(e) => warn!(name = %name, error = %e, "Failed to seed product"),
        }
    }

    println!("Seeded {created} products into {db_path}");
    db.close().await;
    Ok(())
}
