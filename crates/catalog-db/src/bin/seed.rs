//! # Seed Data Generator
//!
//! Populates the database with sample products for development.
//!
//! ## Usage
//! ```bash
//! # Generate 250 products (default) at the configured path
//! cargo run -p catalog-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p catalog-db --bin seed -- --count 1000
//!
//! # Specify database path
//! cargo run -p catalog-db --bin seed -- --db ./data/catalog.db
//! ```
//!
//! Every product goes through the same save path as the editor, so each one
//! gets a base unit, up to two alternate units and up to three price brackets.

use std::env;
use std::path::PathBuf;
use std::time::Instant;

use catalog_core::{CostingMethod, EditableGrid, ProductDraft, ProductType};
use catalog_db::{CatalogConfig, Database, SaveCoordinator};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Product families with their base unit and alternate units (name, quantity).
const FAMILIES: &[(&str, &str, &[(&str, u64)], &[&str])] = &[
    (
        "Beverage",
        "bottle",
        &[("pack", 6), ("crate", 24)],
        &["Cola", "Lemon Soda", "Mineral Water", "Iced Tea", "Orange Juice"],
    ),
    (
        "Snack",
        "bag",
        &[("box", 12)],
        &["Potato Chips", "Peanuts", "Crackers", "Wafer", "Pretzels"],
    ),
    (
        "Grocery",
        "kg",
        &[("sack", 25)],
        &["Rice", "Sugar", "Flour", "Salt", "Green Beans"],
    ),
    (
        "Household",
        "pcs",
        &[("dozen", 12), ("carton", 48)],
        &["Soap Bar", "Toothbrush", "Sponge", "Candle", "Lighter"],
    ),
];

/// Variants appended to names to keep them unique.
const VARIANTS: &[&str] = &[
    "Small", "Medium", "Large", "Family", "Mini", "Regular", "Extra", "Premium", "Value", "Classic",
    "Light",
];

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,catalog=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args: Vec<String> = env::args().collect();

    let mut count: usize = 250;
    let mut db_path: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(250);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Catalog Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: 250)");
                println!("  -d, --db <PATH>    Database file path (default: from catalog.toml)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    let mut config = CatalogConfig::load(None)?;
    if let Some(path) = db_path {
        config.database.path = path;
    }

    info!(path = %config.database.path.display(), count, "Seeding catalog");

    let db = Database::new(config.db_config()).await?;

    let existing = db.products().count().await?;
    if existing > 0 {
        warn!(existing, "Database already has products, skipping seed");
        return Ok(());
    }

    let mut coordinator = SaveCoordinator::new(db.clone());
    let mut generated = 0;
    let mut failed = 0;
    let start = Instant::now();

    'outer: for variant in VARIANTS {
        for (family_idx, (family, base_unit, units, names)) in FAMILIES.iter().enumerate() {
            for (name_idx, name) in names.iter().enumerate() {
                if generated >= count {
                    break 'outer;
                }

                let seed = generated + family_idx * 7 + name_idx;
                let mut draft = match sample_draft(family, name, variant, base_unit, units, seed) {
                    Ok(draft) => draft,
                    Err(e) => {
                        warn!(name = %name, error = %e, "Skipping sample product");
                        failed += 1;
                        continue;
                    }
                };

                if let Err(e) = coordinator.save(&mut draft).await {
                    warn!(name = %draft.record().name, error = %e, "Failed to save product");
                    failed += 1;
                    continue;
                }

                generated += 1;
                if generated % 50 == 0 {
                    info!(generated, "Progress");
                }
            }
        }
    }

    let elapsed = start.elapsed();
    info!(
        generated,
        failed,
        elapsed_ms = elapsed.as_millis() as u64,
        rate = generated as f64 / elapsed.as_secs_f64().max(f64::EPSILON),
        "Seed complete"
    );

    let listed = db.products().list().await?;
    info!(listed = listed.len(), "Products visible to the editor");

    db.close().await;
    Ok(())
}

/// Builds one product through the editor's own grid validation.
fn sample_draft(
    family: &str,
    name: &str,
    variant: &str,
    base_unit: &str,
    units: &[(&str, u64)],
    seed: usize,
) -> Result<ProductDraft, Box<dyn std::error::Error>> {
    let mut draft = ProductDraft::new();
    draft.set_name(&format!("{} {} ({})", name, variant, family));
    draft.set_base_unit(base_unit);
    draft.set_product_type(ProductType::ALL[seed % 2]);
    draft.set_costing_method(CostingMethod::ALL[seed % CostingMethod::ALL.len()]);

    // Cost between 1_000 and 9_000 in whole currency units.
    let cost = 1_000 + (seed * 37 % 80) as u64 * 100;
    draft.set_manual_cost(&cost.to_string())?;
    draft.set_average_cost(&(cost + 50).to_string())?;
    draft.set_last_purchase_cost(&(cost + 100).to_string())?;

    for (row, (unit, quantity)) in units.iter().enumerate() {
        let grid = draft.units_mut();
        grid.set(row, 0, unit)?;
        grid.set(row, 1, &quantity.to_string())?;
    }

    let retail = cost * 13 / 10;
    let brackets = [
        ("1 - 11".to_string(), retail),
        ("12 - 47".to_string(), retail * 95 / 100),
        (">= 48".to_string(), retail * 90 / 100),
    ];
    for (row, (quantity, price)) in brackets.iter().enumerate().take(1 + seed % 3) {
        let grid = draft.prices_mut();
        grid.set(row, 0, quantity)?;
        grid.set(row, 1, &price.to_string())?;
        grid.set(row, 2, &format!("{} - {}", price * 97 / 100, price))?;
    }

    Ok(draft)
}
