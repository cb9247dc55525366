//! # Seed Data
//!
//! Creates the default Fruity Soda catalog in an empty database.
//!
//! ## Usage
//! ```bash
//! cargo run -p fizz-db --bin seed
//! cargo run -p fizz-db --bin seed -- --db ./data/fizz.db
//! cargo run -p fizz-db --bin seed -- --stock 50
//! ```

use chrono::Utc;
use fizz_core::{Money, Product, SizeVariant};
use fizz_db::repository::product::generate_product_id;
use fizz_db::{Database, DbConfig};
use std::env;

const FLAVORS: &[&str] = &["Lychee", "Strawberry", "Mango", "Blueberry", "Grape"];

/// (label, price in pesos, description)
const SIZES: &[(&str, i64, &str)] = &[
    ("12oz", 25, "Small"),
    ("16oz", 35, "Medium"),
    ("22oz", 45, "Large"),
];

const DEFAULT_STOCK: i64 = 100;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./fizz_dev.db");
    let mut stock = DEFAULT_STOCK;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--stock" | "-s" => {
                if i + 1 < args.len() {
                    stock = args[i + 1].parse().unwrap_or(DEFAULT_STOCK);
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Fizz POS Seed Data");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>     Database file path (default: ./fizz_dev.db)");
                println!("  -s, --stock <N>     Opening stock (default: {DEFAULT_STOCK})");
                println!("  -h, --help          Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Fizz POS Seed Data");
    println!("=====================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let product = fruity_soda(stock.max(0));
    db.products().insert(&product).await?;

    println!();
    println!("✓ Created {} ({})", product.name, product.sku);
    println!("  Flavors: {}", product.flavors.join(", "));
    for size in &product.sizes {
        println!("  {:<5} {} ({})", size.label, size.price(), size.description);
    }
    println!("  Stock: {}", product.stock);

    db.close().await;
    println!();
    println!("✓ Seed complete!");

    Ok(())
}

fn fruity_soda(stock: i64) -> Product {
    let now = Utc::now();

    Product {
        id: generate_product_id(),
        sku: "FS001".to_string(),
        name: "Fruity Soda".to_string(),
        description: Some(
            "Customizable fruity soda with your choice of flavor and size".to_string(),
        ),
        category: "Customizable".to_string(),
        price_cents: Money::from_major_minor(25, 0).cents(),
        stock,
        is_customizable: true,
        flavors: FLAVORS.iter().map(|f| f.to_string()).collect(),
        sizes: SIZES
            .iter()
            .map(|(label, pesos, description)| {
                SizeVariant::new(*label, Money::from_major_minor(*pesos, 0), *description)
            })
            .collect(),
        image: None,
        created_at: now,
        updated_at: now,
    }
}
