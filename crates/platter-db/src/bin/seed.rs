//! # Menu Seeder
//!
//! Loads the storefront's dish catalog into the database.
//!
//! ## Usage
//! ```bash
//! # Seed ./platter.db (skipped if dishes already exist)
//! cargo run -p platter-db --bin seed
//!
//! # Specify database path
//! cargo run -p platter-db --bin seed -- --db ./data/platter.db
//!
//! # Replace the existing menu
//! cargo run -p platter-db --bin seed -- --reset
//! ```
//!
//! ## Menu
//! 35 dishes across Indian, Chinese, Italian, Mexican, Arabian and
//! Continental cuisines plus a beverages section. Prices are whole rupees.

use std::path::PathBuf;

use anyhow::Context;
use chrono::{DateTime, Duration, Utc};
use clap::Parser;
use platter_core::Dish;
use platter_db::{Database, DbConfig};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// Platter menu seeder
#[derive(Debug, Parser)]
#[command(name = "seed", version, about = "Loads the Platter dish catalog")]
struct Cli {
    /// Database file path
    #[arg(short, long, default_value = "./platter.db")]
    db: PathBuf,

    /// Delete existing dishes before seeding
    #[arg(short, long)]
    reset: bool,
}

/// (name, cuisine, category, is_veg, price in rupees, description)
const MENU: &[(&str, &str, &str, bool, i64, &str)] = &[
    // Indian
    ("Butter Chicken", "Indian", "Mains", false, 320, "Creamy tomato-based curry with tender chicken pieces"),
    ("Paneer Tikka", "Indian", "Starters", true, 180, "Marinated cottage cheese grilled to perfection"),
    ("Dal Makhani", "Indian", "Mains", true, 150, "Creamy black lentils cooked with butter and cream"),
    ("Biryani", "Indian", "Mains", false, 280, "Fragrant basmati rice with spiced meat"),
    ("Samosa", "Indian", "Appetizers", true, 40, "Crispy pastry filled with spiced potatoes"),
    ("Mango Lassi", "Indian", "Beverages", true, 80, "Refreshing yogurt drink with mango"),
    ("Gulab Jamun", "Indian", "Desserts", true, 90, "Sweet milk dumplings in sugar syrup"),
    // Chinese
    ("Kung Pao Chicken", "Chinese", "Mains", false, 280, "Spicy stir-fried chicken with peanuts"),
    ("Spring Rolls", "Chinese", "Starters", true, 120, "Crispy vegetable rolls with dipping sauce"),
    ("Sweet and Sour Pork", "Chinese", "Mains", false, 300, "Tender pork in tangy sweet and sour sauce"),
    ("Mapo Tofu", "Chinese", "Mains", true, 200, "Spicy Sichuan tofu in chili sauce"),
    ("Dim Sum", "Chinese", "Appetizers", false, 180, "Steamed dumplings with various fillings"),
    ("Green Tea", "Chinese", "Beverages", true, 60, "Traditional Chinese green tea"),
    // Italian
    ("Margherita Pizza", "Italian", "Mains", true, 250, "Classic pizza with tomato, mozzarella, and basil"),
    ("Chicken Alfredo Pasta", "Italian", "Mains", false, 320, "Creamy pasta with grilled chicken"),
    ("Bruschetta", "Italian", "Starters", true, 150, "Toasted bread with fresh tomatoes and basil"),
    ("Lasagna", "Italian", "Mains", false, 350, "Layered pasta with meat and cheese"),
    ("Tiramisu", "Italian", "Desserts", true, 180, "Coffee-flavored Italian dessert"),
    ("Espresso", "Italian", "Beverages", true, 80, "Strong Italian coffee"),
    // Mexican
    ("Tacos", "Mexican", "Mains", false, 220, "Soft tortillas with seasoned meat and vegetables"),
    ("Guacamole", "Mexican", "Appetizers", true, 140, "Fresh avocado dip with chips"),
    ("Burrito", "Mexican", "Mains", false, 280, "Large flour tortilla wrapped with fillings"),
    ("Churros", "Mexican", "Desserts", true, 120, "Fried dough pastry with cinnamon sugar"),
    ("Horchata", "Mexican", "Beverages", true, 90, "Sweet rice milk drink"),
    // Arabian
    ("Shawarma", "Arabian", "Mains", false, 200, "Spiced meat wrapped in pita bread"),
    ("Hummus", "Arabian", "Appetizers", true, 130, "Creamy chickpea dip with tahini"),
    ("Falafel", "Arabian", "Starters", true, 150, "Deep-fried chickpea balls"),
    ("Baklava", "Arabian", "Desserts", true, 160, "Sweet pastry with nuts and honey"),
    // Continental
    ("Grilled Chicken", "Continental", "Mains", false, 350, "Tender grilled chicken breast with herbs"),
    ("Caesar Salad", "Continental", "Starters", true, 200, "Fresh romaine lettuce with Caesar dressing"),
    ("Fish and Chips", "Continental", "Mains", false, 380, "Battered fish with crispy fries"),
    ("Chocolate Brownie", "Continental", "Desserts", true, 150, "Rich chocolate brownie with ice cream"),
    // Beverages
    ("Fresh Orange Juice", "Beverages", "Beverages", true, 70, "Freshly squeezed orange juice"),
    ("Iced Coffee", "Beverages", "Beverages", true, 100, "Chilled coffee with ice and cream"),
    ("Lemonade", "Beverages", "Beverages", true, 60, "Refreshing lemon drink"),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();

    println!("🌱 Platter Menu Seeder");
    println!("======================");
    println!("Database: {}", cli.db.display());
    println!();

    let db = Database::new(DbConfig::new(&cli.db))
        .await
        .with_context(|| format!("opening {}", cli.db.display()))?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let start = std::time::Instant::now();
    let outcome = seed_menu(&db, &menu_dishes(Utc::now()), cli.reset).await;
    db.close().await;

    match outcome? {
        SeedOutcome::Skipped { existing } => {
            println!("⚠ Database already has {} dishes", existing);
            println!("  Skipping seed to avoid duplicates.");
            println!("  Pass --reset to replace the menu.");
        }
        SeedOutcome::Seeded { cleared, inserted } => {
            if cleared > 0 {
                println!("✓ Cleared {} existing dishes", cleared);
            }
            println!();
            println!("✓ Seeded {} dishes in {:?}", inserted, start.elapsed());
        }
    }

    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum SeedOutcome {
    /// The catalog already had dishes and `--reset` was not given.
    Skipped { existing: i64 },
    Seeded { cleared: u64, inserted: usize },
}

/// Writes `dishes` into the catalog. The first failed insert aborts the run.
async fn seed_menu(db: &Database, dishes: &[Dish], reset: bool) -> anyhow::Result<SeedOutcome> {
    let existing = db.dishes().count().await.context("counting existing dishes")?;

    let mut cleared = 0;
    if existing > 0 {
        if !reset {
            return Ok(SeedOutcome::Skipped { existing });
        }
        cleared = db.dishes().delete_all().await.context("clearing existing dishes")?;
    }

    for dish in dishes {
        db.dishes()
            .insert(dish)
            .await
            .with_context(|| format!("inserting {}", dish.name))?;
    }

    Ok(SeedOutcome::Seeded {
        cleared,
        inserted: dishes.len(),
    })
}

/// The menu as dishes, newest first in the order listed above.
fn menu_dishes(now: DateTime<Utc>) -> Vec<Dish> {
    MENU.iter()
        .enumerate()
        .map(|(index, entry)| to_dish(entry, now - Duration::seconds(index as i64)))
        .collect()
}

fn to_dish(
    &(name, cuisine, category, is_veg, rupees, description): &(&str, &str, &str, bool, i64, &str),
    created_at: DateTime<Utc>,
) -> Dish {
    Dish {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        cuisine: cuisine.to_string(),
        category: category.to_string(),
        is_veg,
        price_cents: rupees * 100,
        image_url: format!("https://via.placeholder.com/300x200?text={}", name.replace(' ', "+")),
        description: description.to_string(),
        is_available: true,
        created_at,
        updated_at: created_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_seed_then_skip_then_reset() {
        let db = setup().await;
        let dishes = menu_dishes(Utc::now());

        let first = seed_menu(&db, &dishes, false).await.unwrap();
        assert_eq!(first, SeedOutcome::Seeded { cleared: 0, inserted: MENU.len() });

        let again = seed_menu(&db, &dishes, false).await.unwrap();
        assert_eq!(again, SeedOutcome::Skipped { existing: MENU.len() as i64 });

        let fresh = menu_dishes(Utc::now());
        let reset = seed_menu(&db, &fresh, true).await.unwrap();
        assert_eq!(
            reset,
            SeedOutcome::Seeded {
                cleared: MENU.len() as u64,
                inserted: MENU.len()
            }
        );
        assert_eq!(db.dishes().count().await.unwrap(), MENU.len() as i64);
    }

    #[tokio::test]
    async fn test_failed_insert_aborts_seed() {
        let db = setup().await;
        let mut dishes = menu_dishes(Utc::now());
        dishes[1].id = dishes[0].id.clone();

        let err = seed_menu(&db, &dishes, false).await.unwrap_err();
        assert!(err.to_string().contains(&dishes[1].name));
        assert_eq!(db.dishes().count().await.unwrap(), 1);
    }

    #[test]
    fn test_cli_parses_flags() {
        let cli = Cli::try_parse_from(["seed", "--db", "/tmp/menu.db", "-r"]).unwrap();
        assert_eq!(cli.db, PathBuf::from("/tmp/menu.db"));
        assert!(cli.reset);

        let cli = Cli::try_parse_from(["seed"]).unwrap();
        assert_eq!(cli.db, PathBuf::from("./platter.db"));
        assert!(!cli.reset);

        assert!(Cli::try_parse_from(["seed", "--bogus"]).is_err());
    }
}
