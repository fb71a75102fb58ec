//! Storefront CLI - drive the Platter storefront services from a shell.
//!
//! Commands:
//! - `storefront dishes` - Browse the menu
//! - `storefront dish <id>` - Show one dish
//! - `storefront place` - Place an order (JSON request on stdin)
//! - `storefront order <id>` - Show one order
//! - `storefront my-orders` - The caller's orders
//! - `storefront orders` - Every order (admin)
//! - `storefront summary` - Dashboard aggregates (admin)
//! - `storefront advance <id>` - Move an order to its next status (admin)
//! - `storefront token` - Issue a development token
//!
//! Results are printed to stdout as JSON. Failures print an error body to
//! stderr and exit with status 1.

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use platter_core::validation::PlaceOrderRequest;
use platter_core::{AuthenticatedUser, DishFilter, UserRole, ValidationError, ValidationErrors, VegMode};
use platter_storefront::{
    AdminService, AppState, CatalogService, OrderService, StorefrontConfig, StorefrontError, StorefrontResult,
};

/// Platter storefront command line
#[derive(Parser)]
#[command(name = "storefront")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// SQLite database file (overrides PLATTER_DATABASE_PATH)
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse available dishes, newest first
    Dishes {
        #[arg(long)]
        cuisine: Option<String>,

        #[arg(long)]
        category: Option<String>,

        /// all, veg or nonveg
        #[arg(long, default_value = "all")]
        veg: VegMode,
    },

    /// Show one dish
    Dish { id: String },

    /// Place an order read as JSON from stdin
    Place {
        /// Bearer token of the customer; omit to order as a guest
        #[arg(long)]
        token: Option<String>,
    },

    /// Show one order
    Order { id: String },

    /// List the caller's orders
    MyOrders {
        #[arg(long)]
        token: String,
    },

    /// List every order
    Orders {
        #[arg(long)]
        token: String,

        /// Only this customer's orders
        #[arg(long)]
        user: Option<String>,
    },

    /// Show admin dashboard aggregates
    Summary {
        #[arg(long)]
        token: String,
    },

    /// Move an order to its next status
    Advance {
        id: String,

        #[arg(long)]
        token: String,
    },

    /// Issue a token for local testing
    Token {
        #[arg(long)]
        user_id: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        admin: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = StorefrontConfig::load().context("invalid configuration")?;
    if let Some(path) = cli.database {
        config.database_path = path;
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    if config.uses_dev_secret() {
        warn!("PLATTER_JWT_SECRET is unset; using the development secret");
    }

    info!(database = %config.database_path.display(), "Opening storefront database");
    let state = match AppState::connect(config).await {
        Ok(state) => state,
        Err(e) => fail(e),
    };

    let result = run(cli.command, &state).await;
    state.db.close().await;

    match result {
        Ok(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(())
        }
        Err(e) => fail(e),
    }
}

async fn run(command: Commands, state: &std::sync::Arc<AppState>) -> StorefrontResult<serde_json::Value> {
    let catalog = CatalogService::new(state.clone());
    let orders = OrderService::new(state.clone());
    let admin_service = AdminService::new(state.clone());

    match command {
        Commands::Dishes { cuisine, category, veg } => {
            let filter = DishFilter {
                cuisine,
                category,
                veg_mode: veg,
            };
            to_json(catalog.list_dishes(&filter).await?)
        }

        Commands::Dish { id } => to_json(catalog.get_dish(&id).await?),

        Commands::Place { token } => {
            let request = read_request()?;
            let user = identity(state, token.as_deref());
            to_json(orders.place_order(&request, user.as_ref()).await?)
        }

        Commands::Order { id } => to_json(orders.get_order(&id).await?),

        Commands::MyOrders { token } => {
            let user = identity(state, Some(&token));
            to_json(orders.my_orders(user.as_ref()).await?)
        }

        Commands::Orders { token, user } => {
            let caller = identity(state, Some(&token));
            to_json(orders.all_orders(caller.as_ref(), user.as_deref()).await?)
        }

        Commands::Summary { token } => {
            let user = identity(state, Some(&token));
            to_json(admin_service.summary(user.as_ref()).await?)
        }

        Commands::Advance { id, token } => {
            let user = identity(state, Some(&token));
            let status = admin_service.advance_order_status(user.as_ref(), &id).await?;
            Ok(serde_json::json!({ "orderId": id, "status": status }))
        }

        Commands::Token { user_id, email, admin } => {
            let role = if admin { UserRole::Admin } else { UserRole::Customer };
            let user = AuthenticatedUser {
                id: user_id,
                email,
                role,
            };
            let token = state.jwt.issue_token(&user)?;
            Ok(serde_json::json!({ "token": token }))
        }
    }
}

/// Resolves a raw token the same way an `Authorization` header would be.
fn identity(state: &AppState, token: Option<&str>) -> Option<AuthenticatedUser> {
    let header = token.map(|t| format!("Bearer {}", t));
    state.jwt.resolve_identity(header.as_deref())
}

fn read_request() -> StorefrontResult<PlaceOrderRequest> {
    let mut body = String::new();
    std::io::stdin()
        .read_to_string(&mut body)
        .map_err(|e| StorefrontError::Internal(format!("failed to read stdin: {}", e)))?;

    serde_json::from_str(&body).map_err(|e| {
        StorefrontError::InvalidRequest(ValidationErrors::single(ValidationError::InvalidFormat {
            field: "body".to_string(),
            reason: e.to_string(),
        }))
    })
}

fn to_json<T: Serialize>(value: T) -> StorefrontResult<serde_json::Value> {
    serde_json::to_value(value).map_err(|e| StorefrontError::Internal(e.to_string()))
}

fn fail(err: StorefrontError) -> ! {
    let body = serde_json::to_string_pretty(&err.to_response()).unwrap_or_else(|_| err.to_string());
    eprintln!("{}", body);
    std::process::exit(1);
}
