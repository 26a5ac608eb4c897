//! Bootstrap binary for the team budget planner core.
//!
//! Initializes logging, loads configuration, prepares the database
//! schema, seeds the expense category reference data, and optionally
//! provisions the initial admin identity from environment variables.

use dotenvy::dotenv;
use team_budget_planner::config;
use team_budget_planner::core::category;
use team_budget_planner::core::role::Role;
use team_budget_planner::core::user::{self, NewUser};
use team_budget_planner::errors::Result;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file (as early as possible)
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load the main application configuration
    let app_config = config::app::load_default_config()
        .inspect_err(|e| error!("Critical error loading application configuration: {}", e))?;
    info!("Successfully processed application configuration.");

    // 4. Initialize database
    let db = config::database::create_connection()
        .await
        .inspect(|_| info!("Database connection established."))
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    config::database::create_tables(&db)
        .await
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 5. Seed expense category reference data
    category::seed_initial_categories(&db)
        .await
        .inspect(|created| info!(created, "Expense categories seeded."))
        .inspect_err(|e| error!("Failed to seed expense categories: {}", e))?;

    // 6. Provision the initial admin when the environment asks for one
    if let (Ok(username), Ok(email), Ok(password)) = (
        std::env::var("ADMIN_USERNAME"),
        std::env::var("ADMIN_EMAIL"),
        std::env::var("ADMIN_PASSWORD"),
    ) {
        if user::get_user_by_username(&db, &username).await?.is_none() {
            let admin = user::provision_user(
                &db,
                &app_config,
                NewUser {
                    username,
                    email,
                    password,
                    team: None,
                    work_phone: None,
                },
                Role::Admin,
            )
            .await
            .inspect_err(|e| error!("Failed to provision initial admin: {}", e))?;
            info!(user_id = admin.id, "Provisioned initial admin user.");
        }
    }

    Ok(())
}
