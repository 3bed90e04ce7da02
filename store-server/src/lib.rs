//! Store Server - storefront and back-office HTTP service
//!
//! # Architecture overview
//!
//! - **Database** (`db`): embedded SurrealDB storage and repositories
//! - **Pricing** (`pricing`): server-side coupon resolution on top of
//!   the pure engine in `shared::pricing`
//! - **Checkout** (`checkout`): order creation and operator notification
//! - **HTTP API** (`api`): RESTful storefront and admin endpoints
//!
//! # Module structure
//!
//! ```text
//! store-server/src/
//! ├── core/      # configuration, state, server lifecycle
//! ├── db/        # database layer and repositories
//! ├── pricing/   # coupon engine
//! ├── checkout/  # checkout flow and notification messages
//! ├── api/       # HTTP routes and handlers
//! ├── routes/    # router assembly and middleware
//! └── utils/     # logging, error re-exports
//! ```

pub mod api;
pub mod checkout;
pub mod core;
pub mod db;
pub mod pricing;
pub mod routes;
pub mod utils;

// Re-export common types
pub use crate::core::{Config, Server, ServerState};
pub use pricing::{CartQuote, CouponEngine, CouponStatus};
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// Load `.env` and initialize logging
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenv::dotenv();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
   _____ __
  / ___// /_____  ________
  \__ \/ __/ __ \/ ___/ _ \
 ___/ / /_/ /_/ / /  /  __/
/____/\__/\____/_/   \___/
    "#
    );
}
