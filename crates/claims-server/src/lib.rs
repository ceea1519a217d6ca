//! # claims-server
//!
//! HTTP API for submitting, listing, updating and deleting insurance claims.
//!
//! Claims are persisted through [`claims_store`], one line per claim in a
//! single log file. The server is built on axum; every store call runs on
//! the blocking thread pool.
//!
//! ## Example
//!
//! ```rust,no_run
//! use claims_server::{ClaimsServer, ServerConfig};
//! use claims_store::StoreConfig;
//!
//! #[tokio::main]
//! async fn main() -> claims_server::ApiResult<()> {
//!     let config = ServerConfig::default().with_store(StoreConfig::new("claims.log"));
//!
//!     let server = ClaimsServer::new(config)?;
//!     server.serve().await
//! }
//! ```
//!
//! ## API Endpoints
//!
//! | Endpoint | Method | Description |
//! |----------|--------|-------------|
//! | `/claims` | GET | List every stored claim |
//! | `/claims/{id}` | GET | Fetch one claim |
//! | `/submit-claim` | POST | Store a new claim |
//! | `/claims/{id}` | PUT | Replace a claim's fields |
//! | `/claims/{id}` | DELETE | Remove a claim |
//! | `/health` | GET | Liveness and uptime |

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod state;

// Re-export main types
pub use cli::Cli;
pub use config::ServerConfig;
pub use error::{ApiError, ApiResult};
pub use server::ClaimsServer;
pub use state::AppState;
