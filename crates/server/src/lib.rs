//! captiond server - HTTP API for image captioning and speech.
//!
//! This crate exposes the caption pipeline over REST:
//!
//! - `POST /generate-caption` - multipart image upload, returns the caption
//! - `POST /speak-caption` - JSON caption in, MP3 audio out
//! - `GET /` - API banner
//! - `GET /health`, `GET /ready` - liveness and readiness probes
//!
//! Model and vocabulary artifacts are loaded once at startup. If loading
//! fails the server still starts, logs the failure, and answers every
//! caption request with a `NOT_LOADED` error until it is restarted with
//! good artifacts.
//!
//! ```rust,no_run
//! use server::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::load()?;
//!     server::start_server(config).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::{build_router, start_server};
pub use state::ServerState;
