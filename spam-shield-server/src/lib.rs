//! spam-shield-server: HTTP front end for spam-shield
//!
//! # Endpoints
//!
//! - `GET /health`: liveness and whether the model is loaded
//! - `POST /api/classify`: `{"text": ...}` to a label and confidence
//! - `POST /api/normalize`: `{"text": ...}` to the normalized token string
//! - `GET /api/model`: summary of the loaded artifacts

pub mod api;
pub mod server;

pub use api::{ApiResponse, AppState};
pub use server::{router, ApiServer};
