//! Node HTTP Surface
//!
//! Carries client frames over HTTP so the dispatch pipeline can be driven without a
//! dedicated client transport.
//!
//! ## Routes
//! - `POST /client`: body is one request frame, the response body one response frame.
//!   `x-cluster-version` selects the negotiated version for the request.
//! - `GET /health`: node id, partition count and registered message types.

pub mod handlers;
pub mod node;
pub mod protocol;

pub use node::Node;

use axum::{
    Extension, Router,
    routing::{get, post},
};
use std::sync::Arc;

pub fn router(node: Arc<Node>) -> Router {
    Router::new()
        .route("/client", post(handlers::handle_client_frame))
        .route("/health", get(handlers::handle_health))
        .layer(Extension(node))
}
