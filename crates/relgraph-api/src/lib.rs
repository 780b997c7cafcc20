//! relgraph-api: REST facade over the entity graph.
//!
//! Routes five entity endpoints (plus `/health`) to an [`EntityStore`],
//! guards create and delete with a static bearer token, and serializes
//! records as JSON.
//!
//! [`EntityStore`]: relgraph_graph::EntityStore

pub mod auth;
pub mod error;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::build_router;
pub use state::AppState;
