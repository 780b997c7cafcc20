//! relgraph-core: Shared record types, configuration, and error handling for relgraph.
//!
//! This crate provides the foundational types used by the graph access layer
//! and the HTTP facade:
//! - Entity and association records shaped from graph rows
//! - Request bodies for entity creation
//! - Label validation for Cypher-safe node labels
//! - Configuration loading
//! - Common error types

pub mod config;
pub mod error;
pub mod types;

pub use crate::config::{AppConfig, Neo4jSettings, ServerSettings};
pub use error::RelgraphError;
pub use types::{
    AssociationEntry, AssociationRecord, EntityAssociation, EntityId, EntityRecord, EntitySummary,
    EntityWithAssociations, Label, Message, NewAssociation, NewEntity, PropertyMap,
    ASSOCIATION_TYPE,
};
