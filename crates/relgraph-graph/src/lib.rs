//! relgraph-graph: Neo4j access layer for the entity graph.
//!
//! This crate is the only place that talks to Neo4j. Every read and write
//! issues one Cypher statement (creation runs inside an explicit
//! transaction) and shapes the rows into `relgraph-core` records.

pub mod bolt;
pub mod client;
pub mod mutations;
pub mod queries;
pub mod store;

pub use client::{GraphClient, GraphConfig, GraphError};
pub use store::EntityStore;
