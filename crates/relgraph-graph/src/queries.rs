//! Read operations: entity listings and neighborhood lookups.

use neo4rs::query;

use relgraph_core::{
    AssociationRecord, EntityAssociation, EntityId, EntityRecord, EntitySummary,
    EntityWithAssociations, PropertyMap,
};

use crate::bolt::id_to_bolt;
use crate::client::{GraphClient, GraphError};

/// Columns returned by every neighborhood query, one triple per row.
const TRIPLE_COLUMNS: &str = "
    RETURN elementId(e) AS entity_id, labels(e) AS entity_labels,
           properties(e) AS entity_props,
           type(r) AS association_type, properties(r) AS association_props,
           elementId(t) AS target_id, labels(t) AS target_labels,
           properties(t) AS target_props";

impl GraphClient {
    // ── List Queries ─────────────────────────────────────────────

    /// List every node as `(business id, first label)`.
    pub async fn list_entities(&self) -> Result<Vec<EntitySummary>, GraphError> {
        let q = query("MATCH (e) RETURN e.id AS id, labels(e) AS labels");

        let rows = self.query_rows(q).await?;
        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            let id: serde_json::Value = row.get("id").unwrap_or(serde_json::Value::Null);
            let labels: Vec<String> = row.get("labels").unwrap_or_default();
            results.push(EntitySummary {
                id,
                label: labels.first().cloned(),
            });
        }

        tracing::debug!(count = results.len(), "Listed entities");
        Ok(results)
    }

    // ── Neighbor Queries ─────────────────────────────────────────

    /// Every `(entity, association, neighbor)` triple for the entity with the
    /// given business id, in any direction.
    ///
    /// Returns an empty list both for isolated and for missing entities.
    pub async fn fetch_entity_with_associations(
        &self,
        id: &EntityId,
    ) -> Result<Vec<EntityAssociation>, GraphError> {
        let cypher = format!("MATCH (e)-[r]-(t) WHERE e.id = $id {TRIPLE_COLUMNS}");
        let q = query(&cypher).param("id", id_to_bolt(id));

        let rows = self.query_rows(q).await?;
        let triples = rows
            .iter()
            .map(triple_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(entity_id = %id, count = triples.len(), "Fetched entity associations");
        Ok(triples)
    }

    /// Every entity that has at least one association, grouped by element id.
    ///
    /// Isolated entities do not appear.
    pub async fn list_entities_with_associations(
        &self,
    ) -> Result<Vec<EntityWithAssociations>, GraphError> {
        let cypher = format!("MATCH (e)-[r]-(t) {TRIPLE_COLUMNS}");

        let rows = self.query_rows(query(&cypher)).await?;
        let triples = rows
            .iter()
            .map(triple_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        let groups = EntityWithAssociations::group(triples);
        tracing::debug!(count = groups.len(), "Listed entities with associations");
        Ok(groups)
    }
}

/// Shape one neighborhood row into a triple.
fn triple_from_row(row: &neo4rs::Row) -> Result<EntityAssociation, GraphError> {
    Ok(EntityAssociation {
        entity: entity_from_row(row, "entity")?,
        association: AssociationRecord {
            rel_type: row.get("association_type").map_err(|e| {
                GraphError::Serialization(format!("Failed to get relation type: {e}"))
            })?,
            properties: props_from_row(row, "association_props")?,
        },
        target_entity: entity_from_row(row, "target")?,
    })
}

/// Read `<prefix>_id`, `<prefix>_labels` and `<prefix>_props` into a record.
fn entity_from_row(row: &neo4rs::Row, prefix: &str) -> Result<EntityRecord, GraphError> {
    let id: String = row.get(&format!("{prefix}_id")).map_err(|e| {
        GraphError::Serialization(format!("Failed to get {prefix} element id: {e}"))
    })?;
    let labels: Vec<String> = row.get(&format!("{prefix}_labels")).unwrap_or_default();

    Ok(EntityRecord {
        id,
        labels,
        properties: props_from_row(row, &format!("{prefix}_props"))?,
    })
}

fn props_from_row(row: &neo4rs::Row, column: &str) -> Result<PropertyMap, GraphError> {
    row.get::<PropertyMap>(column)
        .map_err(|e| GraphError::Serialization(format!("Failed to deserialize {column}: {e}")))
}
