//! Write operations: entity creation and detach-delete.
//!
//! Entities are addressed by their business `id` property. Uniqueness of that
//! property is not enforced here.

use neo4rs::query;

use relgraph_core::{EntityId, Label, NewAssociation, PropertyMap, ASSOCIATION_TYPE};

use crate::bolt::{id_to_bolt, json_to_bolt, props_to_bolt};
use crate::client::{GraphClient, GraphError};

impl GraphClient {
    /// Create one node and its outgoing associations in a single write
    /// transaction.
    ///
    /// Each association matches its target by business id. A target that
    /// matches no node produces no edge and no error. Any engine error rolls
    /// the transaction back.
    pub async fn create_entity(
        &self,
        label: &Label,
        properties: &PropertyMap,
        associations: &[NewAssociation],
    ) -> Result<(), GraphError> {
        let cypher = create_entity_cypher(label);
        let q = query(&cypher)
            .param("props", props_to_bolt(properties))
            .param("associations", associations_to_bolt(associations));

        let mut txn = self.start_txn().await?;
        if let Err(e) = txn.run(q).await {
            tracing::error!(label = %label, error = %e, "Entity creation failed, rolling back");
            if let Err(rb) = txn.rollback().await {
                tracing::warn!(error = %rb, "Rollback failed");
            }
            return Err(e.into());
        }
        txn.commit().await?;

        tracing::info!(
            label = %label,
            associations = associations.len(),
            "Created entity"
        );
        Ok(())
    }

    /// Detach-delete every node whose business id matches.
    ///
    /// Returns the number of deleted nodes; zero is not an error.
    pub async fn remove_entity(&self, id: &EntityId) -> Result<i64, GraphError> {
        let q = query(
            "MATCH (e) WHERE e.id = $id
             DETACH DELETE e
             RETURN count(e) AS cnt",
        )
        .param("id", id_to_bolt(id));

        let deleted = match self.query_one(q).await? {
            Some(row) => row.get::<i64>("cnt").unwrap_or(0),
            None => 0,
        };

        tracing::info!(entity_id = %id, deleted, "Removed entity");
        Ok(deleted)
    }
}

// ── Helpers ──────────────────────────────────────────────────────

/// Node creation followed by one MATCH/CREATE per association row.
///
/// The node is created before UNWIND, so an empty association list still
/// creates it.
fn create_entity_cypher(label: &Label) -> String {
    format!(
        "CREATE (e:{label})
         SET e = $props
         WITH e
         UNWIND $associations AS assoc
         MATCH (t) WHERE t.id = assoc.target_id
         CREATE (e)-[r:{ASSOCIATION_TYPE}]->(t)
         SET r = assoc.attributes",
        label = label.to_cypher()
    )
}

/// Association descriptors as a list of `{target_id, attributes}` maps.
fn associations_to_bolt(associations: &[NewAssociation]) -> neo4rs::BoltType {
    let rows: Vec<serde_json::Value> = associations
        .iter()
        .map(|a| {
            serde_json::json!({
                "target_id": a.target_id,
                "attributes": a.attributes,
            })
        })
        .collect();
    json_to_bolt(&serde_json::Value::Array(rows))
}
