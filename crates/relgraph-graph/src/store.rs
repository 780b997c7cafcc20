//! The entity store seam used by the HTTP facade.

use async_trait::async_trait;

use relgraph_core::{
    EntityAssociation, EntityId, EntitySummary, EntityWithAssociations, Label, NewEntity,
};

use crate::client::{GraphClient, GraphError};

/// The five entity operations plus a liveness check.
///
/// `GraphClient` is the production implementation; handlers depend only on
/// this trait.
#[async_trait]
pub trait EntityStore: Send + Sync {
    async fn list_entities(&self) -> Result<Vec<EntitySummary>, GraphError>;

    async fn fetch_entity_with_associations(
        &self,
        id: &EntityId,
    ) -> Result<Vec<EntityAssociation>, GraphError>;

    async fn list_entities_with_associations(
        &self,
    ) -> Result<Vec<EntityWithAssociations>, GraphError>;

    /// Create `entity` as a node labeled `label`. The label has already been
    /// validated; `entity.label` is not consulted.
    async fn create_entity(&self, label: &Label, entity: &NewEntity) -> Result<(), GraphError>;

    async fn remove_entity(&self, id: &EntityId) -> Result<(), GraphError>;

    async fn ping(&self) -> Result<(), GraphError>;
}

#[async_trait]
impl EntityStore for GraphClient {
    async fn list_entities(&self) -> Result<Vec<EntitySummary>, GraphError> {
        GraphClient::list_entities(self).await
    }

    async fn fetch_entity_with_associations(
        &self,
        id: &EntityId,
    ) -> Result<Vec<EntityAssociation>, GraphError> {
        GraphClient::fetch_entity_with_associations(self, id).await
    }

    async fn list_entities_with_associations(
        &self,
    ) -> Result<Vec<EntityWithAssociations>, GraphError> {
        GraphClient::list_entities_with_associations(self).await
    }

    async fn create_entity(&self, label: &Label, entity: &NewEntity) -> Result<(), GraphError> {
        GraphClient::create_entity(self, label, &entity.properties, &entity.relationships).await
    }

    async fn remove_entity(&self, id: &EntityId) -> Result<(), GraphError> {
        GraphClient::remove_entity(self, id).await.map(|_| ())
    }

    async fn ping(&self) -> Result<(), GraphError> {
        self.verify_connectivity().await
    }
}
