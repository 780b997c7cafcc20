//! End-to-end request sequences against an in-memory entity store that
//! follows the Neo4j semantics of the graph layer: undirected neighborhood
//! matches, silent skips for unresolved targets, and detach-delete.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use relgraph_api::{build_router, AppState};
use relgraph_core::{
    AssociationRecord, EntityAssociation, EntityId, EntityRecord, EntitySummary,
    EntityWithAssociations, Label, NewEntity, PropertyMap, ASSOCIATION_TYPE,
};
use relgraph_graph::{EntityStore, GraphError};

const TOKEN: &str = "secret_token";

#[derive(Default)]
struct Graph {
    next_id: u64,
    nodes: Vec<EntityRecord>,
    /// (source element id, target element id, properties)
    edges: Vec<(String, String, PropertyMap)>,
}

#[derive(Default)]
struct MemoryStore {
    graph: Mutex<Graph>,
}

fn has_id(node: &EntityRecord, id: &EntityId) -> bool {
    node.properties.get("id") == Some(&json!(id))
}

impl Graph {
    fn node(&self, element_id: &str) -> EntityRecord {
        self.nodes
            .iter()
            .find(|n| n.id == element_id)
            .cloned()
            .unwrap()
    }

    /// Every edge seen from each endpoint, like `MATCH (e)-[r]-(t)`.
    fn triples(&self) -> Vec<EntityAssociation> {
        let mut out = Vec::new();
        for (src, dst, props) in &self.edges {
            for (from, to) in [(src, dst), (dst, src)] {
                out.push(EntityAssociation {
                    entity: self.node(from),
                    association: AssociationRecord {
                        rel_type: ASSOCIATION_TYPE.to_string(),
                        properties: props.clone(),
                    },
                    target_entity: self.node(to),
                });
            }
        }
        out
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn list_entities(&self) -> Result<Vec<EntitySummary>, GraphError> {
        let graph = self.graph.lock().unwrap();
        Ok(graph
            .nodes
            .iter()
            .map(|n| EntitySummary {
                id: n.properties.get("id").cloned().unwrap_or(Value::Null),
                label: n.labels.first().cloned(),
            })
            .collect())
    }

    async fn fetch_entity_with_associations(
        &self,
        id: &EntityId,
    ) -> Result<Vec<EntityAssociation>, GraphError> {
        let graph = self.graph.lock().unwrap();
        Ok(graph
            .triples()
            .into_iter()
            .filter(|t| has_id(&t.entity, id))
            .collect())
    }

    async fn list_entities_with_associations(
        &self,
    ) -> Result<Vec<EntityWithAssociations>, GraphError> {
        let graph = self.graph.lock().unwrap();
        Ok(EntityWithAssociations::group(graph.triples()))
    }

    async fn create_entity(&self, label: &Label, entity: &NewEntity) -> Result<(), GraphError> {
        let mut graph = self.graph.lock().unwrap();
        graph.next_id += 1;
        let element_id = format!("4:mem:{}", graph.next_id);
        graph.nodes.push(EntityRecord {
            id: element_id.clone(),
            labels: vec![label.to_string()],
            properties: entity.properties.clone(),
        });

        for rel in &entity.relationships {
            let targets: Vec<String> = graph
                .nodes
                .iter()
                .filter(|n| has_id(n, &rel.target_id))
                .map(|n| n.id.clone())
                .collect();
            for target in targets {
                graph
                    .edges
                    .push((element_id.clone(), target, rel.attributes.clone()));
            }
        }
        Ok(())
    }

    async fn remove_entity(&self, id: &EntityId) -> Result<(), GraphError> {
        let mut graph = self.graph.lock().unwrap();
        let doomed: Vec<String> = graph
            .nodes
            .iter()
            .filter(|n| has_id(n, id))
            .map(|n| n.id.clone())
            .collect();
        graph.nodes.retain(|n| !doomed.contains(&n.id));
        graph
            .edges
            .retain(|(s, t, _)| !doomed.contains(s) && !doomed.contains(t));
        Ok(())
    }

    async fn ping(&self) -> Result<(), GraphError> {
        Ok(())
    }
}

struct Client {
    app: axum::Router,
}

impl Client {
    fn new() -> Self {
        let state = AppState::new(Arc::new(MemoryStore::default()), TOKEN, vec![]);
        Self {
            app: build_router(state, &[]),
        }
    }

    async fn call(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(v) => {
                req = req.header(header::CONTENT_TYPE, "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .app
            .clone()
            .oneshot(req.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    async fn create(&self, body: Value) -> StatusCode {
        self.call(Method::POST, "/entities", Some(TOKEN), Some(body))
            .await
            .0
    }

    async fn get(&self, path: &str) -> Value {
        let (status, body) = self.call(Method::GET, path, None, None).await;
        assert_eq!(status, StatusCode::OK);
        body
    }
}

fn user(id: Value, name: &str, relationships: Value) -> Value {
    json!({
        "label": "User",
        "properties": {"id": id, "name": name},
        "relationships": relationships
    })
}

#[tokio::test]
async fn test_create_list_delete_scenario() {
    let client = Client::new();

    assert_eq!(client.create(user(json!(1), "A", json!([]))).await, StatusCode::OK);
    let listed = client.get("/entities").await;
    assert_eq!(listed, json!([{"id": 1, "label": "User"}]));

    // Isolated entity: empty neighborhood, no error.
    assert_eq!(client.get("/entities/1").await, json!([]));

    let (status, body) = client
        .call(Method::DELETE, "/entities/1", Some(TOKEN), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Entity and relationships deleted successfully");

    assert_eq!(client.get("/entities/1").await, json!([]));
    assert_eq!(client.get("/entities").await, json!([]));
}

#[tokio::test]
async fn test_association_is_visible_from_target() {
    let client = Client::new();
    client.create(user(json!(1), "A", json!([]))).await;
    client
        .create(user(
            json!(2),
            "B",
            json!([{"target_id": 1, "attributes": {"kind": "friend"}}]),
        ))
        .await;

    let from_target = client.get("/entities/1").await;
    assert_eq!(from_target.as_array().unwrap().len(), 1);
    assert_eq!(from_target[0]["target_entity"]["properties"]["id"], 2);
    assert_eq!(from_target[0]["association"]["type"], "ASSOCIATION_TYPE");
    assert_eq!(
        from_target[0]["association"]["properties"]["kind"],
        "friend"
    );

    let grouped = client.get("/entities_with_associations").await;
    assert_eq!(grouped.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_delete_removes_associations_from_other_endpoint() {
    let client = Client::new();
    client.create(user(json!(1), "Hub", json!([]))).await;
    client
        .create(user(json!(2), "Spoke", json!([{"target_id": 1}])))
        .await;
    assert_eq!(client.get("/entities/1").await.as_array().unwrap().len(), 1);

    client
        .call(Method::DELETE, "/entities/2", Some(TOKEN), None)
        .await;

    assert_eq!(client.get("/entities/1").await, json!([]));
    assert_eq!(client.get("/entities_with_associations").await, json!([]));
}

#[tokio::test]
async fn test_unresolved_target_is_silently_skipped() {
    let client = Client::new();
    let status = client
        .create(user(json!(5), "Dangling", json!([{"target_id": 999}])))
        .await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(client.get("/entities").await.as_array().unwrap().len(), 1);
    assert_eq!(client.get("/entities/5").await, json!([]));
}

#[tokio::test]
async fn test_listing_counts_every_node() {
    let client = Client::new();
    client.create(user(json!(1), "A", json!([]))).await;
    client
        .create(user(json!(2), "B", json!([{"target_id": 1}])))
        .await;
    client.create(user(json!("c"), "C", json!([]))).await;

    assert_eq!(client.get("/entities").await.as_array().unwrap().len(), 3);
    // Only entities with at least one association are grouped.
    assert_eq!(
        client
            .get("/entities_with_associations")
            .await
            .as_array()
            .unwrap()
            .len(),
        2
    );
}

#[tokio::test]
async fn test_rejected_writes_change_nothing() {
    let client = Client::new();
    client.create(user(json!(1), "A", json!([]))).await;

    let (status, _) = client
        .call(
            Method::POST,
            "/entities",
            None,
            Some(user(json!(2), "B", json!([]))),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = client
        .call(Method::DELETE, "/entities/1", Some("wrong"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    assert_eq!(client.get("/entities").await, json!([{"id": 1, "label": "User"}]));
}
