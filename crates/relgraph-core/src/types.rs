//! Record and request types for the entity graph.
//!
//! Records are shaped from Neo4j rows by the graph layer and serialized as-is
//! by the HTTP facade, so field names here are the wire format.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::RelgraphError;

/// Relationship type used for every association created through the API.
pub const ASSOCIATION_TYPE: &str = "ASSOCIATION_TYPE";

/// Open property map attached to nodes and relationships.
pub type PropertyMap = serde_json::Map<String, Value>;

/// Longest label accepted for node creation.
const MAX_LABEL_LEN: usize = 64;

// ── Identifiers ───────────────────────────────────────────────────

/// Caller-supplied business identifier (the `id` node property).
///
/// Distinct from the engine's element id. Neo4j compares integers and
/// strings by type, so `1` and `"1"` identify different nodes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum EntityId {
    Int(i64),
    Text(String),
}

impl FromStr for EntityId {
    type Err = std::convert::Infallible;

    /// Segments written as a canonical `i64` are integers, everything else
    /// (including `007`, `+7` and `-0`) is text.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.parse::<i64>() {
            Ok(n) if n.to_string() == s => EntityId::Int(n),
            _ => EntityId::Text(s.to_string()),
        })
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Int(n) => write!(f, "{n}"),
            EntityId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for EntityId {
    fn from(n: i64) -> Self {
        EntityId::Int(n)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        EntityId::Text(s.to_string())
    }
}

// ── Labels ────────────────────────────────────────────────────────

/// A node label that is safe to place in Cypher text.
///
/// Labels cannot be query parameters, so they are restricted to identifier
/// characters and always emitted backtick-quoted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label(String);

impl Label {
    /// Validate a raw label.
    pub fn new(raw: &str) -> Result<Self, RelgraphError> {
        let invalid = |reason: &str| RelgraphError::InvalidLabel {
            label: raw.to_string(),
            reason: reason.to_string(),
        };

        let mut chars = raw.chars();
        match chars.next() {
            None => return Err(invalid("label must not be empty")),
            Some(c) if !(c.is_ascii_alphabetic() || c == '_') => {
                return Err(invalid("label must start with a letter or underscore"));
            }
            Some(_) => {}
        }
        if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(invalid("label may only contain letters, digits and underscores"));
        }
        if raw.len() > MAX_LABEL_LEN {
            return Err(invalid("label is too long"));
        }
        Ok(Self(raw.to_string()))
    }

    /// Validate a raw label against an allow-list. An empty list allows any
    /// syntactically valid label.
    pub fn parse_allowed(raw: &str, allowed: &[String]) -> Result<Self, RelgraphError> {
        let label = Self::new(raw)?;
        if !allowed.is_empty() && !allowed.iter().any(|a| a == raw) {
            return Err(RelgraphError::InvalidLabel {
                label: raw.to_string(),
                reason: "label is not in the allowed set".to_string(),
            });
        }
        Ok(label)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The label as it appears in a Cypher pattern, e.g. `` `User` ``.
    pub fn to_cypher(&self) -> String {
        format!("`{}`", self.0)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ── Response Records ──────────────────────────────────────────────

/// One row of the entity listing: business id plus first label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySummary {
    /// Business id; `null` for nodes without an `id` property.
    pub id: Value,
    pub label: Option<String>,
}

/// A node with its engine element id, labels, and full property map.
///
/// The label set goes on the wire under the singular `label` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub id: String,
    #[serde(rename = "label")]
    pub labels: Vec<String>,
    pub properties: PropertyMap,
}

/// A relationship's type and property map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssociationRecord {
    #[serde(rename = "type")]
    pub rel_type: String,
    pub properties: PropertyMap,
}

/// An `(entity, association, neighbor)` triple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityAssociation {
    pub entity: EntityRecord,
    pub association: AssociationRecord,
    pub target_entity: EntityRecord,
}

/// An association seen from a grouped entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssociationEntry {
    pub association: AssociationRecord,
    pub target_entity: EntityRecord,
}

/// An entity with every association incident to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityWithAssociations {
    pub entity: EntityRecord,
    pub associations: Vec<AssociationEntry>,
}

impl EntityWithAssociations {
    /// Group triples by the entity's element id, keeping first-seen order.
    pub fn group(triples: Vec<EntityAssociation>) -> Vec<Self> {
        let mut groups: Vec<Self> = Vec::new();
        let mut index: std::collections::HashMap<String, usize> = std::collections::HashMap::new();

        for triple in triples {
            let entry = AssociationEntry {
                association: triple.association,
                target_entity: triple.target_entity,
            };
            match index.get(&triple.entity.id) {
                Some(&pos) => groups[pos].associations.push(entry),
                None => {
                    index.insert(triple.entity.id.clone(), groups.len());
                    groups.push(Self {
                        entity: triple.entity,
                        associations: vec![entry],
                    });
                }
            }
        }
        groups
    }
}

/// Plain acknowledgement body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// ── Requests ──────────────────────────────────────────────────────

/// Body of an entity creation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEntity {
    pub label: String,
    pub properties: PropertyMap,
    #[serde(default)]
    pub relationships: Vec<NewAssociation>,
}

/// An outgoing association to create alongside a new entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAssociation {
    pub target_id: EntityId,
    #[serde(default)]
    pub attributes: PropertyMap,
}

impl NewEntity {
    /// Check that every property and attribute value can be stored on a
    /// node or relationship.
    pub fn validate(&self) -> Result<(), RelgraphError> {
        validate_properties("properties", &self.properties)?;
        for (i, rel) in self.relationships.iter().enumerate() {
            validate_properties(&format!("relationships[{i}].attributes"), &rel.attributes)?;
        }
        Ok(())
    }
}

/// Neo4j stores scalars and homogeneous lists of non-null scalars; maps,
/// nested lists, lists with nulls and mixed-type lists are rejected.
fn validate_properties(field: &str, props: &PropertyMap) -> Result<(), RelgraphError> {
    let invalid =
        |key: &str, reason: &str| RelgraphError::InvalidProperties(format!("{field}.{key}: {reason}"));

    for (key, value) in props {
        match value {
            Value::Object(_) => {
                return Err(invalid(key, "nested maps cannot be stored as properties"));
            }
            Value::Array(items) => {
                let mut kinds = items.iter().map(list_item_kind);
                let first = match kinds.next() {
                    Some(kind) => kind,
                    None => continue,
                };
                let first = first.ok_or_else(|| {
                    invalid(key, "lists may only contain non-null scalar values")
                })?;
                for kind in kinds {
                    match kind {
                        None => {
                            return Err(invalid(
                                key,
                                "lists may only contain non-null scalar values",
                            ));
                        }
                        Some(k) if k != first => {
                            return Err(invalid(key, "lists must not mix value types"));
                        }
                        Some(_) => {}
                    }
                }
            }
            _ => {}
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScalarKind {
    Bool,
    Number,
    String,
}

/// Kind of a list element, or `None` if it cannot appear in a stored list.
/// Integers and floats share a kind; the engine coerces them to one type.
fn list_item_kind(value: &Value) -> Option<ScalarKind> {
    match value {
        Value::Bool(_) => Some(ScalarKind::Bool),
        Value::Number(_) => Some(ScalarKind::Number),
        Value::String(_) => Some(ScalarKind::String),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
