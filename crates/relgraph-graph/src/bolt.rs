//! Conversion of JSON request values into Bolt query parameters.

use neo4rs::{BoltList, BoltMap, BoltNull, BoltString, BoltType};
use serde_json::Value;

use relgraph_core::{EntityId, PropertyMap};

/// Convert a JSON value into the equivalent Bolt value.
///
/// Integers that fit `i64` stay integers; larger unsigned values become floats.
pub fn json_to_bolt(value: &Value) -> BoltType {
    match value {
        Value::Null => BoltType::Null(BoltNull),
        Value::Bool(b) => BoltType::from(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => BoltType::from(i),
            None => BoltType::from(n.as_f64().unwrap_or_default()),
        },
        Value::String(s) => BoltType::from(s.clone()),
        Value::Array(items) => BoltType::List(BoltList {
            value: items.iter().map(json_to_bolt).collect(),
        }),
        Value::Object(map) => props_to_bolt(map),
    }
}

/// Convert a property map into a Bolt map parameter.
pub fn props_to_bolt(props: &PropertyMap) -> BoltType {
    BoltType::Map(BoltMap {
        value: props
            .iter()
            .map(|(k, v)| (BoltString::from(k.as_str()), json_to_bolt(v)))
            .collect(),
    })
}

/// Business id as a Bolt parameter, keeping its integer/string type.
pub fn id_to_bolt(id: &EntityId) -> BoltType {
    match id {
        EntityId::Int(n) => BoltType::from(*n),
        EntityId::Text(s) => BoltType::from(s.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalars() {
        assert!(matches!(json_to_bolt(&json!(null)), BoltType::Null(_)));
        assert!(matches!(json_to_bolt(&json!(true)), BoltType::Boolean(b) if b.value));
        assert!(matches!(json_to_bolt(&json!(42)), BoltType::Integer(i) if i.value == 42));
        assert!(matches!(json_to_bolt(&json!(1.5)), BoltType::Float(f) if f.value == 1.5));
        assert!(matches!(json_to_bolt(&json!("A")), BoltType::String(s) if s.value == "A"));
    }

    #[test]
    fn test_large_unsigned_becomes_float() {
        assert!(matches!(json_to_bolt(&json!(u64::MAX)), BoltType::Float(_)));
    }

    #[test]
    fn test_list_and_map() {
        match json_to_bolt(&json!(["a", 1])) {
            BoltType::List(list) => {
                assert_eq!(list.value.len(), 2);
                assert!(matches!(&list.value[1], BoltType::Integer(i) if i.value == 1));
            }
            other => panic!("expected list, got {other:?}"),
        }

        let props = json!({"id": 1, "name": "A"});
        match props_to_bolt(props.as_object().unwrap()) {
            BoltType::Map(map) => {
                assert_eq!(map.value.len(), 2);
                let name = map.value.get(&BoltString::from("name")).unwrap();
                assert!(matches!(name, BoltType::String(s) if s.value == "A"));
            }
            other => panic!("expected map, got {other:?}"),
        }
    }

    #[test]
    fn test_id_keeps_type() {
        assert!(matches!(id_to_bolt(&EntityId::Int(7)), BoltType::Integer(i) if i.value == 7));
        assert!(matches!(
            id_to_bolt(&EntityId::Text("7".to_string())),
            BoltType::String(s) if s.value == "7"
        ));
    }
}
