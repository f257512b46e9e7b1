//! Entity graph model
//!
//! Arrays and objects are shared handles, so a graph can alias a node or
//! point back at itself. Cloning an [`Entity`] clones the handle only.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde_json::Value;

/// Shared, interior-mutable node storage
pub type Shared<T> = Rc<RefCell<T>>;

/// Ordered object properties
pub type Properties = Vec<(String, Entity)>;

/// A node in an arbitrary, possibly self-referential, object graph
#[derive(Clone, Default)]
pub enum Entity {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Shared<Vec<Entity>>),
    Object(Shared<Properties>),
}

impl Entity {
    /// Create an empty object node
    pub fn object() -> Self {
        Entity::Object(Rc::new(RefCell::new(Vec::new())))
    }

    /// Create an empty array node
    pub fn array() -> Self {
        Entity::Array(Rc::new(RefCell::new(Vec::new())))
    }

    /// Set a property on an object node, replacing an existing value in place.
    ///
    /// Returns false if this node is not an object.
    pub fn insert(&self, key: impl Into<String>, value: impl Into<Entity>) -> bool {
        let Entity::Object(props) = self else {
            return false;
        };
        let key = key.into();
        let value = value.into();
        let mut props = props.borrow_mut();
        match props.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => props.push((key, value)),
        }
        true
    }

    /// Append an element to an array node. Returns false if this node is not an array.
    pub fn push(&self, value: impl Into<Entity>) -> bool {
        let Entity::Array(items) = self else {
            return false;
        };
        items.borrow_mut().push(value.into());
        true
    }

    /// Look up a property of an object node
    pub fn get(&self, key: &str) -> Option<Entity> {
        match self {
            Entity::Object(props) => props
                .borrow()
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone()),
            _ => None,
        }
    }

    /// Number of properties or elements; zero for scalars
    pub fn len(&self) -> usize {
        match self {
            Entity::Array(items) => items.borrow().len(),
            Entity::Object(props) => props.borrow().len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Address of the shared node, used as its identity. Scalars have none.
    pub fn identity(&self) -> Option<usize> {
        match self {
            Entity::Array(items) => Some(Rc::as_ptr(items) as *const () as usize),
            Entity::Object(props) => Some(Rc::as_ptr(props) as *const () as usize),
            _ => None,
        }
    }

    /// Whether both handles point at the same node
    pub fn is_same(&self, other: &Entity) -> bool {
        match (self.identity(), other.identity()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Entity::Null => "null",
            Entity::Bool(_) => "bool",
            Entity::Number(_) => "number",
            Entity::String(_) => "string",
            Entity::Array(_) => "array",
            Entity::Object(_) => "object",
        }
    }
}

// Derived Debug would recurse forever on a cyclic graph.
impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::Null => f.write_str("Null"),
            Entity::Bool(b) => write!(f, "Bool({})", b),
            Entity::Number(n) => write!(f, "Number({})", n),
            Entity::String(s) => write!(f, "String({:?})", s),
            _ => write!(f, "{}(len={}, id={:#x})", self.kind(), self.len(), self.identity().unwrap_or(0)),
        }
    }
}

impl From<Value> for Entity {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Entity::Null,
            Value::Bool(b) => Entity::Bool(b),
            Value::Number(n) => n.as_f64().map_or(Entity::Null, Entity::Number),
            Value::String(s) => Entity::String(s),
            Value::Array(items) => {
                let items: Vec<Entity> = items.into_iter().map(Entity::from).collect();
                Entity::Array(Rc::new(RefCell::new(items)))
            }
            Value::Object(map) => {
                let props: Properties = map.into_iter().map(|(k, v)| (k, Entity::from(v))).collect();
                Entity::Object(Rc::new(RefCell::new(props)))
            }
        }
    }
}

impl From<&Value> for Entity {
    fn from(value: &Value) -> Self {
        Entity::from(value.clone())
    }
}

impl From<&str> for Entity {
    fn from(s: &str) -> Self {
        Entity::String(s.to_string())
    }
}

impl From<String> for Entity {
    fn from(s: String) -> Self {
        Entity::String(s)
    }
}

impl From<bool> for Entity {
    fn from(b: bool) -> Self {
        Entity::Bool(b)
    }
}

impl From<f64> for Entity {
    fn from(n: f64) -> Self {
        Entity::Number(n)
    }
}

impl From<i64> for Entity {
    fn from(n: i64) -> Self {
        Entity::Number(n as f64)
    }
}

impl From<i32> for Entity {
    fn from(n: i32) -> Self {
        Entity::Number(n as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_insert_replaces_in_place() {
        let order = Entity::object();
        order.insert("reference", "A-100");
        order.insert("status", "open");
        order.insert("reference", "A-200");

        assert_eq!(order.len(), 2);
        match order.get("reference") {
            Some(Entity::String(s)) => assert_eq!(s, "A-200"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_insert_and_push_on_wrong_kind() {
        let list = Entity::array();
        assert!(!list.insert("key", 1));
        assert!(list.push(1));

        let scalar = Entity::from("text");
        assert!(!scalar.push(1));
        assert!(scalar.get("key").is_none());
    }

    #[test]
    fn test_clone_shares_node() {
        let route = Entity::object();
        let alias = route.clone();
        alias.insert("driver", "jansen");

        assert!(route.is_same(&alias));
        assert!(route.get("driver").is_some());
        assert!(!route.is_same(&Entity::object()));
    }

    #[test]
    fn test_from_json_preserves_order() {
        let entity = Entity::from(json!({"zeta": 1, "alpha": [true, null]}));
        let Entity::Object(props) = &entity else {
            panic!("expected object");
        };
        let keys: Vec<String> = props.borrow().iter().map(|(k, _)| k.clone()).collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
        assert_eq!(entity.get("alpha").map(|a| a.len()), Some(2));
    }

    #[test]
    fn test_debug_on_cycle_terminates() {
        let node = Entity::object();
        node.insert("self", node.clone());
        let rendered = format!("{:?}", node);
        assert!(rendered.starts_with("object(len=1"));
    }
}
