//! Cycle-guarded serialization of entity graphs
//!
//! Output layout is serde_json's pretty printer: two-space indentation, one
//! property or array element per line, `"key": value`. Query matching in
//! [`super::query`] relies on exactly this layout.

use std::cell::RefCell;

use rustc_hash::FxHashSet;
use serde::ser::{SerializeMap, SerializeSeq, Serializer};
use serde::Serialize;
use tracing::warn;

use super::entity::Entity;

/// Largest integer an f64 represents exactly
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Render an entity graph as lowercase pretty JSON.
///
/// Every array or object is emitted at most once per call. A later encounter
/// drops the property that holds it, or renders as `[]` inside an array.
/// Never fails: on serializer error the result is an empty string.
pub fn to_search_text(entity: &Entity) -> String {
    let seen = RefCell::new(FxHashSet::default());
    let guarded = Guarded {
        entity,
        seen: &seen,
    };

    match serde_json::to_string_pretty(&guarded) {
        Ok(text) => text.to_lowercase(),
        Err(e) => {
            warn!("Failed to serialize entity for search: {}", e);
            String::new()
        }
    }
}

/// Serialize adapter carrying the visited set of the current pass
struct Guarded<'a> {
    entity: &'a Entity,
    seen: &'a RefCell<FxHashSet<usize>>,
}

impl Guarded<'_> {
    /// Record the node as visited; false if it was already emitted
    fn enter(&self) -> bool {
        match self.entity.identity() {
            Some(id) => self.seen.borrow_mut().insert(id),
            None => true,
        }
    }

    fn child<'b>(&'b self, entity: &'b Entity) -> Guarded<'b> {
        Guarded {
            entity,
            seen: self.seen,
        }
    }

    fn already_seen(&self, entity: &Entity) -> bool {
        entity
            .identity()
            .is_some_and(|id| self.seen.borrow().contains(&id))
    }
}

/// Stand-in for a node that must not be emitted again. No line pattern can
/// match it, so it contributes no searchable text.
fn placeholder<S: Serializer>(serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_seq(Some(0))?.end()
}

impl Serialize for Guarded<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.entity {
            Entity::Null => serializer.serialize_unit(),
            Entity::Bool(b) => serializer.serialize_bool(*b),
            Entity::Number(n) => serialize_number(*n, serializer),
            Entity::String(s) => serializer.serialize_str(s),
            Entity::Array(items) => {
                if !self.enter() {
                    return placeholder(serializer);
                }
                // A node borrowed mutably elsewhere degrades to the placeholder
                let Ok(items) = items.try_borrow() else {
                    return placeholder(serializer);
                };
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items.iter() {
                    seq.serialize_element(&self.child(item))?;
                }
                seq.end()
            }
            Entity::Object(props) => {
                if !self.enter() {
                    return placeholder(serializer);
                }
                let Ok(props) = props.try_borrow() else {
                    return placeholder(serializer);
                };
                // Revisited children drop the whole property, key included
                let mut map = serializer.serialize_map(None)?;
                for (key, value) in props.iter() {
                    if self.already_seen(value) {
                        continue;
                    }
                    map.serialize_entry(key, &self.child(value))?;
                }
                map.end()
            }
        }
    }
}

/// Integral values print without a fractional part; non-finite values as null
fn serialize_number<S: Serializer>(n: f64, serializer: S) -> Result<S::Ok, S::Error> {
    if !n.is_finite() {
        serializer.serialize_unit()
    } else if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        serializer.serialize_i64(n as i64)
    } else {
        serializer.serialize_f64(n)
    }
}
