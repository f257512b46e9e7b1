//! Entity sources - where the filtered entity lists come from

mod file;
mod remote;
mod traits;

use serde_json::Value;

use crate::config::HttpConfig;
use crate::http::create_client;

pub use file::FileSource;
pub use remote::HttpSource;
pub use traits::EntitySource;

/// Envelope fields that commonly wrap a list in REST responses
const LIST_FIELDS: [&str; 3] = ["data", "items", "results"];

/// Pick a source for a location: http(s) URLs are fetched, anything else is a file path
pub fn open(location: &str, http: &HttpConfig) -> anyhow::Result<Box<dyn EntitySource>> {
    if location.starts_with("http://") || location.starts_with("https://") {
        let client = create_client(http.timeout_secs)?;
        Ok(Box::new(HttpSource::new(location, client)))
    } else {
        Ok(Box::new(FileSource::new(location)))
    }
}

/// Split a loaded document into entity documents.
///
/// Arrays yield their elements, list envelopes (`data`, `items`, `results`)
/// yield the wrapped elements, anything else is a single entity.
pub fn split_document(doc: Value) -> Vec<Value> {
    match doc {
        Value::Array(items) => items,
        Value::Object(mut map) => {
            let field = LIST_FIELDS
                .iter()
                .find(|f| map.get(**f).is_some_and(Value::is_array));
            match field.and_then(|f| map.remove(*f)) {
                Some(Value::Array(items)) => items,
                _ => vec![Value::Object(map)],
            }
        }
        other => vec![other],
    }
}
