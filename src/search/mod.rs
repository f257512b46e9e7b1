//! Search module - entity graphs, search text projection, and queries

mod entity;
mod index;
mod query;
mod serialize;

pub use entity::{Entity, Properties, Shared};
pub use index::SearchIndex;
pub use query::{Query, Term, TermPattern};
pub use serialize::to_search_text;
