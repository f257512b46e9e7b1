//! entity-search - free-text search over arbitrary entity graphs
//!
//! The core is [`search::SearchIndex`], which projects a possibly cyclic
//! entity graph to searchable text and evaluates multi-term queries against
//! it. [`operation::Operation`] and [`state::LocalStateCache`] are the small
//! helpers list views use around it.

pub mod cli;
pub mod config;
pub mod http;
pub mod operation;
pub mod search;
pub mod source;
pub mod state;
