//! Data model and statistics: schema, roster, per-goal aggregates

pub mod aggregator;
pub mod roster;
pub mod schema;

pub use aggregator::{aggregate, percentage, Aggregates, GoalStats};
pub use roster::Roster;
pub use schema::{Category, Schema, SchemaModel, SchemaSource};
