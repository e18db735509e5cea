//! Entity to model mappers
//!
//! - `From<Model> for Entity` / `TryFrom`: Convert database rows to domain objects
//! - `*Insert` structs: Prepare entity data for database operations

mod link;
mod nickname;

pub use link::LinkInsert;
