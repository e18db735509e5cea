//! # herald-db
//!
//! Persistence layer implementing the link and nickname-history repositories.
//!
//! ## Overview
//!
//! - Connection pool management and schema bootstrap
//! - Database models with SQLx `FromRow` derives
//! - Entity ↔ Model mappers
//! - PostgreSQL repository implementations
//! - In-memory repositories for development and tests
//!
//! ## Usage
//!
//! ```rust,ignore
//! use herald_db::{create_pool, ensure_schema, DatabaseConfig, PgLinkRepository};
//! use herald_core::traits::LinkRepository;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&DatabaseConfig::default()).await?;
//!     ensure_schema(&pool).await?;
//!     let links = PgLinkRepository::new(pool);
//!     let all = links.find_all().await?;
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod memory;
pub mod models;
pub mod pool;
pub mod repositories;
pub mod schema;

// Re-export commonly used types
pub use memory::{InMemoryLinkRepository, InMemoryNicknameHistoryRepository};
pub use pool::{create_pool, DatabaseConfig, PgPool};
pub use repositories::{PgLinkRepository, PgNicknameHistoryRepository};
pub use schema::ensure_schema;
