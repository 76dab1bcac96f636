pub mod in_memory;
pub mod postgres;

pub use in_memory::{InMemoryContactRepository, InMemoryMessageRepository};
pub use postgres::{PgPool, PostgresContactRepository, PostgresMessageRepository};
