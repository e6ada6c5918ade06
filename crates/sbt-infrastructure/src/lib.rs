//! # SBT Infrastructure
//! 
//! Record store and event bus implementations (adapters).

pub mod database;
pub mod memory;
pub mod events;

pub use database::{create_pool, run_migrations, PgRecordStore};
pub use memory::MemoryRecordStore;
pub use events::EventBus;
