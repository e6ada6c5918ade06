//! PostgreSQL repository implementations

pub mod record_store_impl;

pub use record_store_impl::PgRecordStore;
