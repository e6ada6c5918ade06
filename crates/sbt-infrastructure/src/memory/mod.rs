//! In-process adapters for development and tests

pub mod record_store_impl;

pub use record_store_impl::MemoryRecordStore;
