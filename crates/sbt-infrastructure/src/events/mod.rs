//! Event bus adapters

pub mod event_bus;

pub use event_bus::EventBus;
