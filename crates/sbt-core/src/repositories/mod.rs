//! Repository traits (ports)

pub mod record_store;
pub mod event_publisher;

pub use record_store::{PutCondition, RecordStore, ScanPage};
pub use event_publisher::EventPublisher;

#[cfg(test)]
pub use record_store::MockRecordStore;
#[cfg(test)]
pub use event_publisher::MockEventPublisher;
