//! # SBT Core - Domain Module
//! 
//! Records, table descriptors and control plane events.

pub mod record;
pub mod table;
pub mod event;

pub use record::{Record, RecordStatus};
pub use table::{
    TableSpec, BILLING_CUSTOMERS, BILLING_RECORDS, SUBSCRIBERS, TENANTS, TENANT_REGISTRATIONS, USERS,
};
pub use event::{ControlPlaneEvent, DetailType};
