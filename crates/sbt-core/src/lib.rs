//! # SBT Core
//! 
//! Domain records, the partial update engine, repository and publisher
//! ports, and the control plane services built on them.

pub mod domain;
pub mod update;
pub mod repositories;
pub mod services;
pub mod error;

// Re-export domain entities
pub use domain::*;
pub use error::DomainError;
pub use update::{PartialUpdateEngine, UpdateExpression, UpdateRequest};
