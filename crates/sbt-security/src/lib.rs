//! # SBT Security
//!
//! Bearer token parsing, JWT validation and the caller principal.

pub mod jwt;
pub mod principal;

pub use jwt::{Claims, JwtError, JwtService};
pub use principal::{bearer_token, Principal};
