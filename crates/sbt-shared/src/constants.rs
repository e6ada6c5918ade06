//! Application-wide constants

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const MAX_PAGE_SIZE: usize = 100;
pub const ACTIVE_FLAG_ATTRIBUTE: &str = "sbtaws_active";
pub const DEFAULT_SYS_ADMIN_ROLE: &str = "SystemAdmin";
pub const DEFAULT_EVENT_BUS_CAPACITY: usize = 256;
pub const DEFAULT_TOKEN_EXPIRY: i64 = 3600;
