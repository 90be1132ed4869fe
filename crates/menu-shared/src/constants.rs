//! Application-wide constants

pub const DEFAULT_EXPORT_PRODUCER: &str = "Menu Migration Service";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
pub const USER_ID_HEADER: &str = "x-user-id";
pub const SYSTEM_USER_ID: i64 = 0;
