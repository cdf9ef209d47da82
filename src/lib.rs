pub mod allowlist;
pub mod helpers;
pub mod host_check;
