//! Build metadata stamped by `build.rs`.

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn git_hash() -> &'static str {
    option_env!("SPENDLOG_BUILD_HASH").unwrap_or("unknown")
}

pub fn timestamp() -> &'static str {
    option_env!("SPENDLOG_BUILD_TIMESTAMP").unwrap_or("unknown")
}

pub fn profile() -> &'static str {
    option_env!("SPENDLOG_BUILD_PROFILE").unwrap_or("unknown")
}

/// `0.1.0 (abc1234, release, built 2025-03-25T12:00:00+00:00)`
pub fn long_version() -> String {
    format!(
        "{} ({}, {}, built {})",
        VERSION,
        git_hash(),
        profile(),
        timestamp()
    )
}
