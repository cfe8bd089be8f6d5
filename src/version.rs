// Build-time version from Cargo.toml

/// Package version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Package name (from Cargo.toml).
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// "serverdash 0.1.0", logged at startup.
pub fn banner() -> String {
    format!("{NAME} {VERSION}")
}
