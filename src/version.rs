// Compile-time constants from Cargo.toml and build.rs
pub const VERSION: &str = env!("YUTORI_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");

/// User-Agent sent with every API request
pub fn user_agent() -> String {
    format!("yutori-rust/{}", VERSION)
}
