pub mod browser;
pub mod format;
pub mod prompt;
