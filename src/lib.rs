#![forbid(unsafe_code)]

//! Client library and CLI for the Yutori API: n1 chat completions, browsing
//! and research tasks, and scouts.

pub mod api;
pub mod async_client;
pub mod auth;
pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod n1;
pub mod polling;
pub mod schema;
pub mod utils;
pub mod version;

pub use async_client::AsyncYutoriClient;
pub use client::{ClientBuilder, YutoriClient};
pub use error::{Result, YutoriError};
pub use schema::OutputSchema;
