// src/indexer/mod.rs
pub mod envio;
pub mod models;
pub mod queries;

pub use envio::{BridgeIndexer, EnvioClient, TokenRegistry};
