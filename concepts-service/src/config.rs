// Environment configuration helpers
use anyhow::{Context, Result};

/// Get NEO4J_URI from environment
pub fn get_neo4j_uri() -> Result<String> {
    std::env::var("NEO4J_URI").context("NEO4J_URI must be set")
}

/// Get NEO4J_USER from environment, empty when unauthenticated
pub fn get_neo4j_user() -> String {
    std::env::var("NEO4J_USER").unwrap_or_default()
}

/// Get NEO4J_PASSWORD from environment, empty when unauthenticated
pub fn get_neo4j_password() -> String {
    std::env::var("NEO4J_PASSWORD").unwrap_or_default()
}
