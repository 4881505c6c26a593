use anyhow::Result;
use tracing::info;

use concepts_repository::{neo4j, ConceptsService, Neo4jGraphStore};
use concepts_schema::Schema;

mod config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .with_target(false)
        .init();

    // Load environment variables
    dotenv::dotenv().ok();

    info!("Starting concepts service");

    info!("Connecting to Neo4j...");
    let graph = neo4j::connect(
        &config::get_neo4j_uri()?,
        &config::get_neo4j_user(),
        &config::get_neo4j_password(),
    )?;
    info!("✓ Connected to Neo4j");

    let service = ConceptsService::new(Box::new(Neo4jGraphStore::new(graph)), Schema::core());

    info!("Applying store constraints...");
    service.initialise().await?;
    info!("✓ Store constraints applied");

    service.check().await?;
    info!("✓ Store connectivity verified, service ready");

    Ok(())
}
