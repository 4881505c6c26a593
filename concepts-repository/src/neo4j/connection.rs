// Neo4j connection setup
use neo4rs::Graph;

use crate::errors::GraphStoreError;

/// Connect to Neo4j and return a Graph instance
pub fn connect(uri: &str, user: &str, password: &str) -> Result<Graph, GraphStoreError> {
    Graph::new(uri, user, password).map_err(|e| GraphStoreError::connection(e.to_string()))
}
