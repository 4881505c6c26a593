//! `GraphStore` over a `neo4rs` connection.
use std::collections::HashMap;

use neo4rs::{BoltType, Graph, Query};
use tracing::{info, warn};

use concepts_schema::{ParamValue, Statement};

use crate::errors::GraphStoreError;
use crate::interfaces::GraphStore;

/// Uniqueness constraints backing the node identity model: source nodes are
/// keyed by `uuid`, canonical nodes by `prefUUID`.
const CONSTRAINTS: &[&str] = &[
    "CREATE CONSTRAINT thing_uuid_unique IF NOT EXISTS FOR (t:Thing) REQUIRE t.uuid IS UNIQUE",
    "CREATE CONSTRAINT thing_pref_uuid_unique IF NOT EXISTS FOR (t:Thing) REQUIRE t.prefUUID IS UNIQUE",
];

pub struct Neo4jGraphStore {
    graph: Graph,
}

impl Neo4jGraphStore {
    pub fn new(graph: Graph) -> Self {
        Self { graph }
    }
}

fn to_query(statement: &Statement) -> Query {
    let mut query = Query::new(statement.text.clone());
    for (key, value) in &statement.params {
        query = query.param(key, to_bolt(value));
    }
    query
}

fn to_bolt(value: &ParamValue) -> BoltType {
    match value {
        ParamValue::String(s) => s.clone().into(),
        ParamValue::Int(i) => (*i).into(),
        ParamValue::Bool(b) => (*b).into(),
        ParamValue::StringList(xs) => xs.clone().into(),
        ParamValue::List(xs) => xs.iter().map(to_bolt).collect::<Vec<_>>().into(),
        ParamValue::Map(m) => m
            .iter()
            .map(|(k, v)| (k.clone(), to_bolt(v)))
            .collect::<HashMap<String, BoltType>>()
            .into(),
    }
}

#[async_trait::async_trait]
impl GraphStore for Neo4jGraphStore {
    async fn write_batch(&self, statements: &[Statement]) -> Result<(), GraphStoreError> {
        let mut txn = self
            .graph
            .start_txn()
            .await
            .map_err(|e| GraphStoreError::transaction(e.to_string()))?;

        let queries: Vec<Query> = statements.iter().map(to_query).collect();
        txn.run_queries(queries)
            .await
            .map_err(|e| GraphStoreError::transaction(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| GraphStoreError::transaction(e.to_string()))
    }

    async fn fetch_rows(
        &self,
        statement: &Statement,
    ) -> Result<Vec<serde_json::Value>, GraphStoreError> {
        let mut result = self
            .graph
            .execute(to_query(statement))
            .await
            .map_err(|e| GraphStoreError::query(e.to_string()))?;

        let mut rows = Vec::new();
        while let Some(row) = result
            .next()
            .await
            .map_err(|e| GraphStoreError::query(e.to_string()))?
        {
            rows.push(
                row.to::<serde_json::Value>()
                    .map_err(|e| GraphStoreError::decode(e.to_string()))?,
            );
        }
        Ok(rows)
    }

    async fn check(&self) -> Result<(), GraphStoreError> {
        let mut result = self
            .graph
            .execute(Query::new("RETURN 1 AS result".to_string()))
            .await
            .map_err(|e| GraphStoreError::connection(e.to_string()))?;
        result
            .next()
            .await
            .map_err(|e| GraphStoreError::connection(e.to_string()))?;
        Ok(())
    }

    async fn initialise(&self) -> Result<(), GraphStoreError> {
        for ddl in CONSTRAINTS {
            match self.graph.run(Query::new(ddl.to_string())).await {
                Ok(_) => info!(constraint = *ddl, "Created constraint"),
                Err(e) => warn!(
                    constraint = *ddl,
                    error = %e,
                    "Failed to create constraint (may already exist)"
                ),
            }
        }
        Ok(())
    }
}
