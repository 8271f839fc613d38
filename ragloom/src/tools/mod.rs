//! Tools offered to the reasoning agent.
//!
//! [`build_tools`] assembles the default set in order: the corpus
//! [`retriever`](TOOL_RETRIEVER) tool and the [`wikipedia`](TOOL_WIKIPEDIA)
//! general-knowledge tool. Both take a single `query` string argument.

mod corpus;
mod registry;
mod r#trait;
mod wikipedia;

pub use corpus::{
    format_chunks, CorpusTool, CORPUS_TOOL_MAX_CHUNKS, NO_DOCUMENTS_FOUND, TOOL_RETRIEVER,
};
pub use r#trait::Tool;
pub use registry::ToolRegistry;
pub use wikipedia::{
    WikipediaTool, NO_WIKIPEDIA_RESULT, TOOL_WIKIPEDIA, WIKIPEDIA_MAX_CHARS,
    WIKIPEDIA_MAX_RESULTS,
};

use std::sync::Arc;

use serde_json::{json, Value};

use crate::retrieval::Retriever;
use crate::tool_source::ToolSourceError;

/// Default tool set: corpus retriever over `retriever`, then Wikipedia.
pub fn build_tools(retriever: Arc<dyn Retriever>) -> Result<ToolRegistry, ToolSourceError> {
    build_tools_with(retriever, Arc::new(WikipediaTool::new()))
}

/// Corpus retriever over `retriever`, then `knowledge` as the general-knowledge tool.
///
/// Fails with [`ToolSourceError::DuplicateName`] if `knowledge` is also named `retriever`.
pub fn build_tools_with(
    retriever: Arc<dyn Retriever>,
    knowledge: Arc<dyn Tool>,
) -> Result<ToolRegistry, ToolSourceError> {
    ToolRegistry::from_tools([
        Arc::new(CorpusTool::new(retriever)) as Arc<dyn Tool>,
        knowledge,
    ])
}

/// JSON schema for an object with one required string field `query`.
pub(crate) fn query_schema(description: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            "query": { "type": "string", "description": description }
        },
        "required": ["query"]
    })
}

/// The `query` argument; a bare JSON string is accepted as the query itself.
pub(crate) fn query_arg(args: &Value) -> Result<&str, ToolSourceError> {
    args.get("query")
        .and_then(Value::as_str)
        .or_else(|| args.as_str())
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| ToolSourceError::InvalidInput("missing query".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retrieval::StaticRetriever;

    /// **Scenario**: Default tool set is retriever then wikipedia, with distinct descriptions.
    #[test]
    fn build_tools_registers_retriever_then_wikipedia() {
        let reg = build_tools(Arc::new(StaticRetriever::empty())).unwrap();
        assert_eq!(reg.names(), vec!["retriever", "wikipedia"]);
        let specs = reg.list();
        assert_eq!(
            specs[0].description.as_deref(),
            Some("Fetch passages from indexed corpus.")
        );
        assert_eq!(
            specs[1].description.as_deref(),
            Some("Search Wikipedia for general knowledge.")
        );
        assert_eq!(specs[0].input_schema["required"][0], "query");
    }

    /// **Scenario**: A knowledge tool that reuses the corpus tool's name is rejected.
    #[test]
    fn build_tools_with_duplicate_name_fails() {
        let retriever: Arc<dyn Retriever> = Arc::new(StaticRetriever::empty());
        let err = build_tools_with(
            Arc::clone(&retriever),
            Arc::new(CorpusTool::new(retriever)),
        )
        .err()
        .unwrap();
        assert!(matches!(err, ToolSourceError::DuplicateName(n) if n == "retriever"));
    }

    #[test]
    fn query_arg_accepts_object_or_string() {
        assert_eq!(query_arg(&json!({"query": "a"})).unwrap(), "a");
        assert_eq!(query_arg(&json!("b")).unwrap(), "b");
        assert!(query_arg(&json!({"query": "  "})).is_err());
        assert!(query_arg(&json!({"q": "x"})).is_err());
    }
}
