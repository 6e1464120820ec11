//! MCP Protocol Implementation Tests
//!
//! Unit tests for tool definitions, tool dispatch, and profile tools.

mod tool_definition_tests {
    use crate::mcp::tools::{
        IngestDocumentHandler, PROFILE_ACTIONS, ProfileToolHandler, SearchDocumentsHandler,
        WebSearchHandler,
    };
    use std::collections::HashSet;

    #[test]
    fn ingest_document_tool_definition() {
        let tool = IngestDocumentHandler::tool_definition();

        assert_eq!(tool.name, "ingest_document");

        let schema = tool.input_schema;
        let properties = schema["properties"].as_object().expect("has properties");
        assert!(properties.contains_key("file_path"));
        assert!(properties.contains_key("overwrite"));
        assert_eq!(schema["properties"]["overwrite"]["type"], "boolean");

        let required = schema["required"].as_array().expect("has required array");
        assert_eq!(required.len(), 1);
        assert_eq!(required[0], "file_path");
    }

    #[test]
    fn search_documents_tool_definition() {
        let tool = SearchDocumentsHandler::tool_definition();

        assert_eq!(tool.name, "search_documents");

        let schema = tool.input_schema;
        assert_eq!(schema["properties"]["query"]["type"], "string");
        assert_eq!(schema["properties"]["top_k"]["type"], "integer");

        let required = schema["required"].as_array().expect("has required array");
        assert_eq!(required.len(), 1);
        assert_eq!(required[0], "query");
    }

    #[test]
    fn web_search_tool_definition() {
        let tool = WebSearchHandler::tool_definition();

        assert_eq!(tool.name, "web_search");

        let schema = tool.input_schema;
        let required = schema["required"].as_array().expect("has required array");
        assert_eq!(required.len(), 1);
        assert_eq!(required[0], "query");
    }

    #[test]
    fn profile_tool_names_are_unique() {
        let names: HashSet<String> = PROFILE_ACTIONS
            .iter()
            .map(|action| ProfileToolHandler::tool_definition(*action).name)
            .collect();

        assert_eq!(names.len(), PROFILE_ACTIONS.len());
        assert!(names.contains("update_user_name"));
        assert!(names.contains("get_user_profile"));
    }

    #[test]
    fn set_preference_requires_key_and_value() {
        let tool =
            ProfileToolHandler::tool_definition(crate::mcp::tools::ProfileAction::SetPreference);

        let required = tool.input_schema["required"]
            .as_array()
            .expect("has required array");
        assert_eq!(required.len(), 2);
    }
}

mod profile_handler_tests {
    use crate::mcp::protocol::{CallToolParams, ToolContent};
    use crate::mcp::server::ToolHandler;
    use crate::mcp::tools::{ProfileAction, ProfileToolHandler};
    use crate::profile::UserProfile;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    fn params(name: &str, args: serde_json::Value) -> CallToolParams {
        let arguments: HashMap<String, serde_json::Value> = args
            .as_object()
            .expect("args must be an object")
            .clone()
            .into_iter()
            .collect();
        CallToolParams {
            name: name.to_string(),
            arguments: Some(arguments),
        }
    }

    fn text_of(result: &crate::mcp::protocol::CallToolResult) -> &str {
        let ToolContent::Text { text } = &result.content[0];
        text
    }

    #[tokio::test]
    async fn set_name_updates_shared_profile() {
        let profile = Arc::new(RwLock::new(UserProfile::default()));
        let handler = ProfileToolHandler::new(Arc::clone(&profile), ProfileAction::SetName);

        let result = handler
            .handle(params("update_user_name", json!({ "name": "Alex" })))
            .await
            .expect("handler should succeed");

        assert_eq!(result.is_error, Some(false));
        assert!(text_of(&result).contains("Alex"));
        assert_eq!(profile.read().await.name, "Alex");
    }

    #[tokio::test]
    async fn missing_argument_is_a_handler_error() {
        let profile = Arc::new(RwLock::new(UserProfile::default()));
        let handler = ProfileToolHandler::new(profile, ProfileAction::SetName);

        let result = handler.handle(params("update_user_name", json!({}))).await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn get_profile_returns_summary_block() {
        let profile = Arc::new(RwLock::new(UserProfile::default()));
        profile.write().await.set_name("Alex");

        let handler = ProfileToolHandler::new(profile, ProfileAction::GetSummary);
        let result = handler
            .handle(params("get_user_profile", json!({})))
            .await
            .expect("handler should succeed");

        let text = text_of(&result);
        assert!(text.starts_with("User Info:"));
        assert!(text.contains("- Name: Alex"));
    }

    #[tokio::test]
    async fn preferences_round_trip_through_tools() {
        let profile = Arc::new(RwLock::new(UserProfile::default()));

        let set = ProfileToolHandler::new(Arc::clone(&profile), ProfileAction::SetPreference);
        set.handle(params(
            "set_user_preference",
            json!({ "key": "tone", "value": "casual" }),
        ))
        .await
        .expect("handler should succeed");

        let get = ProfileToolHandler::new(profile, ProfileAction::GetSummary);
        let result = get
            .handle(params("get_user_profile", json!({})))
            .await
            .expect("handler should succeed");

        assert!(text_of(&result).contains("tone: casual"));
    }
}

mod server_tests {
    use crate::mcp::protocol::{CallToolParams, CallToolResult, Tool};
    use crate::mcp::server::{ConnectionState, McpServer, MessageHandler, ToolHandler};
    use anyhow::Result;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Arc;

    struct EchoHandler;

    #[async_trait]
    impl ToolHandler for EchoHandler {
        async fn handle(&self, params: CallToolParams) -> Result<CallToolResult> {
            Ok(CallToolResult::text(params.name))
        }
    }

    fn echo_tool() -> Tool {
        Tool {
            name: "echo".to_string(),
            description: None,
            input_schema: json!({ "type": "object", "properties": {} }),
        }
    }

    #[tokio::test]
    async fn new_server_starts_uninitialized() {
        let server = McpServer::new("test".to_string(), "0.0.0".to_string());

        assert_eq!(server.connection_state().await, ConnectionState::Uninitialized);
    }

    #[tokio::test]
    async fn registered_tools_are_listed() {
        let server = Arc::new(McpServer::new("test".to_string(), "0.0.0".to_string()));
        server.register_tool(echo_tool(), EchoHandler).await;

        let handler = MessageHandler::new(Arc::clone(&server));
        let listed = handler.handle_list_tools().await.expect("list should succeed");

        let tools = listed["tools"].as_array().expect("has tools array");
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0]["name"], "echo");
    }

    #[tokio::test]
    async fn call_dispatches_to_registered_handler() {
        let server = Arc::new(McpServer::new("test".to_string(), "0.0.0".to_string()));
        server.register_tool(echo_tool(), EchoHandler).await;

        let handler = MessageHandler::new(Arc::clone(&server));
        let result = handler
            .handle_call_tool(Some(json!({ "name": "echo", "arguments": {} })))
            .await
            .expect("call should succeed");

        assert_eq!(result["content"][0]["text"], "echo");
    }

    #[tokio::test]
    async fn unknown_tool_is_an_error() {
        let server = Arc::new(McpServer::new("test".to_string(), "0.0.0".to_string()));
        let handler = MessageHandler::new(Arc::clone(&server));

        let result = handler
            .handle_call_tool(Some(json!({ "name": "nope", "arguments": {} })))
            .await;

        assert!(result.is_err());
    }
}
