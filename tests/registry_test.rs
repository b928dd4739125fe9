//! Integration tests for the tool registry and dispatcher construction.

use serde_json::Value as JsonValue;
use supabase_mcp_server::backend::SupabaseClient;
use supabase_mcp_server::config::SupabaseConfig;
use supabase_mcp_server::error::ServerError;
use supabase_mcp_server::models::ToolKind;
use supabase_mcp_server::tools::{Dispatcher, ToolContext, ToolRegistry, default_handlers};

fn context() -> ToolContext<SupabaseClient> {
    let config = SupabaseConfig::new("https://abc.supabase.co", "service-role-key").unwrap();
    ToolContext::new(SupabaseClient::new(&config).unwrap(), "exec_migration")
}

/// Every tool is listed exactly once, with the required arguments of its operation.
#[test]
fn test_required_arguments_per_tool() {
    let registry = ToolRegistry::default();
    let expected: [(&str, &[&str]); 5] = [
        ("list_tables", &[]),
        ("execute_sql", &["table"]),
        ("list_users", &[]),
        ("get_user", &["user_id"]),
        ("execute_migration", &["sql"]),
    ];

    assert_eq!(registry.len(), expected.len());
    for (name, required) in expected {
        let matching: Vec<_> = registry.tools().iter().filter(|t| t.name == name).collect();
        assert_eq!(matching.len(), 1, "tool {} listed once", name);
        assert_eq!(matching[0].required(), required.to_vec(), "tool: {}", name);
    }
}

/// Listing is a pure read: repeated calls return identical descriptors.
#[test]
fn test_listing_is_stable() {
    let registry = ToolRegistry::default();
    let first = serde_json::to_value(registry.tools()).unwrap();
    let second = serde_json::to_value(registry.tools()).unwrap();
    assert_eq!(first, second);

    let tools = first.as_array().unwrap();
    for tool in tools {
        assert!(tool["name"].is_string());
        assert!(tool["description"].is_string());
        assert!(matches!(tool["inputSchema"], JsonValue::Object(_)));
    }
}

#[test]
fn test_dispatcher_accepts_default_handlers() {
    let dispatcher = Dispatcher::new(context(), ToolRegistry::new("itpi_")).unwrap();
    assert_eq!(dispatcher.registry().len(), ToolKind::ALL.len());
}

#[test]
fn test_dispatcher_rejects_missing_handler() {
    let mut handlers = default_handlers::<SupabaseClient>();
    handlers.retain(|(kind, _)| *kind != ToolKind::GetUser);

    let err = Dispatcher::with_handlers(context(), ToolRegistry::default(), handlers)
        .err()
        .expect("missing handler must be rejected");
    assert!(matches!(err, ServerError::Config { .. }));
    assert!(err.to_string().contains("get_user"));
}

#[test]
fn test_dispatcher_rejects_duplicate_handler() {
    let mut handlers = default_handlers::<SupabaseClient>();
    let duplicate = handlers[0];
    handlers.push(duplicate);

    let err = Dispatcher::with_handlers(context(), ToolRegistry::default(), handlers)
        .err()
        .expect("duplicate handler must be rejected");
    assert!(err.to_string().contains("Duplicate handler"));
}
