//! Tool Registry
//!
//! Information Hiding:
//! - Tool storage and lookup implementation hidden
//! - Registration table populated once at startup
//! - Descriptor derivation abstracted

use super::{Tool, ToolDescriptor, ToolMetadata};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Tool registry for managing available tools
///
/// Tools are kept ordered by name, so descriptors come out in a stable order.
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: BTreeMap::new(),
        }
    }

    /// Register a new tool. A tool with the same name is replaced.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.metadata().name;
        tracing::info!("Registering tool: {}", name);
        if self.tools.insert(name.clone(), tool).is_some() {
            tracing::warn!("Tool '{}' was already registered; replacing it", name);
        }
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Check if a tool exists
    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Get all tool names
    pub fn tool_names(&self) -> Vec<String> {
        self.tools.keys().cloned().collect()
    }

    /// Get all tool metadata
    pub fn list_tools(&self) -> Vec<ToolMetadata> {
        self.tools.values().map(|tool| tool.metadata()).collect()
    }

    /// Schemas advertised to the completion endpoint
    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.tools
            .values()
            .map(|tool| ToolDescriptor::from(&tool.metadata()))
            .collect()
    }

    /// Get tool metadata as formatted string for LLM prompts
    pub fn tools_description(&self) -> String {
        let mut descriptions = Vec::new();
        for tool in self.tools.values() {
            let metadata = tool.metadata();
            let params = metadata
                .parameters
                .iter()
                .map(|p| {
                    let required = if p.is_required() { "required" } else { "optional" };
                    format!("  - {} ({}) [{}]", p.name, p.schema_type(), required)
                })
                .collect::<Vec<_>>()
                .join("\n");

            descriptions.push(format!(
                "Tool: {}\nDescription: {}\nParameters:\n{}",
                metadata.name,
                metadata.description(),
                params
            ));
        }
        descriptions.join("\n\n")
    }

    /// Create a registry with the built-in tools
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.register(Arc::new(crate::tools::filesystem::ReadTextFileTool::new()));
        registry.register(Arc::new(crate::tools::filesystem::ListFilesTool::new()));
        registry.register(Arc::new(crate::tools::control::TerminateTool));

        registry
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool_metadata;
    use crate::tools::{ToolFailure, NO_DESCRIPTION};
    use async_trait::async_trait;
    use serde_json::Value;
    use std::collections::BTreeSet;

    struct Undocumented;

    #[async_trait]
    impl Tool for Undocumented {
        fn metadata(&self) -> ToolMetadata {
            tool_metadata! {
                name: "undocumented",
                parameters: [
                    { name: "value" }
                ]
            }
        }

        async fn execute(&self, _args: Value) -> Result<String, ToolFailure> {
            Ok(String::new())
        }
    }

    struct Versioned(&'static str);

    #[async_trait]
    impl Tool for Versioned {
        fn metadata(&self) -> ToolMetadata {
            tool_metadata! {
                name: "versioned",
                description: self.0,
                parameters: []
            }
        }

        async fn execute(&self, _args: Value) -> Result<String, ToolFailure> {
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn test_registry_register_and_get() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(Undocumented));

        assert!(registry.has_tool("undocumented"));
        assert!(registry.get("undocumented").is_some());
        assert!(registry.get("nonexistent").is_none());
    }

    #[test]
    fn test_default_tools() {
        let registry = ToolRegistry::with_defaults();

        assert_eq!(
            registry.tool_names(),
            vec!["list_files_in_directory", "read_text_file", "terminate"]
        );
    }

    #[test]
    fn test_descriptor_names_match_registry() {
        let registry = ToolRegistry::with_defaults();
        let names: BTreeSet<String> = registry
            .descriptors()
            .into_iter()
            .map(|d| d.name)
            .collect();

        assert_eq!(names, registry.tool_names().into_iter().collect());
    }

    #[test]
    fn test_required_matches_parameters_without_defaults() {
        let registry = ToolRegistry::with_defaults();

        for (metadata, descriptor) in registry.list_tools().iter().zip(registry.descriptors()) {
            let expected: Vec<String> = metadata
                .parameters
                .iter()
                .filter(|p| p.default.is_none())
                .map(|p| p.name.clone())
                .collect();

            assert_eq!(descriptor.required, expected, "tool {}", metadata.name);
            assert_eq!(descriptor.parameters.len(), metadata.parameters.len());
        }
    }

    #[test]
    fn test_undocumented_tool_gets_placeholder() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(Undocumented));

        let descriptors = registry.descriptors();
        assert_eq!(descriptors[0].description, NO_DESCRIPTION);
        assert_eq!(descriptors[0].parameters["value"].param_type, "string");
    }

    #[test]
    fn test_duplicate_name_last_wins() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(Versioned("first")));
        registry.register(Arc::new(Versioned("second")));

        let descriptors = registry.descriptors();
        assert_eq!(descriptors.len(), 1);
        assert_eq!(descriptors[0].description, "second");
    }

    #[test]
    fn test_tools_description() {
        let registry = ToolRegistry::with_defaults();
        let description = registry.tools_description();

        assert!(description.contains("read_text_file"));
        assert!(description.contains("file_type (string) [optional]"));
        assert!(description.contains("Description:"));
        assert!(description.contains("Parameters:"));
    }
}
