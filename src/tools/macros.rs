//! Tool Definition Macros
//!
//! Simplifies tool creation by reducing boilerplate

/// Define tool metadata using a declarative syntax
///
/// `description`, a parameter's `type` and its `default` are optional.
/// A parameter with a `default` is not required.
///
/// # Example
/// ```
/// use toolchat::tool_metadata;
///
/// let metadata = tool_metadata! {
///     name: "list_files_in_directory",
///     description: "Lists all files in the given directory",
///     parameters: [
///         { name: "directory" },
///         { name: "file_type", default: null }
///     ]
/// };
/// assert_eq!(metadata.parameters.len(), 2);
/// ```
#[macro_export]
macro_rules! tool_metadata {
    (
        name: $name:expr,
        $(description: $description:expr,)?
        parameters: [
            $(
                {
                    name: $param_name:expr
                    $(, type: $param_type:expr)?
                    $(, default: $param_default:tt)?
                }
            ),* $(,)?
        ]
    ) => {
        $crate::tools::ToolMetadata {
            name: $name.to_string(),
            description: None::<String>$(.or(Some($description.to_string())))?,
            parameters: vec![
                $(
                    $crate::tools::ToolParameter {
                        name: $param_name.to_string(),
                        param_type: None::<String>$(.or(Some($param_type.to_string())))?,
                        default: None::<serde_json::Value>
                            $(.or(Some(serde_json::json!($param_default))))?,
                    }
                ),*
            ],
        }
    };
}

/// Extract a required string argument or fail with `InvalidArguments`
#[macro_export]
macro_rules! required_string {
    ($args:expr, $param:expr) => {
        match $args[$param].as_str() {
            Some(value) => value,
            None => {
                return Err($crate::tools::ToolFailure::invalid_arguments(format!(
                    "'{}' parameter is required and must be a string",
                    $param
                )))
            }
        }
    };
}

/// Extract an optional string argument; `null` and absence both yield `None`
#[macro_export]
macro_rules! optional_string {
    ($args:expr, $param:expr) => {
        $args[$param].as_str()
    };
}

#[cfg(test)]
mod tests {
    use crate::tools::{ToolFailure, NO_DESCRIPTION};
    use serde_json::{json, Value};

    #[test]
    fn test_tool_metadata_macro() {
        let metadata = tool_metadata! {
            name: "test_tool",
            description: "A test tool",
            parameters: [
                { name: "param1" },
                { name: "param2", type: "integer", default: 3 }
            ]
        };

        assert_eq!(metadata.name, "test_tool");
        assert_eq!(metadata.description.as_deref(), Some("A test tool"));
        assert_eq!(metadata.parameters.len(), 2);
        assert_eq!(metadata.parameters[0].name, "param1");
        assert!(metadata.parameters[0].is_required());
        assert_eq!(metadata.parameters[0].schema_type(), "string");
        assert_eq!(metadata.parameters[1].schema_type(), "integer");
        assert_eq!(metadata.parameters[1].default, Some(json!(3)));
        assert!(!metadata.parameters[1].is_required());
    }

    #[test]
    fn test_tool_metadata_without_description() {
        let metadata = tool_metadata! {
            name: "bare",
            parameters: []
        };

        assert!(metadata.description.is_none());
        assert_eq!(metadata.description(), NO_DESCRIPTION);
    }

    fn read_path(args: &Value) -> Result<String, ToolFailure> {
        let path = required_string!(args, "path");
        let suffix = optional_string!(args, "suffix").unwrap_or("");
        Ok(format!("{}{}", path, suffix))
    }

    #[test]
    fn test_argument_macros() {
        assert_eq!(read_path(&json!({"path": "a"})).unwrap(), "a");
        assert_eq!(
            read_path(&json!({"path": "a", "suffix": ".txt"})).unwrap(),
            "a.txt"
        );
        assert!(read_path(&json!({"path": 7})).is_err());
    }
}
