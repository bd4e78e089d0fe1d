//! System prompts

use crate::config::PromptKind;

/// Tool-using agent that answers with an `action` block.
pub const FUNCTION_CALLER: &str = r#"You are an AI agent that can perform tasks by using the available tools. Check whether any of the tools can be used for the user's request.

If a user asks about files, ask them for the directory path and list the files before reading any of them.
Ask the user for any missing argument values before calling a tool.

Every response MUST have an action.
Respond in this format:

```action
{
    "tool_name": "insert tool_name",
    "args": {...fill in any required arguments here...}
}
```
"#;

/// Simulation of a code-enhancement agent for trying out agent designs.
pub const AGENT_PROTOTYPING: &str = r#"I'd like to simulate an AI agent that I'm designing. The agent will be built using these components:

Goals:
* Find potential code enhancements
* Ensure changes are small and self-contained
* Get user approval before making changes
* Maintain existing interfaces

Actions available:
* list_project_files(project_directory_path: str) -> list[str]: Return list of all files in the project directory
* read_project_file(filename: str) -> str: Return file content for the given file, as returned from list_project_files
* ask_user_approval(proposal: str) -> bool: Return true or false for approval status
* edit_project_file(filename: str, changes: str) -> bool: Write the given changes inside the given file (full path), return the write status

At each step, your output must have an action block with the action to take to complete the given task.

Every response MUST have an action.
Respond in this format:

```action
{
    "tool_name": "insert tool_name",
    "args": {...fill in any required arguments here...}
}
```

Stop and wait and I will type in the result of the action as my next message.

Tell me the first task to perform.
"#;

pub fn system_prompt(kind: PromptKind) -> &'static str {
    match kind {
        PromptKind::FunctionCaller => FUNCTION_CALLER,
        PromptKind::Prototyping => AGENT_PROTOTYPING,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::interpreter::parse_action_segment;

    #[test]
    fn test_prompt_example_is_a_fenced_action() {
        // The template itself is not valid JSON, but it must be recognised as a block
        for prompt in [FUNCTION_CALLER, AGENT_PROTOTYPING] {
            assert!(parse_action_segment(prompt).is_err());
        }
    }

    #[test]
    fn test_prompt_selection() {
        assert_eq!(system_prompt(PromptKind::FunctionCaller), FUNCTION_CALLER);
        assert_eq!(system_prompt(PromptKind::Prototyping), AGENT_PROTOTYPING);
    }
}
