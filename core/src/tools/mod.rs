use serde_json::Value;

pub mod discover_skills;
pub mod install_skill;
pub mod registry;

pub use discover_skills::{DiscoverSkillsTool, render_report};
pub use install_skill::{CommandOutput, CommandRunner, InstallPlan, InstallSkillTool, SystemRunner};
pub use registry::{ToolRegistry, default_registry};

pub fn extract_string_arg(args: &Value, key: &str) -> anyhow::Result<String> {
    args.get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| anyhow::anyhow!("Missing '{}' parameter", key))
        .map(|s| s.to_string())
}

/// Accepts either a single string or an array of strings.
pub fn extract_string_list_arg(args: &Value, key: &str) -> anyhow::Result<Vec<String>> {
    match args.get(key) {
        Some(Value::String(s)) => Ok(vec![s.clone()]),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| anyhow::anyhow!("'{}' must contain only strings", key))
            })
            .collect(),
        Some(_) => Err(anyhow::anyhow!("'{}' must be a string or an array of strings", key)),
        None => Err(anyhow::anyhow!("Missing '{}' parameter", key)),
    }
}

pub fn extract_string_list_arg_opt(args: &Value, key: &str) -> anyhow::Result<Vec<String>> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(_) => extract_string_list_arg(args, key),
    }
}

pub fn extract_bool_arg_opt(args: &Value, key: &str, default: bool) -> bool {
    args.get(key).and_then(|v| v.as_bool()).unwrap_or(default)
}
