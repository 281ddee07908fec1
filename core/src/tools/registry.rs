use crate::config::Config;
use crate::tools::{DiscoverSkillsTool, InstallSkillTool};
use crate::traits::{Tool, ToolResult, ToolSpec};
use std::sync::{Arc, Mutex, MutexGuard};

pub struct ToolRegistry {
    tools: Mutex<Vec<Arc<dyn Tool>>>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: Mutex::new(Vec::new()),
        }
    }

    fn tools(&self) -> MutexGuard<'_, Vec<Arc<dyn Tool>>> {
        self.tools.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn register(&self, tool: Box<dyn Tool>) {
        self.tools().push(Arc::from(tool));
    }

    pub fn get_specs(&self) -> Vec<ToolSpec> {
        self.tools().iter().map(|t| t.spec()).collect()
    }

    pub fn names(&self) -> Vec<String> {
        self.tools().iter().map(|t| t.name().to_string()).collect()
    }

    pub async fn execute(&self, name: &str, args: serde_json::Value) -> ToolResult {
        let tool = self.tools().iter().find(|t| t.name() == name).cloned();

        match tool {
            Some(tool) => match tool.execute(args).await {
                Ok(result) => result,
                Err(e) => ToolResult::error(format!("Execution failed: {}", e)),
            },
            None => ToolResult::error(format!("Tool '{}' not found", name)),
        }
    }
}

/// Registry with the discovery and installation tools wired to `config`.
pub fn default_registry(config: &Config) -> ToolRegistry {
    let registry = ToolRegistry::new();
    registry.register(Box::new(DiscoverSkillsTool::new(config.clone())));
    registry.register(Box::new(InstallSkillTool::new(config.install.clone())));
    registry
}
