//! Skill-install tool: writes a new skill file into the working folder's
//! skills directory so a later `skill` call can load it.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::tool_source::{ToolCallContent, ToolCallContext, ToolSourceError};
use crate::tools::Tool;

pub const TOOL_SKILL_INSTALL: &str = "skill-install";

const SKILLS_SUBDIR: &str = ".loom/skills";

pub struct SkillInstallTool {
    working_folder: Arc<std::path::PathBuf>,
}

impl SkillInstallTool {
    pub fn new(working_folder: Arc<std::path::PathBuf>) -> Self {
        Self { working_folder }
    }

    fn skills_dir(&self) -> std::path::PathBuf {
        self.working_folder.join(SKILLS_SUBDIR)
    }
}

#[async_trait]
impl Tool for SkillInstallTool {
    fn name(&self) -> &str {
        TOOL_SKILL_INSTALL
    }

    fn spec(&self) -> crate::tool_source::ToolSpec {
        crate::tool_source::ToolSpec {
            name: TOOL_SKILL_INSTALL.to_string(),
            description: Some(
                "Save a new skill under the skills directory so it can be loaded later by name."
                    .to_string(),
            ),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "name": { "type": "string", "description": "Skill name (no extension)." },
                    "content": { "type": "string", "description": "Skill markdown content." }
                },
                "required": ["name", "content"]
            }),
        }
    }

    async fn call(
        &self,
        args: serde_json::Value,
        _ctx: Option<&ToolCallContext>,
    ) -> Result<ToolCallContent, ToolSourceError> {
        let name = args
            .get("name")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ToolSourceError::InvalidInput("missing name".to_string()))?;
        let content = args
            .get("content")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ToolSourceError::InvalidInput("missing content".to_string()))?;

        let skills_dir = self.skills_dir();
        std::fs::create_dir_all(&skills_dir)
            .map_err(|e| ToolSourceError::Transport(format!("create skills dir: {e}")))?;

        let path = skills_dir.join(format!("{name}.md"));
        std::fs::write(&path, content)
            .map_err(|e| ToolSourceError::Transport(format!("write skill: {e}")))?;

        Ok(ToolCallContent::text(format!(
            "installed skill '{name}' at {}",
            path.display()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn call_writes_skill_file_under_skills_dir() {
        let dir = tempfile::tempdir().unwrap();
        let wf = Arc::new(dir.path().to_path_buf());
        let tool = SkillInstallTool::new(wf);

        tool.call(json!({"name": "greet", "content": "say hello"}), None)
            .await
            .unwrap();

        let written = std::fs::read_to_string(dir.path().join(".loom/skills/greet.md")).unwrap();
        assert_eq!(written, "say hello");
    }
}
