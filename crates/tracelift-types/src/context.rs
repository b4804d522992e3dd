use serde::{Deserialize, Serialize};

/// Context describing the orchestrator that launched the agent session.
///
/// All fields are optional; a standalone session has none of them. Non-null
/// values are merged into trace metadata, and `task_id` additionally groups
/// traces that belong to the same unit of work.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OrchestrationContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempt_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_purpose: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo_names: Option<String>,
}

impl OrchestrationContext {
    /// Set (name, value) pairs, in declaration order, for metadata merging
    pub fn fields(&self) -> Vec<(&'static str, &str)> {
        let named = [
            ("project_id", &self.project_id),
            ("project_name", &self.project_name),
            ("task_id", &self.task_id),
            ("attempt_id", &self.attempt_id),
            ("workspace_id", &self.workspace_id),
            ("workspace_branch", &self.workspace_branch),
            ("execution_purpose", &self.execution_purpose),
            ("repo_names", &self.repo_names),
        ];

        let mut fields = Vec::new();
        for (name, value) in named {
            if let Some(value) = value {
                fields.push((name, value.as_str()));
            }
        }
        fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields().is_empty()
    }
}
