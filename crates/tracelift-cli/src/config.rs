use tracelift_types::OrchestrationContext;

pub const DEFAULT_HOST: &str = "https://cloud.langfuse.com";

/// All recognized configuration, resolved once from the environment at
/// startup and passed down. Nothing else in the pipeline reads env vars.
#[derive(Debug, Clone)]
pub struct Config {
    /// Master switch; unset or anything but "true" disables the pipeline
    pub enabled: bool,
    pub public_key: Option<String>,
    pub secret_key: Option<String>,
    pub host: String,
    /// Echo the fully parsed transcript structure to stderr
    pub debug: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            enabled: env_flag("TRACELIFT_ENABLED"),
            public_key: env_string("LANGFUSE_PUBLIC_KEY"),
            secret_key: env_string("LANGFUSE_SECRET_KEY"),
            host: env_string("LANGFUSE_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            debug: env_flag("TRACELIFT_DEBUG"),
        }
    }
}

/// Orchestrator context, set by a supervising task runner when the agent
/// executes inside a managed workspace. Absent vars stay None.
pub fn orchestration_context_from_env() -> OrchestrationContext {
    OrchestrationContext {
        project_id: env_string("ORCH_PROJECT_ID"),
        project_name: env_string("ORCH_PROJECT_NAME"),
        task_id: env_string("ORCH_TASK_ID"),
        attempt_id: env_string("ORCH_ATTEMPT_ID"),
        workspace_id: env_string("ORCH_WORKSPACE_ID"),
        workspace_branch: env_string("ORCH_WORKSPACE_BRANCH"),
        execution_purpose: env_string("ORCH_EXECUTION_PURPOSE"),
        repo_names: env_string("ORCH_REPO_NAMES"),
    }
}

fn env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|value| value.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}
