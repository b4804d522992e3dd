use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracelift_types::ActivityKind;

// Exact tool-name sets, checked before any command inspection
const CODE_TOOLS: &[&str] = &["Edit", "Write", "NotebookEdit"];
const PLAN_TOOLS: &[&str] = &["TodoWrite", "EnterPlanMode", "ExitPlanMode"];
const COMMUNICATE_TOOLS: &[&str] = &["AskUserQuestion"];
const RESEARCH_TOOLS: &[&str] = &["WebSearch", "WebFetch"];
const EXPLORE_TOOLS: &[&str] = &[
    "Read",
    "Glob",
    "Grep",
    "LSP",
    "LS",
    "Task",
    "ListMcpResourcesTool",
    "ReadMcpResourceTool",
];

static GIT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"\bgit\s+(status|diff|log|show|branch|checkout|merge|rebase|pull|fetch|clone|add|commit|push|stash|reset|cherry-pick)",
        // GitHub CLI
        r"\bgh\s+",
    ])
});

static TEST_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        // Rust - nextest variations
        r"\bcargo\s+nextest\b",
        r"\bcargo-nextest\b",
        r"\bnextest\s+(run|list)\b",
        r"\bcargo\s+test\b",
        // JavaScript/TypeScript - explicit test commands
        r"\b(pnpm|npm|yarn|bun)\s+(run\s+)?test\b",
        r"\b(pnpm|npm|yarn|bun)\s+exec\s+(jest|vitest|mocha)\b",
        r"\bnpx\s+(jest|vitest|mocha|ava|playwright)\b",
        r"^\s*jest\s",
        r"&&\s*jest\s",
        r"\bjest\s+--",
        r"\bvitest(\s|$)",
        r"\bmocha\s",
        r"\bava\s",
        r"\bplaywright\s+test\b",
        r"\bcypress\s+(run|open)\b",
        // Python
        r"\bpytest\b",
        r"\bpython\s+-m\s+(pytest|unittest)\b",
        r"\buvx\s+pytest\b",
        // Go
        r"\bgo\s+test\b",
    ])
});

static BUILD_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        // Rust
        r"\bcargo\s+(build|check|clippy|fmt|bench|doc)\b",
        r"\brustfmt\b",
        // JavaScript/TypeScript
        r"\b(pnpm|npm|yarn|bun)\s+(run\s+)?(build|check|lint|typecheck|format|prettier|eslint)\b",
        r"\b(pnpm|npm|yarn|bun)\s+(build|check|lint)\b",
        r"\bnpx\s+(tsc|eslint|prettier|biome)\b",
        r"\btsc(\s|$)",
        r"\beslint\s",
        r"\bprettier\s",
        r"\bbiome\s+(check|lint|format)\b",
        // Python
        r"\bpython\s+-m\s+(mypy|ruff|black|flake8|isort)\b",
        r"\bmypy\s",
        r"\bruff\s+(check|format)\b",
        r"\bblack\s",
        r"\bflake8\s",
        r"\buvx\s+(mypy|ruff|black|flake8)\b",
        r"\bisort\s",
        // Go
        r"\bgo\s+(build|vet|fmt|generate)\b",
        r"\bgolangci-lint\b",
        // Make - at start, after &&, or with common targets
        r"^\s*make(\s|$)",
        r"&&\s*make(\s|$)",
        r"\bmake\s+(build|test|check|lint|all|clean)\b",
        r"\bdocker\s+(build|compose)\b",
    ])
});

static SETUP_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"\b(pnpm|npm|yarn|bun)\s+(install|add|remove|update|upgrade|ci)\b",
        r"\b(pip|uv)\s+install\b",
        // uvx running any tool (generic, after the specific uvx patterns above)
        r"\buvx\s+\S+",
        r"\bcargo\s+(add|remove|update)\b",
        r"\bgo\s+(get|mod\s+(download|tidy))\b",
        r"\bdocker\s+(pull|run|start|stop|rm|exec)\b",
        // Filesystem setup, only at start of a command or subcommand
        r"^\s*(chmod|mkdir|cp|mv)\s",
        r"&&\s*(chmod|mkdir|cp|mv)\s",
    ])
});

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|pattern| {
            Regex::new(&format!("(?i){pattern}")).expect("classifier pattern must compile")
        })
        .collect()
}

fn any_match(patterns: &[Regex], command: &str) -> bool {
    patterns.iter().any(|pattern| pattern.is_match(command))
}

/// Classify a tool call into an activity kind.
///
/// Pure and total: every (name, input) pair resolves to exactly one kind,
/// unknown tools and unmatched shell commands fall back to `Other`.
///
/// For `Bash`, the command string is checked against pattern groups in
/// GIT -> TEST -> BUILD -> SETUP order. The ordering carries meaning:
/// `pnpm test` must hit the TEST group before the package-manager rules
/// in SETUP get a chance to claim it, and `uvx pytest` must stay TEST
/// despite the generic `uvx` rule in SETUP.
pub fn classify_activity(tool_name: &str, tool_input: &Value) -> ActivityKind {
    if CODE_TOOLS.contains(&tool_name) {
        return ActivityKind::Code;
    }
    if PLAN_TOOLS.contains(&tool_name) {
        return ActivityKind::Plan;
    }
    if COMMUNICATE_TOOLS.contains(&tool_name) {
        return ActivityKind::Communicate;
    }
    if RESEARCH_TOOLS.contains(&tool_name) {
        return ActivityKind::Research;
    }
    if EXPLORE_TOOLS.contains(&tool_name) {
        return ActivityKind::Explore;
    }

    if tool_name == "Bash" {
        let command = tool_input
            .get("command")
            .and_then(Value::as_str)
            .unwrap_or("");

        if any_match(&GIT_PATTERNS, command) {
            return ActivityKind::Git;
        }
        if any_match(&TEST_PATTERNS, command) {
            return ActivityKind::Test;
        }
        if any_match(&BUILD_PATTERNS, command) {
            return ActivityKind::Build;
        }
        if any_match(&SETUP_PATTERNS, command) {
            return ActivityKind::Setup;
        }
    }

    ActivityKind::Other
}
