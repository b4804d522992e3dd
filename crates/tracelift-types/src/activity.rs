use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Agent activity classification by semantic purpose
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityKind {
    /// Direct code modification (Edit, Write, NotebookEdit)
    Code,
    /// Compile, lint, typecheck, format commands
    Build,
    /// Test execution commands
    Test,
    /// Version control operations
    Git,
    /// Read/search in the codebase
    Explore,
    /// Web search and external documentation
    Research,
    /// Dependency installation and environment setup
    Setup,
    /// Planning and task management
    Plan,
    /// Direct user interaction
    Communicate,
    /// Unclassified commands and unknown tools
    Other,
}

impl ActivityKind {
    /// Every known kind, in display order
    pub const ALL: [ActivityKind; 10] = [
        ActivityKind::Code,
        ActivityKind::Build,
        ActivityKind::Test,
        ActivityKind::Git,
        ActivityKind::Explore,
        ActivityKind::Research,
        ActivityKind::Setup,
        ActivityKind::Plan,
        ActivityKind::Communicate,
        ActivityKind::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::Code => "CODE",
            ActivityKind::Build => "BUILD",
            ActivityKind::Test => "TEST",
            ActivityKind::Git => "GIT",
            ActivityKind::Explore => "EXPLORE",
            ActivityKind::Research => "RESEARCH",
            ActivityKind::Setup => "SETUP",
            ActivityKind::Plan => "PLAN",
            ActivityKind::Communicate => "COMMUNICATE",
            ActivityKind::Other => "OTHER",
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cumulative occurrence count per activity kind.
///
/// The map always carries an entry for every known kind so downstream
/// consumers never have to distinguish "zero" from "missing".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityCounts {
    counts: BTreeMap<ActivityKind, u64>,
}

impl ActivityCounts {
    pub fn new() -> Self {
        let counts = ActivityKind::ALL.iter().map(|kind| (*kind, 0)).collect();
        Self { counts }
    }

    pub fn record(&mut self, kind: ActivityKind) {
        *self.counts.entry(kind).or_insert(0) += 1;
    }

    pub fn get(&self, kind: ActivityKind) -> u64 {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    /// Sum across all kinds; equals the total tool-call count of the session
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ActivityKind, u64)> + '_ {
        self.counts.iter().map(|(kind, count)| (*kind, *count))
    }
}

impl Default for ActivityCounts {
    fn default() -> Self {
        Self::new()
    }
}
