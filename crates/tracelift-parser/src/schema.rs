use serde::Deserialize;
use serde_json::Value;

/// One physical line of a Claude Code transcript JSONL file.
///
/// Only the record kinds the pipeline consumes are modeled; everything
/// else falls through to `Unknown` and is ignored, never an error.
#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "type")]
#[serde(rename_all = "snake_case")]
pub(crate) enum LogEntry {
    Summary(SummaryEntry),
    User(UserEntry),
    Assistant(AssistantEntry),
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize, Clone)]
pub(crate) struct SummaryEntry {
    #[serde(default)]
    pub cwd: Option<String>,
    #[serde(default)]
    pub git_branch: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub(crate) struct UserEntry {
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub message: UserMessage,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub(crate) struct UserMessage {
    #[serde(default, deserialize_with = "deserialize_user_content")]
    pub content: Vec<UserContent>,
}

/// User content is either a bare string or a list of blocks, and list
/// items may themselves be bare strings. Normalize everything to blocks.
fn deserialize_user_content<'de, D>(deserializer: D) -> Result<Vec<UserContent>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BlockOrText {
        Text(String),
        Block(UserContent),
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrArray {
        String(String),
        Array(Vec<BlockOrText>),
    }

    let normalized = match StringOrArray::deserialize(deserializer)? {
        StringOrArray::String(text) => vec![UserContent::Text { text }],
        StringOrArray::Array(items) => items
            .into_iter()
            .map(|item| match item {
                BlockOrText::Text(text) => UserContent::Text { text },
                BlockOrText::Block(block) => block,
            })
            .collect(),
    };
    Ok(normalized)
}

#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "type")]
#[serde(rename_all = "snake_case")]
pub(crate) enum UserContent {
    Text {
        text: String,
    },
    ToolResult {
        #[serde(default)]
        tool_use_id: Option<String>,
        #[serde(default)]
        content: Option<Value>,
    },
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize, Clone)]
pub(crate) struct AssistantEntry {
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub message: AssistantMessage,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub(crate) struct AssistantMessage {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub content: Vec<AssistantContent>,
    #[serde(default)]
    pub usage: TokenUsage,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "type")]
#[serde(rename_all = "snake_case")]
pub(crate) enum AssistantContent {
    Text {
        text: String,
    },
    /// Internal reasoning; must never surface in parser output
    Thinking,
    ToolUse {
        #[serde(default)]
        id: Option<String>,
        #[serde(default)]
        name: String,
        #[serde(default)]
        input: Value,
    },
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize, Clone, Copy, Default)]
pub(crate) struct TokenUsage {
    #[serde(default)]
    pub input_tokens: u64,
    #[serde(default)]
    pub output_tokens: u64,
    #[serde(default)]
    pub cache_read_input_tokens: u64,
    #[serde(default)]
    pub cache_creation_input_tokens: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_content_accepts_bare_string() {
        let line = r#"{"type":"user","timestamp":"2024-05-01T10:00:00Z","message":{"role":"user","content":"fix bug"}}"#;
        let entry: LogEntry = serde_json::from_str(line).unwrap();
        match entry {
            LogEntry::User(user) => {
                assert_eq!(user.message.content.len(), 1);
                match &user.message.content[0] {
                    UserContent::Text { text } => assert_eq!(text, "fix bug"),
                    other => panic!("expected text block, got {:?}", other),
                }
            }
            other => panic!("expected user entry, got {:?}", other),
        }
    }

    #[test]
    fn test_user_content_accepts_mixed_block_array() {
        let line = r#"{"type":"user","message":{"content":["plain",{"type":"tool_result","tool_use_id":"toolu_1","content":"ok"}]}}"#;
        let entry: LogEntry = serde_json::from_str(line).unwrap();
        match entry {
            LogEntry::User(user) => {
                assert_eq!(user.message.content.len(), 2);
                assert!(matches!(
                    user.message.content[0],
                    UserContent::Text { .. }
                ));
                assert!(matches!(
                    user.message.content[1],
                    UserContent::ToolResult { .. }
                ));
            }
            other => panic!("expected user entry, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_record_and_block_types_are_tolerated() {
        let entry: LogEntry =
            serde_json::from_str(r#"{"type":"file-history-snapshot","messageId":"x"}"#).unwrap();
        assert!(matches!(entry, LogEntry::Unknown));

        let line = r#"{"type":"assistant","message":{"content":[{"type":"server_tool_use","id":"x"}]}}"#;
        let entry: LogEntry = serde_json::from_str(line).unwrap();
        match entry {
            LogEntry::Assistant(asst) => {
                assert!(matches!(asst.message.content[0], AssistantContent::Unknown));
            }
            other => panic!("expected assistant entry, got {:?}", other),
        }
    }

    #[test]
    fn test_thinking_block_ignores_extra_fields() {
        let line = r#"{"type":"assistant","message":{"content":[{"type":"thinking","thinking":"hmm","signature":"sig"}]}}"#;
        let entry: LogEntry = serde_json::from_str(line).unwrap();
        match entry {
            LogEntry::Assistant(asst) => {
                assert!(matches!(
                    asst.message.content[0],
                    AssistantContent::Thinking
                ));
            }
            other => panic!("expected assistant entry, got {:?}", other),
        }
    }

    #[test]
    fn test_usage_defaults_to_zero() {
        let line = r#"{"type":"assistant","message":{"model":"claude-sonnet-4","content":[]}}"#;
        let entry: LogEntry = serde_json::from_str(line).unwrap();
        match entry {
            LogEntry::Assistant(asst) => {
                assert_eq!(asst.message.usage.input_tokens, 0);
                assert_eq!(asst.message.usage.output_tokens, 0);
            }
            other => panic!("expected assistant entry, got {:?}", other),
        }
    }
}
