use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fmt::Write as _;

/// Privacy-preserving identifier for the current agent account.
///
/// Hashes the OAuth access token from `~/.claude/.credentials.json` so
/// traces can be attributed per account without ever shipping the token.
/// Any failure along the way yields None; identity is advisory.
pub fn account_id() -> Option<String> {
    let path = dirs::home_dir()?.join(".claude").join(".credentials.json");
    let content = std::fs::read_to_string(path).ok()?;
    let credentials: Value = serde_json::from_str(&content).ok()?;
    let token = credentials
        .get("claudeAiOauth")?
        .get("accessToken")?
        .as_str()?;

    let digest = Sha256::digest(token.as_bytes());
    let mut hex = String::with_capacity(16);
    for byte in &digest[..8] {
        let _ = write!(hex, "{byte:02x}");
    }
    Some(hex)
}
