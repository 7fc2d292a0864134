//! Line-based commands read from stdin.
//!
//! ```text
//! {"changedIdentifiers": ["006A"]}   publish a change event
//! key 001XY                          switch the parent record
//! error connection lost              simulate a transport error
//! quit
//! ```

use related_view_core::ParentKey;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Publish(serde_json::Value),
    SetParent(ParentKey),
    TransportError(String),
    Quit,
    Empty,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FeedError {
    #[error("invalid change event: {0}")]
    InvalidJson(String),
    #[error("`key` needs a parent id")]
    MissingKey,
    #[error("unknown command `{0}`")]
    Unknown(String),
}

pub fn parse_command(line: &str) -> Result<Command, FeedError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Command::Empty);
    }
    if line.starts_with('{') {
        return serde_json::from_str(line)
            .map(Command::Publish)
            .map_err(|err| FeedError::InvalidJson(err.to_string()));
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    match word {
        "quit" | "exit" => Ok(Command::Quit),
        "key" if rest.is_empty() => Err(FeedError::MissingKey),
        "key" => Ok(Command::SetParent(ParentKey::new(rest))),
        "error" => Ok(Command::TransportError(rest.to_string())),
        other => Err(FeedError::Unknown(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_lines_are_published() {
        let command = parse_command(r#"  {"changedIdentifiers": ["R1"]} "#).unwrap();
        assert_eq!(
            command,
            Command::Publish(serde_json::json!({ "changedIdentifiers": ["R1"] }))
        );
        assert!(matches!(
            parse_command("{broken"),
            Err(FeedError::InvalidJson(_))
        ));
    }

    #[test]
    fn words_map_to_commands() {
        assert_eq!(
            parse_command("key 001XY").unwrap(),
            Command::SetParent(ParentKey::from("001XY"))
        );
        assert_eq!(parse_command("key"), Err(FeedError::MissingKey));
        assert_eq!(parse_command("quit").unwrap(), Command::Quit);
        assert_eq!(parse_command("   ").unwrap(), Command::Empty);
        assert_eq!(
            parse_command("error socket closed").unwrap(),
            Command::TransportError("socket closed".to_string())
        );
        assert_eq!(
            parse_command("refresh"),
            Err(FeedError::Unknown("refresh".to_string()))
        );
    }
}
