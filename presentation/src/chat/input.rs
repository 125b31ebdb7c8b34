//! Classification of REPL input lines.

/// REPL-level command (`/...`), never seen by the bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaCommand {
    Nick(String),
    Channel(String),
    Config {
        key: Option<String>,
        value: Option<String>,
    },
    Help,
    Quit,
    Unknown(String),
}

/// One line of REPL input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplInput {
    Empty,
    Meta(MetaCommand),
    /// Chat message; `nick` is `None` when spoken as the current nick
    Chat { nick: Option<String>, text: String },
}

/// Classify a line typed at the prompt.
///
/// `bob: !here` speaks as `bob`; anything else speaks as the current nick.
pub fn parse_input(line: &str) -> ReplInput {
    let line = line.trim();
    if line.is_empty() {
        return ReplInput::Empty;
    }
    if let Some(meta) = line.strip_prefix('/') {
        return ReplInput::Meta(parse_meta(meta));
    }

    if let Some((who, text)) = line.split_once(':')
        && is_nick(who)
    {
        return ReplInput::Chat {
            nick: Some(who.to_string()),
            text: text.trim().to_string(),
        };
    }

    ReplInput::Chat {
        nick: None,
        text: line.to_string(),
    }
}

fn is_nick(s: &str) -> bool {
    !s.is_empty()
        && !s.starts_with('!')
        && s.chars()
            .all(|c| c.is_alphanumeric() || "-_[]\\^{}|`".contains(c))
}

fn parse_meta(meta: &str) -> MetaCommand {
    let mut words = meta.split_whitespace();
    let name = words.next().unwrap_or_default();
    let arg = words.next().map(str::to_string);

    match (name, arg) {
        ("quit" | "exit" | "q", _) => MetaCommand::Quit,
        ("help" | "h" | "?", _) => MetaCommand::Help,
        ("nick", Some(nick)) => MetaCommand::Nick(nick),
        ("channel" | "join", Some(channel)) => MetaCommand::Channel(channel),
        ("config", key) => {
            let rest: Vec<&str> = words.collect();
            let value = (!rest.is_empty()).then(|| rest.join(" "));
            MetaCommand::Config { key, value }
        }
        _ => MetaCommand::Unknown(format!("/{}", meta)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_as_current_nick() {
        assert_eq!(
            parse_input("!next"),
            ReplInput::Chat {
                nick: None,
                text: "!next".to_string()
            }
        );
    }

    #[test]
    fn test_chat_as_other_nick() {
        assert_eq!(
            parse_input("bob: !propose triage high urgent"),
            ReplInput::Chat {
                nick: Some("bob".to_string()),
                text: "!propose triage high urgent".to_string()
            }
        );
    }

    #[test]
    fn test_colon_in_message_is_not_a_nick() {
        assert_eq!(
            parse_input("!suggest see https://example.org"),
            ReplInput::Chat {
                nick: None,
                text: "!suggest see https://example.org".to_string()
            }
        );
    }

    #[test]
    fn test_meta_commands() {
        assert_eq!(parse_input("   "), ReplInput::Empty);
        assert_eq!(parse_input("/quit"), ReplInput::Meta(MetaCommand::Quit));
        assert_eq!(
            parse_input("/nick carol"),
            ReplInput::Meta(MetaCommand::Nick("carol".to_string()))
        );
        assert_eq!(
            parse_input("/channel #other"),
            ReplInput::Meta(MetaCommand::Channel("#other".to_string()))
        );
        assert_eq!(
            parse_input("/nick"),
            ReplInput::Meta(MetaCommand::Unknown("/nick".to_string()))
        );
    }

    #[test]
    fn test_config_meta_command() {
        assert_eq!(
            parse_input("/config"),
            ReplInput::Meta(MetaCommand::Config {
                key: None,
                value: None
            })
        );
        assert_eq!(
            parse_input("/config triage.quorum_count 3"),
            ReplInput::Meta(MetaCommand::Config {
                key: Some("triage.quorum_count".to_string()),
                value: Some("3".to_string())
            })
        );
    }
}
