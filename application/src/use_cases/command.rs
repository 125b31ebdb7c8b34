//! Triage chat command parsing.
//!
//! Commands start with `!`. Proposal sub-commands may be written either as
//! `!propose triage high urgent` or `!propose.triage high urgent`.

use thiserror::Error;
use triage_domain::{IssueId, Nick, ProposalKind};

/// A parsed triage command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriageCommand {
    Start { text: Option<String> },
    End,
    Here,
    AddChair { target: Option<Nick> },
    Next,
    Skip,
    Defer,
    Accept,
    Issue(IssueId),
    Care(Vec<IssueId>),
    Suggest(String),
    Action(String),
    NeedHelp(String),
    Untriaged,
    Propose(ProposeCommand),
    Announce,
    Help,
}

/// Proposal sub-commands. Triage values are validated by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProposeCommand {
    Triage {
        priority: String,
        severity: String,
        target_release: Option<String>,
    },
    Accept,
    Defer,
    Skip,
    NeedInfo,
}

impl TriageCommand {
    /// Whether the command needs a running session in the channel.
    pub fn needs_session(&self) -> bool {
        !matches!(
            self,
            TriageCommand::Start { .. } | TriageCommand::Announce | TriageCommand::Help
        )
    }

    /// Whether only chairs may issue the command.
    pub fn chair_only(&self) -> bool {
        matches!(
            self,
            TriageCommand::End
                | TriageCommand::AddChair { .. }
                | TriageCommand::Next
                | TriageCommand::Skip
                | TriageCommand::Defer
                | TriageCommand::Accept
                | TriageCommand::Issue(_)
        )
    }

    /// Whether issuing the command implicitly joins the caller.
    pub fn joins_caller(&self) -> bool {
        self.needs_session() && !matches!(self, TriageCommand::End | TriageCommand::Here)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandParseError {
    #[error("Unknown command: {0}. Try !help")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("{0}")]
    InvalidIssue(String),
}

#[derive(Debug, Clone, Copy)]
pub struct CommandSpec {
    pub names: &'static [&'static str],
    pub usage: &'static str,
    pub description: &'static str,
}

const COMMAND_SPECS: &[CommandSpec] = &[
    CommandSpec {
        names: &["start"],
        usage: "!start [text]",
        description: "Start a triage session; you become the chair",
    },
    CommandSpec {
        names: &["end"],
        usage: "!end",
        description: "End the current triage session",
    },
    CommandSpec {
        names: &["here", "join"],
        usage: "!here",
        description: "Record that you are present for this triage session",
    },
    CommandSpec {
        names: &["addchair"],
        usage: "!addchair [nick]",
        description: "Make someone (or yourself) a chair",
    },
    CommandSpec {
        names: &["next"],
        usage: "!next",
        description: "Advance to the next issue if a quorum is present",
    },
    CommandSpec {
        names: &["skip"],
        usage: "!skip",
        description: "Skip the current issue with no resolution",
    },
    CommandSpec {
        names: &["defer"],
        usage: "!defer",
        description: "Defer the current issue until later in this session",
    },
    CommandSpec {
        names: &["accept"],
        usage: "!accept",
        description: "Accept the current proposal",
    },
    CommandSpec {
        names: &["issue"],
        usage: "!issue <id>",
        description: "Switch straight to a specific issue",
    },
    CommandSpec {
        names: &["care"],
        usage: "!care <id> [id...]",
        description: "Get pinged when these issues come up",
    },
    CommandSpec {
        names: &["suggest"],
        usage: "!suggest <text>",
        description: "Record an idea in the minutes",
    },
    CommandSpec {
        names: &["action"],
        usage: "!action <text>",
        description: "Record an action item in the minutes",
    },
    CommandSpec {
        names: &["needhelp"],
        usage: "!needhelp <text>",
        description: "Record a call for help in the minutes",
    },
    CommandSpec {
        names: &["untriaged"],
        usage: "!untriaged",
        description: "List issues not yet triaged this session",
    },
    CommandSpec {
        names: &["propose"],
        usage: "!propose <triage <priority> <severity> [release]|accept|defer|skip|needinfo>",
        description: "Propose a resolution for the current issue",
    },
    CommandSpec {
        names: &["announce"],
        usage: "!announce",
        description: "Post this channel's triage announcement",
    },
    CommandSpec {
        names: &["help"],
        usage: "!help",
        description: "List triage commands",
    },
];

pub fn command_specs() -> &'static [CommandSpec] {
    COMMAND_SPECS
}

fn usage_of(name: &str) -> &'static str {
    COMMAND_SPECS
        .iter()
        .find(|spec| spec.names.contains(&name))
        .map(|spec| spec.usage)
        .unwrap_or("!help")
}

/// Parse one line of chat input.
///
/// Returns `Ok(None)` when the line is not addressed to the bot.
pub fn parse_command(line: &str) -> Result<Option<TriageCommand>, CommandParseError> {
    let Some(body) = line.trim().strip_prefix('!') else {
        return Ok(None);
    };
    let (head, args) = match body.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (body, ""),
    };
    let head = head.to_lowercase();

    // `!propose.triage …` is the same as `!propose triage …`
    if let Some(sub) = head.strip_prefix("propose.") {
        return parse_propose(sub, args).map(|p| Some(TriageCommand::Propose(p)));
    }

    let command = match head.as_str() {
        "start" => TriageCommand::Start {
            text: non_empty(args),
        },
        "end" => TriageCommand::End,
        "here" | "join" => TriageCommand::Here,
        "addchair" => TriageCommand::AddChair {
            target: args.split_whitespace().next().map(Nick::new),
        },
        "next" => TriageCommand::Next,
        "skip" => TriageCommand::Skip,
        "defer" => TriageCommand::Defer,
        "accept" => TriageCommand::Accept,
        "issue" => {
            let raw = args
                .split_whitespace()
                .next()
                .ok_or(CommandParseError::Usage(usage_of("issue")))?;
            TriageCommand::Issue(raw.parse().map_err(CommandParseError::InvalidIssue)?)
        }
        "care" => {
            let ids = args
                .split(|c: char| c.is_whitespace() || c == ',')
                .filter(|s| !s.is_empty())
                .map(|s| s.parse::<IssueId>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(CommandParseError::InvalidIssue)?;
            if ids.is_empty() {
                return Err(CommandParseError::Usage(usage_of("care")));
            }
            TriageCommand::Care(ids)
        }
        "suggest" => TriageCommand::Suggest(required_text(args, "suggest")?),
        "action" => TriageCommand::Action(required_text(args, "action")?),
        "needhelp" => TriageCommand::NeedHelp(required_text(args, "needhelp")?),
        "untriaged" => TriageCommand::Untriaged,
        "propose" => {
            let (sub, rest) = match args.split_once(char::is_whitespace) {
                Some((sub, rest)) => (sub, rest.trim()),
                None => (args, ""),
            };
            TriageCommand::Propose(parse_propose(&sub.to_lowercase(), rest)?)
        }
        "announce" => TriageCommand::Announce,
        "help" => TriageCommand::Help,
        other => return Err(CommandParseError::Unknown(format!("!{}", other))),
    };
    Ok(Some(command))
}

fn parse_propose(sub: &str, args: &str) -> Result<ProposeCommand, CommandParseError> {
    let usage = CommandParseError::Usage(usage_of("propose"));
    let kind: ProposalKind = sub.parse().map_err(|_| usage.clone())?;
    Ok(match kind {
        ProposalKind::Triage => {
            let mut words = args.split_whitespace();
            let (Some(priority), Some(severity)) = (words.next(), words.next()) else {
                return Err(CommandParseError::Usage(
                    "!propose triage <priority> <severity> [release]",
                ));
            };
            let release = words.collect::<Vec<_>>().join(" ");
            ProposeCommand::Triage {
                priority: priority.to_string(),
                severity: severity.to_string(),
                target_release: non_empty(&release),
            }
        }
        ProposalKind::Accept => ProposeCommand::Accept,
        ProposalKind::Defer => ProposeCommand::Defer,
        ProposalKind::Skip => ProposeCommand::Skip,
        ProposalKind::NeedInfo => ProposeCommand::NeedInfo,
    })
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

fn required_text(args: &str, name: &str) -> Result<String, CommandParseError> {
    non_empty(args).ok_or(CommandParseError::Usage(usage_of(name)))
}
