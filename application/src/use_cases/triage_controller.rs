//! Triage Controller
//!
//! Turns chat commands into session transitions. For each command it loads
//! the channel's settings, looks up (or for `start`, creates) the channel's
//! session, calls the tracker where needed, applies the transition and
//! reports through the chat transport and the minutes.
//!
//! Tracker fetches always happen before the session is mutated, so a failed
//! fetch leaves the session exactly as it was.

use crate::config::TriageSettings;
use crate::ports::chat_transport::{ChatTransport, ReplyOptions};
use crate::ports::config_store::ConfigStore;
use crate::ports::issue_tracker::{IssueTracker, TrackerError};
use crate::ports::minutes_logger::{MinutesEntry, MinutesKind, MinutesLogger, NoMinutesLogger};
use crate::use_cases::command::{
    CommandParseError, ProposeCommand, TriageCommand, command_specs, parse_command,
};
use crate::use_cases::session_registry::SessionRegistry;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};
use triage_domain::{
    AcceptTransition, AdvanceOutcome, ChannelKey, IssueId, JoinOutcome, Nick, Proposal,
    Resolution, TriageError, TriageSession,
};

/// Who issued a command, and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandContext {
    pub channel: ChannelKey,
    pub nick: Nick,
}

impl CommandContext {
    pub fn new(channel: ChannelKey, nick: Nick) -> Self {
        Self { channel, nick }
    }
}

/// Errors that can occur while handling a command.
///
/// All of them are reported to the caller in the channel; none are fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ControllerError {
    #[error(transparent)]
    Triage(#[from] TriageError),

    #[error(transparent)]
    Tracker(#[from] TrackerError),

    #[error(transparent)]
    Parse(#[from] CommandParseError),

    #[error("No triage session is running in {0}. Use !start to begin.")]
    NoActiveSession(String),
}

#[derive(Debug, Clone, Copy)]
enum Step {
    Advance,
    Defer,
}

/// Triage controller handling chat commands for every channel.
pub struct TriageController {
    registry: Arc<SessionRegistry>,
    tracker: Arc<dyn IssueTracker>,
    transport: Arc<dyn ChatTransport>,
    config: Arc<dyn ConfigStore>,
    minutes: Arc<dyn MinutesLogger>,
}

impl TriageController {
    pub fn new(
        tracker: Arc<dyn IssueTracker>,
        transport: Arc<dyn ChatTransport>,
        config: Arc<dyn ConfigStore>,
    ) -> Self {
        Self {
            registry: Arc::new(SessionRegistry::new()),
            tracker,
            transport,
            config,
            minutes: Arc::new(NoMinutesLogger),
        }
    }

    /// Create with a minutes logger.
    pub fn with_minutes_logger(mut self, logger: Arc<dyn MinutesLogger>) -> Self {
        self.minutes = logger;
        self
    }

    /// Share an existing registry (e.g. one swept by a background task).
    pub fn with_registry(mut self, registry: Arc<SessionRegistry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    /// Handle one line of chat input. Lines that are not commands are
    /// ignored. Failures are reported to the caller and also returned.
    pub async fn handle_line(&self, ctx: &CommandContext, line: &str) -> Result<(), ControllerError> {
        let result = match parse_command(line) {
            Ok(None) => return Ok(()),
            Ok(Some(command)) => self.execute(ctx, command).await,
            Err(e) => Err(e.into()),
        };

        if let Err(ref e) = result {
            debug!("Command '{}' from {} in {} failed: {}", line.trim(), ctx.nick, ctx.channel, e);
            self.transport.error(&ctx.channel, &ctx.nick, &e.to_string());
        }
        result
    }

    /// Execute a parsed command.
    pub async fn execute(
        &self,
        ctx: &CommandContext,
        command: TriageCommand,
    ) -> Result<(), ControllerError> {
        let settings = TriageSettings::load(self.config.as_ref(), &ctx.channel);

        match command {
            TriageCommand::Start { text } => return self.start(ctx, &settings, text).await,
            TriageCommand::Announce => {
                self.announce(ctx, &settings);
                return Ok(());
            }
            TriageCommand::Help => {
                self.help(ctx);
                return Ok(());
            }
            _ => {}
        }

        let no_session = || ControllerError::NoActiveSession(ctx.channel.channel.clone());
        let shared = self.registry.get(&ctx.channel).await.ok_or_else(no_session)?;
        let mut session = shared.lock().await;
        // ended while this command was waiting for the lock
        if !session.is_active() {
            return Err(no_session());
        }

        if command.chair_only() {
            session.ensure_chair(&ctx.nick)?;
        }
        if command.joins_caller() {
            self.join(ctx, &mut session, false);
        }

        match command {
            TriageCommand::End => {
                self.record(ctx, MinutesKind::EndMeeting, "");
                session.end();
                // still locked, so a queued `start` sees the entry gone
                self.registry.release(&ctx.channel, &shared).await;
                drop(session);
                info!("Triage ended in {} by {}", ctx.channel, ctx.nick);
                self.say(ctx, "Triage session ended.");
                Ok(())
            }
            TriageCommand::Here => {
                self.join(ctx, &mut session, true);
                Ok(())
            }
            TriageCommand::AddChair { target } => {
                let chair = session.add_chair(&ctx.nick, target)?;
                self.record(ctx, MinutesKind::NewChair, chair.as_str());
                self.reply(ctx, &format!("{} is now a triage chair.", chair));
                Ok(())
            }
            TriageCommand::Next | TriageCommand::Skip => {
                self.step(ctx, &settings, &mut session, Step::Advance).await
            }
            TriageCommand::Defer => self.step(ctx, &settings, &mut session, Step::Defer).await,
            TriageCommand::Accept => self.accept(ctx, &settings, &mut session).await,
            TriageCommand::Issue(issue) => {
                session.check_select(issue)?;
                let lines = self.fetch_detail(issue).await?;
                session.select_issue(issue)?;
                info!("Switched to issue {} in {}", issue, ctx.channel);
                self.post_issue(ctx, &settings, &session, issue, lines);
                Ok(())
            }
            TriageCommand::Care(ids) => {
                let accepted = session.express_care(&ctx.nick, &ids);
                if !accepted.is_empty() {
                    self.transport.reply(
                        &ctx.channel,
                        &ctx.nick,
                        &format!(
                            "You will be pinged when these issues come up: {}",
                            join_ids(&accepted)
                        ),
                        ReplyOptions::PRIVATE,
                    );
                }
                Ok(())
            }
            TriageCommand::Suggest(text) => {
                self.record(ctx, MinutesKind::Idea, text);
                Ok(())
            }
            TriageCommand::Action(text) => {
                self.record(ctx, MinutesKind::Action, text);
                Ok(())
            }
            TriageCommand::NeedHelp(text) => {
                self.record(ctx, MinutesKind::Help, text);
                Ok(())
            }
            TriageCommand::Untriaged => {
                let issues = self.tracker.report_issues(settings.report_id).await?;
                let untriaged = session.untriaged(&issues);
                if untriaged.is_empty() {
                    self.reply(ctx, "No untriaged issues remain.");
                } else {
                    self.reply(
                        ctx,
                        &format!(
                            "{} Untriaged issues: {}",
                            untriaged.len(),
                            join_ids(&untriaged)
                        ),
                    );
                }
                Ok(())
            }
            TriageCommand::Propose(command) => {
                let proposal = build_proposal(command)?;
                let recorded = session.propose(proposal);
                let message = format!("Proposed - {}", recorded.description);
                self.reply(ctx, &message);
                Ok(())
            }
            // handled before the session lookup
            TriageCommand::Start { .. } | TriageCommand::Announce | TriageCommand::Help => Ok(()),
        }
    }

    async fn start(
        &self,
        ctx: &CommandContext,
        settings: &TriageSettings,
        text: Option<String>,
    ) -> Result<(), ControllerError> {
        let mut session = loop {
            let shared = self.registry.get_or_create(&ctx.channel).await;
            let guard = Arc::clone(&shared).lock_owned().await;
            // ended and released while this command was waiting for the lock
            if self.registry.is_current(&ctx.channel, &shared).await {
                break guard;
            }
        };
        session.start(ctx.nick.clone());
        info!("Triage started in {} by {}", ctx.channel, ctx.nick);

        let mut title = format!(
            "{} {}",
            settings.meeting_title,
            chrono::Local::now().format("%Y-%m-%d")
        );
        if let Some(text) = text {
            title.push(' ');
            title.push_str(&text);
        }
        self.record(ctx, MinutesKind::StartMeeting, title.clone());
        self.say(ctx, &format!("Meeting started: {}", title));

        let queue = self.tracker.report_issues(settings.report_id).await?;
        debug!("{} issues in report {}", queue.len(), settings.report_id);
        session.refresh_queue(queue);
        Ok(())
    }

    fn join(&self, ctx: &CommandContext, session: &mut TriageSession, explicit: bool) {
        match session.join(ctx.nick.clone()) {
            JoinOutcome::Joined => {
                let message = format!("{} has joined triage", ctx.nick);
                self.record(ctx, MinutesKind::Info, message.clone());
                self.say(ctx, &message);
            }
            JoinOutcome::AlreadyJoined if explicit => {
                self.transport.reply(
                    &ctx.channel,
                    &ctx.nick,
                    "You have already joined this triage session.",
                    ReplyOptions::PRIVATE,
                );
            }
            JoinOutcome::AlreadyJoined => {}
        }
    }

    async fn step(
        &self,
        ctx: &CommandContext,
        settings: &TriageSettings,
        session: &mut TriageSession,
        step: Step,
    ) -> Result<(), ControllerError> {
        session.ensure_quorum(settings.quorum)?;
        let queue = self.tracker.report_issues(settings.report_id).await?;

        let outcome = match step {
            Step::Advance => session.advance(settings.quorum, queue)?,
            Step::Defer => session.defer(settings.quorum, queue)?,
        };
        self.announce_outcome(ctx, settings, session, outcome).await
    }

    async fn accept(
        &self,
        ctx: &CommandContext,
        settings: &TriageSettings,
        session: &mut TriageSession,
    ) -> Result<(), ControllerError> {
        let resolution = session.check_accept(settings.quorum)?;
        let queue = match resolution {
            Resolution::Record => None,
            Resolution::Advance | Resolution::Defer => {
                Some(self.tracker.report_issues(settings.report_id).await?)
            }
        };

        let outcome = session.accept(settings.quorum, queue)?;
        let description = outcome.proposal.description;
        self.reply(ctx, &format!("Current proposal accepted: {}", description));
        self.record(ctx, MinutesKind::Agreed, description);

        match outcome.transition {
            AcceptTransition::Advanced(advance) | AcceptTransition::Deferred(advance) => {
                self.announce_outcome(ctx, settings, session, advance).await
            }
            AcceptTransition::Recorded => Ok(()),
        }
    }

    async fn announce_outcome(
        &self,
        ctx: &CommandContext,
        settings: &TriageSettings,
        session: &TriageSession,
        outcome: AdvanceOutcome,
    ) -> Result<(), ControllerError> {
        match outcome {
            AdvanceOutcome::Advanced { issue, remaining } => {
                info!("Now triaging issue {} in {}", issue, ctx.channel);
                self.reply(ctx, &format!("{} issues left to triage.", remaining));
                self.announce_issue(ctx, settings, session, issue).await
            }
            AdvanceOutcome::QueueExhausted => {
                self.reply(ctx, "No issues left to triage.");
                Ok(())
            }
        }
    }

    /// Fetch and post an issue the queue already moved to.
    ///
    /// The issue stays selected even if the detail fetch fails.
    async fn announce_issue(
        &self,
        ctx: &CommandContext,
        settings: &TriageSettings,
        session: &TriageSession,
        issue: IssueId,
    ) -> Result<(), ControllerError> {
        let lines = self.fetch_detail(issue).await?;
        self.post_issue(ctx, settings, session, issue, lines);
        Ok(())
    }

    async fn fetch_detail(&self, issue: IssueId) -> Result<Vec<String>, TrackerError> {
        self.tracker.issue_detail(issue).await.inspect_err(|e| {
            warn!("Could not fetch detail for issue {}: {}", issue, e);
        })
    }

    /// Post issue detail, ping carers and optionally set the topic.
    fn post_issue(
        &self,
        ctx: &CommandContext,
        settings: &TriageSettings,
        session: &TriageSession,
        issue: IssueId,
        lines: Vec<String>,
    ) {
        for line in &lines {
            self.say(ctx, line);
        }

        let carers = session.carers(issue);
        if !carers.is_empty() {
            let nicks: Vec<&str> = carers.iter().map(|n| n.as_str()).collect();
            self.say(
                ctx,
                &format!(
                    "{}: Issue {} is currently being discussed.",
                    nicks.join(", "),
                    issue
                ),
            );
        }

        if settings.set_topic
            && let Some(topic) = lines.get(1)
        {
            self.record(ctx, MinutesKind::Topic, topic.clone());
            self.transport.set_topic(&ctx.channel, topic);
        }
    }

    fn announce(&self, ctx: &CommandContext, settings: &TriageSettings) {
        if settings.announce && !settings.announce_text.trim().is_empty() {
            self.say(ctx, &settings.announce_text);
        } else {
            self.reply(ctx, "Triage announcements are not configured for this channel.");
        }
    }

    fn help(&self, ctx: &CommandContext) {
        for spec in command_specs() {
            self.transport.reply(
                &ctx.channel,
                &ctx.nick,
                &format!("{} - {}", spec.usage, spec.description),
                ReplyOptions::PRIVATE,
            );
        }
    }

    // ==================== Output helpers ====================

    fn reply(&self, ctx: &CommandContext, text: &str) {
        self.transport
            .reply(&ctx.channel, &ctx.nick, text, ReplyOptions::PUBLIC);
    }

    fn say(&self, ctx: &CommandContext, text: &str) {
        self.transport
            .reply(&ctx.channel, &ctx.nick, text, ReplyOptions::BARE);
    }

    fn record(&self, ctx: &CommandContext, kind: MinutesKind, text: impl Into<String>) {
        self.minutes
            .record(&ctx.channel, MinutesEntry::new(kind, ctx.nick.clone(), text));
    }
}

fn build_proposal(command: ProposeCommand) -> Result<Proposal, TriageError> {
    Ok(match command {
        ProposeCommand::Triage {
            priority,
            severity,
            target_release,
        } => Proposal::triage(
            priority.parse()?,
            severity.parse()?,
            target_release.as_deref(),
        ),
        ProposeCommand::Accept => Proposal::accept(),
        ProposeCommand::Defer => Proposal::defer(),
        ProposeCommand::Skip => Proposal::skip(),
        ProposeCommand::NeedInfo => Proposal::need_info(),
    })
}

fn join_ids(ids: &[IssueId]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
