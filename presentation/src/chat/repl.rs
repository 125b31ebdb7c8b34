//! REPL (Read-Eval-Print Loop) standing in for a chat channel

use super::input::{MetaCommand, ReplInput, parse_input};
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;
use triage_application::{CommandContext, ConfigStore, ConfigValue, TriageController};
use triage_domain::{ChannelKey, Nick};

/// Interactive channel REPL
pub struct ChannelRepl {
    controller: Arc<TriageController>,
    config: Arc<dyn ConfigStore>,
    network: String,
    channel: String,
    nick: String,
    history_path: Option<PathBuf>,
}

impl ChannelRepl {
    /// Create a new ChannelRepl
    pub fn new(
        controller: Arc<TriageController>,
        config: Arc<dyn ConfigStore>,
        network: impl Into<String>,
        channel: impl Into<String>,
        nick: impl Into<String>,
    ) -> Self {
        Self {
            controller,
            config,
            network: network.into(),
            channel: channel.into(),
            nick: nick.into(),
            history_path: dirs::data_dir().map(|p| p.join("triage-bot").join("history.txt")),
        }
    }

    /// Override where line history is kept (`None` disables it)
    pub fn with_history(mut self, path: Option<PathBuf>) -> Self {
        self.history_path = path;
        self
    }

    /// Run the interactive REPL
    pub async fn run(&mut self) -> RlResult<()> {
        let mut rl = DefaultEditor::new()?;

        if let Some(ref path) = self.history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        self.print_welcome();

        loop {
            let prompt = format!("{}@{}> ", self.nick, self.channel);
            match rl.readline(&prompt) {
                Ok(line) => {
                    let input = parse_input(&line);
                    if input != ReplInput::Empty {
                        let _ = rl.add_history_entry(line.trim());
                    }
                    match input {
                        ReplInput::Empty => continue,
                        ReplInput::Meta(command) => {
                            if self.handle_meta(command) {
                                break;
                            }
                        }
                        ReplInput::Chat { nick, text } => {
                            let nick = nick.unwrap_or_else(|| self.nick.clone());
                            self.send(&nick, &text).await;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Bye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        if let Some(ref path) = self.history_path {
            let _ = rl.save_history(path);
        }

        Ok(())
    }

    fn channel_key(&self) -> ChannelKey {
        ChannelKey::new(self.network.clone(), self.channel.clone())
    }

    async fn send(&self, nick: &str, text: &str) {
        let ctx = CommandContext::new(self.channel_key(), Nick::new(nick));
        // failures were already reported through the transport
        if let Err(e) = self.controller.handle_line(&ctx, text).await {
            debug!("Command failed: {}", e);
        }
    }

    fn print_welcome(&self) {
        println!();
        println!("{}", "triage-bot - channel console".cyan().bold());
        println!();
        println!("Speaking as {} in {}", self.nick.bold(), self.channel.bold());
        println!("Type !help for bot commands, /help for console commands.");
        println!();
    }

    fn print_help(&self) {
        println!();
        println!("Console commands:");
        println!("  /nick <name>              - Speak as another nick");
        println!("  /channel <name>           - Switch channel");
        println!("  /config [key [value]]     - Show or change settings");
        println!("  /help, /h, /?             - Show this help");
        println!("  /quit, /exit, /q          - Exit");
        println!();
        println!("Prefix a line with `nick:` to speak as that nick once.");
        println!();
    }

    /// Handle slash commands. Returns true if should exit.
    fn handle_meta(&mut self, command: MetaCommand) -> bool {
        match command {
            MetaCommand::Quit => {
                println!("Bye!");
                return true;
            }
            MetaCommand::Help => self.print_help(),
            MetaCommand::Nick(nick) => {
                self.nick = nick;
                println!("Now speaking as {}", self.nick.bold());
            }
            MetaCommand::Channel(channel) => {
                self.channel = channel;
                println!("Now in {}", self.channel.bold());
            }
            MetaCommand::Config { key, value } => self.handle_config(key, value),
            MetaCommand::Unknown(cmd) => {
                println!("Unknown command: {}", cmd);
                println!("Type /help for available commands");
            }
        }
        false
    }

    fn handle_config(&self, key: Option<String>, value: Option<String>) {
        let channel = self.channel_key();
        match (key, value) {
            (None, _) => {
                for key in self.config.config_keys() {
                    if let Ok(value) = self.config.config_get_for_channel(&channel, &key) {
                        println!("  {} = {}", key, value);
                    }
                }
            }
            (Some(key), None) => match self.config.config_get_for_channel(&channel, &key) {
                Ok(value) => println!("  {} = {}", key, value),
                Err(e) => eprintln!("{}", e.to_string().red()),
            },
            (Some(key), Some(raw)) => {
                let result = self.config.config_get(&key).and_then(|current| {
                    let value = ConfigValue::parse_like(&current, &raw).unwrap_or(ConfigValue::String(raw));
                    self.config.config_set(&key, value)
                });
                match result {
                    Ok(()) => println!("  {} updated", key),
                    Err(e) => eprintln!("{}", e.to_string().red()),
                }
            }
        }
    }
}
