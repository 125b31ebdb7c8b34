//! JSONL file writer for meeting minutes.
//!
//! Each channel gets its own append-only file under the minutes directory,
//! `<network>_<channel>.minutes.jsonl`. Every [`MinutesEntry`] becomes one
//! JSON line carrying a `timestamp`, the channel, the meetbot `kind`, the
//! `nick` responsible and the rendered meetbot `line`.

use serde::Serialize;
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;
use triage_application::ports::minutes_logger::{MinutesEntry, MinutesKind, MinutesLogger};
use triage_domain::ChannelKey;

#[derive(Serialize)]
struct MinutesRecord<'a> {
    timestamp: String,
    network: &'a str,
    channel: &'a str,
    kind: &'a str,
    nick: &'a str,
    line: String,
}

/// JSONL minutes logger that writes one JSON object per line.
///
/// Thread-safe via a `Mutex` around the open writers. Flushes after every
/// entry and on `Drop`. A channel's file is closed once its meeting ends.
pub struct JsonlMinutesLogger {
    dir: PathBuf,
    writers: Mutex<HashMap<ChannelKey, BufWriter<File>>>,
}

impl JsonlMinutesLogger {
    /// Create a logger writing under `dir`.
    ///
    /// Creates the directory if it doesn't exist. Returns `None` if it
    /// cannot be created.
    pub fn new(dir: impl AsRef<Path>) -> Option<Self> {
        let dir = dir.as_ref();
        if let Err(e) = std::fs::create_dir_all(dir) {
            warn!("Could not create minutes directory {}: {}", dir.display(), e);
            return None;
        }

        Some(Self {
            dir: dir.to_path_buf(),
            writers: Mutex::new(HashMap::new()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Minutes file for `channel`.
    pub fn path_for(&self, channel: &ChannelKey) -> PathBuf {
        self.dir.join(format!(
            "{}_{}.minutes.jsonl",
            sanitize(&channel.network),
            sanitize(&channel.channel)
        ))
    }

    fn open(&self, channel: &ChannelKey) -> Option<BufWriter<File>> {
        let path = self.path_for(channel);
        match OpenOptions::new().create(true).append(true).open(&path) {
            Ok(file) => Some(BufWriter::new(file)),
            Err(e) => {
                warn!("Could not open minutes file {}: {}", path.display(), e);
                None
            }
        }
    }
}

impl MinutesLogger for JsonlMinutesLogger {
    fn record(&self, channel: &ChannelKey, entry: MinutesEntry) {
        let record = MinutesRecord {
            timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            network: &channel.network,
            channel: &channel.channel,
            kind: entry.kind.as_str(),
            nick: entry.nick.as_str(),
            line: entry.line(),
        };
        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };

        let Ok(mut writers) = self.writers.lock() else {
            return;
        };
        if !writers.contains_key(channel) {
            let Some(writer) = self.open(channel) else {
                return;
            };
            writers.insert(channel.clone(), writer);
        }
        if let Some(writer) = writers.get_mut(channel)
            && let Err(e) = writeln!(writer, "{}", line).and_then(|_| writer.flush())
        {
            warn!("Could not write minutes for {}: {}", channel, e);
        }
        if entry.kind == MinutesKind::EndMeeting {
            writers.remove(channel);
        }
    }
}

impl Drop for JsonlMinutesLogger {
    fn drop(&mut self) {
        if let Ok(mut writers) = self.writers.lock() {
            for writer in writers.values_mut() {
                let _ = writer.flush();
            }
        }
    }
}

/// Keep file names portable: `#pulp-meeting` becomes `pulp-meeting`.
fn sanitize(name: &str) -> String {
    name.trim_start_matches('#')
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
