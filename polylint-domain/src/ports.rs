use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use polylint_types::Domain;
use std::cell::RefCell;
use std::process::Command;
use tracing::{debug, error, info, warn};

/// Result of a finished external tool invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandOutcome {
    pub success: bool,
    pub code: Option<i32>,
}

impl CommandOutcome {
    pub fn ok() -> Self {
        Self {
            success: true,
            code: Some(0),
        }
    }

    pub fn failed(code: i32) -> Self {
        Self {
            success: false,
            code: Some(code),
        }
    }
}

/// Process access for domain plugins.
///
/// `exists` is the only probe `detect` may perform; `run` is reserved for `DomainPlugin::run`.
pub trait CommandPort {
    /// Locate `program`: `<root>/node_modules/.bin` first, then `PATH`.
    fn exists(&self, program: &str, root: &Utf8Path) -> Option<Utf8PathBuf>;

    /// Run `program` to completion with inherited stdio.
    fn run(&self, program: &str, args: &[String], cwd: &Utf8Path)
    -> anyhow::Result<CommandOutcome>;
}

/// `CommandPort` backed by `std::process` and `which`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandPort;

impl CommandPort for SystemCommandPort {
    fn exists(&self, program: &str, root: &Utf8Path) -> Option<Utf8PathBuf> {
        let local = root.join("node_modules").join(".bin").join(program);
        if local.is_file() {
            return Some(local);
        }

        match which::which(program) {
            Ok(found) => Utf8PathBuf::from_path_buf(found).ok(),
            Err(e) => {
                debug!(program, "not on PATH: {e}");
                None
            }
        }
    }

    fn run(
        &self,
        program: &str,
        args: &[String],
        cwd: &Utf8Path,
    ) -> anyhow::Result<CommandOutcome> {
        let status = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .status()
            .with_context(|| format!("spawn {program}"))?;

        Ok(CommandOutcome {
            success: status.success(),
            code: status.code(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

/// User-visible reporting. The engine and plugins never write to stdout/stderr directly.
pub trait LogSink {
    fn log(&self, level: LogLevel, domain: Option<Domain>, message: &str);

    fn info(&self, domain: Option<Domain>, message: &str) {
        self.log(LogLevel::Info, domain, message);
    }

    fn warn(&self, domain: Option<Domain>, message: &str) {
        self.log(LogLevel::Warn, domain, message);
    }

    fn error(&self, domain: Option<Domain>, message: &str) {
        self.log(LogLevel::Error, domain, message);
    }
}

/// Forwards to `tracing` with a `domain` field.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogSink;

impl LogSink for TracingLogSink {
    fn log(&self, level: LogLevel, domain: Option<Domain>, message: &str) {
        let domain = domain.map(Domain::as_str).unwrap_or("-");
        match level {
            LogLevel::Info => info!(domain, "{message}"),
            LogLevel::Warn => warn!(domain, "{message}"),
            LogLevel::Error => error!(domain, "{message}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub level: LogLevel,
    pub domain: Option<Domain>,
    pub message: String,
}

/// In-memory sink that keeps every record, for tests and golden output.
#[derive(Debug, Default)]
pub struct RecordingLogSink {
    records: RefCell<Vec<LogRecord>>,
}

impl RecordingLogSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<LogRecord> {
        self.records.borrow().clone()
    }

    pub fn messages_at(&self, level: LogLevel) -> Vec<String> {
        self.records
            .borrow()
            .iter()
            .filter(|r| r.level == level)
            .map(|r| r.message.clone())
            .collect()
    }
}

impl LogSink for RecordingLogSink {
    fn log(&self, level: LogLevel, domain: Option<Domain>, message: &str) {
        self.records.borrow_mut().push(LogRecord {
            level,
            domain,
            message: message.to_string(),
        });
    }
}

/// Collapse a multi-line error into one log line (`a | b`).
pub fn flatten_detail(detail: &str) -> String {
    detail
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" | ")
        .trim()
        .to_string()
}
