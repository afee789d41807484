//! Domain logic: turn CLI intent + environment probing into one decision per domain, then run them.
//!
//! This crate owns *whether* and *in what order* each domain runs. It does not own argument
//! parsing or config files; that's the `polylint` CLI crate.

mod context;
mod engine;
mod plugin;
mod plugins;
mod ports;
mod registry;
mod selection;

pub use context::ExecutionContext;
pub use engine::{evaluate_domains, plan_action, run_decisions, run_domains};
pub use plugin::{DomainPlugin, DomainRunResult};
pub use plugins::{
    BuiltinSettings, ConfigFormatPlugin, ProseFormatPlugin, ShellLintPlugin, SourceLintPlugin,
    builtin_plugins, builtin_registry,
};
pub use ports::{
    CommandOutcome, CommandPort, LogLevel, LogRecord, LogSink, RecordingLogSink,
    SystemCommandPort, TracingLogSink, flatten_detail,
};
pub use registry::{DomainRegistry, RegistryError};
pub use selection::{DomainSelection, SelectionRequest, resolve_domain_selection};
