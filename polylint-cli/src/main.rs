use clap::Parser;
use polylint_cli::config::ConfigError;
use polylint_cli::{Cli, execute, init_tracing};
use std::process::ExitCode;
use tracing::error;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut stdout = std::io::stdout().lock();
    match execute(&cli, &mut stdout) {
        Ok(status) => status.exit_code(),
        Err(e) => {
            error!("{:?}", e);
            let code = e.downcast_ref::<ConfigError>().map_or(1, ConfigError::exit_code);
            ExitCode::from(code)
        }
    }
}
