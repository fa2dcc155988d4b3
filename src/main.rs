use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser};
use tokio_util::sync::CancellationToken;

use authentication_service::config::TelemetryConfig;
use authentication_service::server::{self, StartupConfig};
use authentication_service::shutdown::shutdown_signal;
use authentication_service::telemetry::init_telemetry;

#[derive(Debug, Parser)]
#[command(name = "authentication-service", version, about)]
struct Cli {
    /// Load a local .env file before reading DATABASE_* settings
    #[arg(
        long,
        env = "AUTH_LOCAL",
        default_value_t = true,
        num_args = 0..=1,
        default_missing_value = "true",
        require_equals = true,
        action = ArgAction::Set
    )]
    local: bool,

    /// Env file to load instead of .env
    #[arg(long, value_name = "PATH")]
    env_file: Option<PathBuf>,

    /// Connect, ping and disconnect, then exit
    #[arg(long)]
    check: bool,
}

impl From<Cli> for StartupConfig {
    fn from(cli: Cli) -> Self {
        Self {
            local: cli.local,
            env_file: cli.env_file,
            check: cli.check,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let startup = StartupConfig::from(Cli::parse());

    // Must run before anything reads the environment
    let env_loaded = startup.load_environment();

    let _telemetry = init_telemetry(&TelemetryConfig::from_env()?)?;

    let ctx = CancellationToken::new();
    tokio::spawn(shutdown_signal(ctx.clone()));

    let result = match env_loaded {
        Ok(()) => server::run(&startup, ctx.clone()).await,
        Err(e) => Err(e),
    };
    ctx.cancel();

    if let Err(e) = &result {
        tracing::error!(code = e.code(), error = %e, "Authentication service failed");
    } else {
        tracing::info!("Authentication service stopped");
    }

    Ok(result?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_defaults_to_true() {
        let cli = Cli::try_parse_from(["authentication-service"]).unwrap();
        assert!(cli.local);
        assert!(!cli.check);
    }

    #[test]
    fn test_bare_local_flag_enables_it() {
        let cli = Cli::try_parse_from(["authentication-service", "--local"]).unwrap();
        assert!(cli.local);

        let cli = Cli::try_parse_from(["authentication-service", "--local=true"]).unwrap();
        assert!(cli.local);
    }

    #[test]
    fn test_local_can_be_disabled() {
        let cli = Cli::try_parse_from(["authentication-service", "--local=false", "--check"]).unwrap();
        let startup = StartupConfig::from(cli);
        assert!(!startup.local);
        assert!(startup.check);
    }

    #[test]
    fn test_env_file_flag() {
        let cli =
            Cli::try_parse_from(["authentication-service", "--env-file", "deploy/.env"]).unwrap();
        assert_eq!(cli.env_file, Some(PathBuf::from("deploy/.env")));
    }
}
