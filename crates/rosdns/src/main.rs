// # rosdns - RouterOS DNS reconciliation
//
// This binary is a THIN adapter over routeros-core:
// 1. Resolve connection settings from flags, falling back to environment variables
// 2. Initialise logging
// 3. Run one reconciliation (or a facts query)
// 4. Print the JSON outcome and map failures to exit codes
//
// No reconciliation logic lives here.
//
// ## Configuration
//
// - `ROUTEROS_HOST`: Router hostname or address (`--hostname`)
// - `ROUTEROS_USER`: User (`--username`)
// - `ROUTEROS_PASSWORD`: Password (`--password`)
// - `ROUTEROS_PORT`: REST API port, default 443 (`--port`)
// - `ROUTEROS_VALIDATE_CERTS`: Validate the TLS certificate, default true (`--validate-certs`)
// - `ROUTEROS_CHECK_MODE`: Report without applying (`--check`)
// - `ROUTEROS_LOG_LEVEL`: trace, debug, info, warn, error (`--log-level`)
//
// ## Example
//
// ```bash
// export ROUTEROS_HOST=router.localdomain
// export ROUTEROS_USER=admin
// export ROUTEROS_PASSWORD=secret
//
// rosdns dns --name test.localdomain --ip 10.10.10.10
// rosdns dns --name test.localdomain --state absent --check
// rosdns facts
// ```

use anyhow::Result;
use clap::{ArgAction, Args, Parser, Subcommand};
use routeros_core::{ConnectionConfig, DnsStaticEntry, Reconciler, TargetState, gather_facts};
use routeros_rest::RestClient;
use serde_json::{Value, json};
use std::process::ExitCode;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for different failure classes
///
/// - 0: Success, whether or not anything changed
/// - 1: Configuration error (nothing was sent)
/// - 2: Request error (the device or the network failed)
#[derive(Debug, Clone, Copy)]
enum RosExitCode {
    Success = 0,
    ConfigError = 1,
    RequestError = 2,
}

impl From<RosExitCode> for ExitCode {
    fn from(code: RosExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

#[derive(Parser)]
#[command(name = "rosdns", version, about = "Reconcile RouterOS configuration over the REST API")]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "ROUTEROS_LOG_LEVEL", default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

// No Debug: holds the password
#[derive(Args)]
struct ConnectionArgs {
    /// Hostname or IP address of the router
    #[arg(long, env = "ROUTEROS_HOST", global = true)]
    hostname: Option<String>,

    /// User to access the router
    #[arg(long, visible_alias = "user", env = "ROUTEROS_USER", global = true)]
    username: Option<String>,

    /// Password of the router
    #[arg(
        long,
        visible_aliases = ["pass", "passwd", "pwd"],
        env = "ROUTEROS_PASSWORD",
        hide_env_values = true,
        global = true
    )]
    password: Option<String>,

    /// Port of the REST API service
    #[arg(long, env = "ROUTEROS_PORT", default_value_t = 443, global = true)]
    port: u16,

    /// Validate the router's TLS certificate; set to false for self-signed certificates
    #[arg(
        long,
        env = "ROUTEROS_VALIDATE_CERTS",
        default_value_t = true,
        action = ArgAction::Set,
        global = true
    )]
    validate_certs: bool,
}

impl ConnectionArgs {
    /// Resolve into the config handed to the engine
    ///
    /// Missing values become empty strings so the engine reports them as
    /// configuration errors.
    fn resolve(self) -> ConnectionConfig {
        ConnectionConfig::new(
            self.hostname.unwrap_or_default(),
            self.username.unwrap_or_default(),
            self.password.unwrap_or_default(),
        )
        .with_port(self.port)
        .with_validate_certs(self.validate_certs)
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create, update or remove a static DNS entry
    Dns {
        /// Fully qualified domain name of the entry
        #[arg(long)]
        name: String,

        /// IP address of the entry
        #[arg(long)]
        ip: Option<String>,

        /// Time to live of the entry (e.g. 1d, 5m)
        #[arg(long)]
        ttl: Option<String>,

        /// Enable or disable the entry
        #[arg(long, default_value_t = true, action = ArgAction::Set)]
        enabled: bool,

        /// present or absent
        #[arg(long, default_value = "present")]
        state: TargetState,

        /// Report what would change without applying it
        #[arg(long, env = "ROUTEROS_CHECK_MODE")]
        check: bool,
    },

    /// Print facts about the router
    Facts,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing
    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        other => {
            eprintln!(
                "ROUTEROS_LOG_LEVEL '{}' is not valid. Valid levels: trace, debug, info, warn, error",
                other
            );
            return RosExitCode::ConfigError.into();
        }
    };

    // stdout carries the JSON result, logs go to stderr
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return RosExitCode::ConfigError.into();
    }

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return RosExitCode::RequestError.into();
        }
    };

    match rt.block_on(run(cli)) {
        Ok(output) => {
            println!("{}", render(&output));
            RosExitCode::Success.into()
        }
        Err(e) => {
            error!("{:#}", e);
            println!("{}", render(&json!({"failed": true, "msg": format!("{:#}", e)})));
            exit_code_for(&e).into()
        }
    }
}

/// Run the selected command and return its JSON output
async fn run(cli: Cli) -> Result<Value> {
    let config = cli.connection.resolve();
    let client = RestClient::new(&config)?;

    match cli.command {
        Command::Dns {
            name,
            ip,
            ttl,
            enabled,
            state,
            check,
        } => {
            let desired = DnsStaticEntry {
                name,
                ip,
                ttl,
                enabled,
                state,
            };

            info!(
                "Reconciling DNS entry {} on {} [mode: {}]",
                desired.name,
                config.hostname,
                if check { "CHECK" } else { "LIVE" }
            );

            let outcome = Reconciler::new(&client)
                .with_check_mode(check)
                .reconcile(&desired)
                .await?;

            Ok(serde_json::to_value(outcome)?)
        }
        Command::Facts => {
            let facts = gather_facts(&client).await?;
            Ok(json!({"changed": false, "facts": facts}))
        }
    }
}

fn exit_code_for(err: &anyhow::Error) -> RosExitCode {
    match err.downcast_ref::<routeros_core::Error>() {
        Some(e) if e.is_config() => RosExitCode::ConfigError,
        _ => RosExitCode::RequestError,
    }
}

fn render(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn dns_defaults() {
        let cli = parse(&["rosdns", "--hostname", "r1", "dns", "--name", "a.lan"]);

        match cli.command {
            Command::Dns {
                name,
                ip,
                enabled,
                state,
                ..
            } => {
                assert_eq!(name, "a.lan");
                assert_eq!(ip, None);
                assert!(enabled);
                assert_eq!(state, TargetState::Present);
            }
            Command::Facts => panic!("expected dns command"),
        }
    }

    #[test]
    fn explicit_flags_resolve_into_config() {
        let cli = parse(&[
            "rosdns",
            "--hostname",
            "10.0.0.1",
            "--user",
            "admin",
            "--pwd",
            "pw",
            "--port",
            "8443",
            "--validate-certs",
            "false",
            "facts",
        ]);

        let config = cli.connection.resolve();
        assert_eq!(config.hostname, "10.0.0.1");
        assert_eq!(config.username, "admin");
        assert_eq!(config.port, 8443);
        assert!(!config.validate_certs);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn absent_state_and_disabled_entry() {
        let cli = parse(&[
            "rosdns", "dns", "--name", "a.lan", "--state", "absent", "--enabled", "false",
        ]);

        match cli.command {
            Command::Dns { state, enabled, .. } => {
                assert_eq!(state, TargetState::Absent);
                assert!(!enabled);
            }
            Command::Facts => panic!("expected dns command"),
        }
    }

    #[test]
    fn invalid_state_is_rejected() {
        assert!(Cli::try_parse_from(["rosdns", "dns", "--name", "a", "--state", "gone"]).is_err());
    }

    #[test]
    fn config_errors_map_to_exit_one() {
        let err =
            anyhow::Error::from(routeros_core::Error::config("Hostname parameter is missing."));
        assert!(matches!(exit_code_for(&err), RosExitCode::ConfigError));

        let err = anyhow::Error::from(routeros_core::Error::status("ip/dns/static", 401, ""));
        assert!(matches!(exit_code_for(&err), RosExitCode::RequestError));
    }
}
