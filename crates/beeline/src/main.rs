//! Beeline - goal-seeking controller simulator

use beeline_sim::{get_param, MissionConfig, PARAMS};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "beeline")]
#[command(about = "Goal-seeking motion controller with mission simulator and web viewer")]
#[command(version)]
struct Cli {
    /// Log filter, e.g. `debug` or `beeline_core=trace`. Falls back to
    /// RUST_LOG, then `info`.
    #[arg(long, global = true, value_name = "FILTER")]
    log: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run single missions or parameter sweeps
    Cli {
        /// Pass remaining arguments to beeline-cli
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Launch web GUI
    Gui {
        /// Port to bind to
        #[arg(short, long, default_value_t = 8080)]
        port: u16,

        /// Host to bind to
        #[arg(short = 'H', long, default_value = "0.0.0.0")]
        host: String,
    },
    /// List the tunable mission parameters with their bounds and defaults
    Params,
}

fn log_filter(log: Option<&str>) -> EnvFilter {
    log.and_then(|f| EnvFilter::try_new(f).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(log_filter(cli.log.as_deref()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Some(Commands::Cli { args }) => {
            let cli_args: Vec<&str> = args.iter().map(|s| s.as_str()).collect();
            run_cli(&cli_args)
        }
        Some(Commands::Gui { port, host }) => run_gui(port, &host),
        Some(Commands::Params) => {
            for line in param_table() {
                println!("{line}");
            }
            Ok(())
        }
        None => run_gui(8080, "0.0.0.0"),
    }
}

/// One header line, then one line per tunable.
fn param_table() -> Vec<String> {
    let defaults = MissionConfig::default();
    let mut lines = vec![format!(
        "{:<22} {:>10} {:>10} {:>8} {:>10}  {}",
        "name", "min", "max", "step", "default", "label"
    )];
    for (name, spec) in PARAMS {
        let default = get_param(&defaults, name).unwrap_or(f64::NAN);
        lines.push(format!(
            "{:<22} {:>10} {:>10} {:>8} {:>10}  {}",
            name, spec.min, spec.max, spec.step, default, spec.label
        ));
    }
    lines
}

fn run_cli(args: &[&str]) -> anyhow::Result<()> {
    let mut full_args = vec!["beeline-cli"];
    full_args.extend(args);

    if let Err(e) = beeline_cli::run_cli_main(&full_args) {
        eprintln!("CLI error: {:#}", e);
        std::process::exit(1);
    }
    Ok(())
}

fn run_gui(port: u16, host: &str) -> anyhow::Result<()> {
    use std::net::SocketAddr;
    use tokio::net::TcpListener;
    use tokio::runtime::Runtime;
    let rt = Runtime::new()?;
    rt.block_on(async {
        let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
        let app = beeline_gui::create_router();
        println!("listening on http://{}", addr);
        tracing::info!("GUI server started on {}", addr);
        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_flag_is_global() {
        let cli = Cli::try_parse_from(["beeline", "params", "--log", "debug"]).unwrap();
        assert_eq!(cli.log.as_deref(), Some("debug"));
        assert!(matches!(cli.command, Some(Commands::Params)));

        let cli = Cli::try_parse_from(["beeline", "--log", "beeline_core=trace", "gui", "-p", "9000"])
            .unwrap();
        assert_eq!(cli.log.as_deref(), Some("beeline_core=trace"));
        assert!(matches!(cli.command, Some(Commands::Gui { port: 9000, .. })));
    }

    #[test]
    fn test_cli_args_pass_through() {
        let cli = Cli::try_parse_from(["beeline", "cli", "--goal-x", "3", "--json"]).unwrap();
        match cli.command {
            Some(Commands::Cli { args }) => assert_eq!(args, ["--goal-x", "3", "--json"]),
            _ => panic!("expected cli subcommand"),
        }
    }

    #[test]
    fn test_param_table_lists_every_tunable() {
        let lines = param_table();
        assert_eq!(lines.len(), PARAMS.len() + 1);
        assert!(lines[0].starts_with("name"));
        let max_turn = lines.iter().find(|l| l.starts_with("max_turn ")).unwrap();
        assert!(max_turn.contains("45"));
        assert!(max_turn.contains("Max Turn"));
        assert!(lines.iter().all(|l| !l.contains("NaN")));
    }
}
