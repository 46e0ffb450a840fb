use crate::report::{run_predict, PredictArgs};
use crate::server;
use barangay_insights::error::AppError;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Barangay Insights",
    about = "Serve and run barangay event-priority predictions from census and weather data",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print predictions for one barangay or for all of them
    Predict(PredictArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Directory holding the census CSV tables
    #[arg(long)]
    pub(crate) data_dir: Option<PathBuf>,
    /// Weather feed URL; pass an empty value to always use the fallback series
    #[arg(long)]
    pub(crate) weather_url: Option<String>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Predict(args) => run_predict(args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_defaults_to_serve() {
        let cli = Cli::try_parse_from(["barangay-insights-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn predict_requires_a_target() {
        assert!(Cli::try_parse_from(["barangay-insights-api", "predict"]).is_err());
        assert!(Cli::try_parse_from([
            "barangay-insights-api",
            "predict",
            "--all",
            "--barangay",
            "Lambac",
        ])
        .is_err());
    }

    #[test]
    fn predict_accepts_offline_json_flags() {
        let cli = Cli::try_parse_from([
            "barangay-insights-api",
            "predict",
            "--barangay",
            "San Roque",
            "--offline",
            "--json",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Predict(args)) => {
                assert_eq!(args.barangay.as_deref(), Some("San Roque"));
                assert!(args.offline);
                assert!(args.json);
                assert!(!args.all);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
