use crate::catalog::print_catalogs;
use crate::demo::{run_demo, DemoArgs};
use crate::server;
use arion_recruit::error::AppError;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Team Arion Recruitment",
    about = "Run the Team Arion application intake service from the command line",
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
    /// Walk a sample applicant through the wizard and submit it
    Demo(DemoArgs),
    /// Print every option the application form offers
    Catalog,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Override the SQLite database path (`:memory:` keeps records in memory)
    #[arg(long)]
    pub(crate) database: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Demo(args) => run_demo(args).await,
        Command::Catalog => {
            print_catalogs();
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["arion-recruit-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn serve_accepts_overrides() {
        let cli = Cli::try_parse_from([
            "arion-recruit-api",
            "serve",
            "--port",
            "8080",
            "--database",
            ":memory:",
        ])
        .expect("parses");

        let Some(Command::Serve(args)) = cli.command else {
            panic!("expected serve command");
        };
        assert_eq!(args.port, Some(8080));
        assert_eq!(args.database, Some(PathBuf::from(":memory:")));
        assert!(args.host.is_none());
    }

    #[test]
    fn demo_accepts_remote_endpoint() {
        let cli = Cli::try_parse_from([
            "arion-recruit-api",
            "demo",
            "--endpoint",
            "http://127.0.0.1:3000",
        ])
        .expect("parses");

        let Some(Command::Demo(args)) = cli.command else {
            panic!("expected demo command");
        };
        assert_eq!(args.endpoint.as_deref(), Some("http://127.0.0.1:3000"));
    }
}
