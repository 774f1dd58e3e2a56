use crate::{server, validation};
use clap::{Args, Parser, Subcommand};
use home_finder::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Value Home Finder services",
    about = "Run the location validation and property data services behind the home finder client",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the location validation service (line-delimited JSON over TCP)
    Validation(ServeArgs),
    /// Start the property data fetch service (HTTP)
    Fetcher(ServeArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for this service
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for this service
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

impl ServeArgs {
    pub(crate) fn apply(mut self, server: &mut home_finder::config::ServerConfig) {
        if let Some(host) = self.host.take() {
            server.host = host;
        }
        if let Some(port) = self.port.take() {
            server.port = port;
        }
    }
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Validation(args) => validation::run(args).await,
        Command::Fetcher(args) => server::run(args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_service_subcommands_with_overrides() {
        let cli = Cli::try_parse_from(["home-finder-services", "fetcher", "--port", "6003"])
            .expect("fetcher args parse");
        let Command::Fetcher(args) = cli.command else {
            panic!("expected fetcher subcommand");
        };
        assert_eq!(args.port, Some(6003));
        assert!(args.host.is_none());

        let cli = Cli::try_parse_from(["home-finder-services", "validation", "--host", "0.0.0.0"])
            .expect("validation args parse");
        assert!(matches!(cli.command, Command::Validation(_)));
    }

    #[test]
    fn overrides_replace_configured_address() {
        let mut server = home_finder::config::ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 5001,
        };
        ServeArgs {
            host: None,
            port: Some(7001),
        }
        .apply(&mut server);
        assert_eq!(server.host, "127.0.0.1");
        assert_eq!(server.port, 7001);
    }

    #[test]
    fn subcommand_is_required() {
        assert!(Cli::try_parse_from(["home-finder-services"]).is_err());
    }
}
