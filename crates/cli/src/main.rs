mod commands;

use crate::commands::{handle_clusters, handle_connector_types, handle_serve, ServeArgs};
use clap::{Parser, Subcommand};
use common::error::GatewayError;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "connect-gateway")]
pub struct Cli {
    #[arg(
        long = "config-path",
        short = 'c',
        help = "path to gateway.yml or the directory holding it",
        global = true
    )]
    pub config_path: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Cmd,
}

#[derive(Subcommand)]
pub enum Cmd {
    /// Serve the HTTP API
    Serve(ServeArgs),
    /// List the configured Kafka Connect clusters
    Clusters,
    /// Print the supported connector types as JSON
    ConnectorTypes,
}

fn run_cmd(func: Result<(), GatewayError>) {
    if let Err(e) = func {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn main() {
    logging::init_logger();
    let cli = Cli::parse();

    match cli.command {
        Cmd::Serve(args) => run_cmd(handle_serve(args, cli.config_path)),
        Cmd::Clusters => run_cmd(handle_clusters(cli.config_path)),
        Cmd::ConnectorTypes => run_cmd(handle_connector_types(cli.config_path)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn config_path_is_global() {
        let cli = Cli::try_parse_from([
            "connect-gateway",
            "serve",
            "--addr",
            "127.0.0.1:9000",
            "-c",
            "/etc/gateway",
        ])
        .unwrap();
        assert_eq!(cli.config_path, Some(PathBuf::from("/etc/gateway")));
        match cli.command {
            Cmd::Serve(args) => assert_eq!(args.addr.as_deref(), Some("127.0.0.1:9000")),
            _ => panic!("expected serve"),
        }
    }
}
