use clap::Parser;
use std::path::PathBuf;

use crate::util::config::GatewayConfig;

#[derive(Parser, Debug)]
#[command(author, version, about = "energy-s inference API server")]
pub struct Args {
    /// TOML config file. Defaults to config/energy.toml when present.
    #[arg(short, long, env = "ENERGY_CONFIG")]
    pub config: Option<PathBuf>,

    #[arg(long, env = "ENERGY_HOST")]
    pub host: Option<String>,

    #[arg(short, long, env = "ENERGY_PORT")]
    pub port: Option<u16>,

    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Command-line values override the file.
    pub fn apply(&self, config: &mut GatewayConfig) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides() {
        let args = Args::try_parse_from(["api_server", "--port", "9100"]).unwrap();
        let mut config = GatewayConfig::default();
        args.apply(&mut config);
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(args.log_level, "info");
    }
}
