use clap::Parser;
use std::net::SocketAddr;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Server address to connect to
    #[arg(short = 's', long, default_value = "127.0.0.1:8080")]
    pub server: String,

    /// Simulate network latency in milliseconds (round trip)
    #[arg(short = 'l', long, default_value = "0")]
    pub fake_ping: u64,

    /// Window width
    #[arg(short = 'w', long, default_value = "1280")]
    pub width: u32,

    /// Window height (no short flag to avoid conflict with --help)
    #[arg(long, default_value = "720")]
    pub height: u32,

    /// Play alone without contacting a server
    #[arg(long)]
    pub offline: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// `None` when offline or when the address did not parse.
    pub server_addr: Option<SocketAddr>,
    pub fake_ping_ms: u64,
    pub width: u32,
    pub height: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_addr: "127.0.0.1:8080".parse().ok(),
            fake_ping_ms: 0,
            width: 1280,
            height: 720,
        }
    }
}

impl From<Args> for ClientConfig {
    fn from(args: Args) -> Self {
        let server_addr = if args.offline {
            None
        } else {
            args.server.parse().ok()
        };
        Self {
            server_addr,
            fake_ping_ms: args.fake_ping,
            width: args.width.max(1),
            height: args.height.max(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::from(Args::parse_from(["client"]));
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_offline_skips_server() {
        let config = ClientConfig::from(Args::parse_from(["client", "--offline", "-l", "120"]));
        assert_eq!(config.server_addr, None);
        assert_eq!(config.fake_ping_ms, 120);
    }

    #[test]
    fn test_bad_address_runs_offline() {
        let config = ClientConfig::from(Args::parse_from(["client", "-s", "not-an-address"]));
        assert_eq!(config.server_addr, None);
    }

    #[test]
    fn test_window_size() {
        let config = ClientConfig::from(Args::parse_from(["client", "-w", "640", "--height", "0"]));
        assert_eq!((config.width, config.height), (640, 1));
    }
}
