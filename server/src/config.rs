//! Command line arguments and the configuration derived from them.

use clap::Parser;
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[clap(author, version, about = "Authoritative arena shooter server")]
pub struct Args {
    /// Server IP address to bind to
    #[clap(short = 'H', long, default_value = "127.0.0.1")]
    pub host: String,

    /// Server port to listen on
    #[clap(short, long, default_value = "8080")]
    pub port: u16,

    /// Simulation ticks per second
    #[clap(short, long, default_value = "60")]
    pub tick_rate: u32,

    /// Maximum number of connected clients
    #[clap(short, long, default_value = "16")]
    pub max_clients: usize,

    /// Ticks between full game state snapshots
    #[clap(short, long, default_value = "30")]
    pub snapshot_interval: u64,

    /// Milliseconds a dead player waits before respawning
    #[clap(short, long, default_value = "3000")]
    pub respawn_delay: u64,

    /// Seconds of silence before a client is dropped
    #[clap(long, default_value = "5")]
    pub client_timeout: u64,

    /// Built-in level to play
    #[clap(short, long, default_value = "arena")]
    pub level: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub tick_duration: Duration,
    pub max_clients: usize,
    pub snapshot_interval: u64,
    pub respawn_delay_ms: u64,
    pub client_timeout: Duration,
    pub level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            tick_duration: Duration::from_micros(1_000_000 / 60),
            max_clients: 16,
            snapshot_interval: 30,
            respawn_delay_ms: 3000,
            client_timeout: Duration::from_secs(5),
            level: "arena".to_string(),
        }
    }
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        let tick_rate = args.tick_rate.max(1);
        Self {
            bind_addr: format!("{}:{}", args.host, args.port),
            tick_duration: Duration::from_micros(1_000_000 / tick_rate as u64),
            max_clients: args.max_clients,
            snapshot_interval: args.snapshot_interval,
            respawn_delay_ms: args.respawn_delay,
            client_timeout: Duration::from_secs(args.client_timeout),
            level: args.level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_args() {
        let args = Args::parse_from(["server"]);
        assert_eq!(ServerConfig::from(args), ServerConfig::default());
    }

    #[test]
    fn test_args_conversion() {
        let args = Args::parse_from([
            "server", "-H", "0.0.0.0", "-p", "9000", "-t", "20", "-r", "500",
        ]);
        let config = ServerConfig::from(args);
        assert_eq!(config.bind_addr, "0.0.0.0:9000");
        assert_eq!(config.tick_duration, Duration::from_millis(50));
        assert_eq!(config.respawn_delay_ms, 500);
    }

    #[test]
    fn test_zero_tick_rate_is_clamped() {
        let args = Args::parse_from(["server", "--tick-rate", "0"]);
        assert_eq!(ServerConfig::from(args).tick_duration, Duration::from_secs(1));
    }
}
