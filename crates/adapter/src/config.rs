//! Environment-driven configuration for the server and the game it hosts.
//!
//! Every `from_env` has a `from_lookup` twin taking the variable source as a
//! closure, so parsing can be tested without touching the process environment.

use std::net::SocketAddr;

use crate::engine::ConfigError;
use crate::types::{RuleSet, SessionConfig, SettleDelays};

/// Protocol version spoken by this server. Clients must send a matching major.
pub const PROTOCOL_VERSION: &str = "1.0.0";

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 7878;
pub const DEFAULT_MAX_PENDING: usize = 10;

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub protocol_version: String,
    pub max_pending_commands: usize,
    /// Append every wire line to this file when set
    pub log_path: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            protocol_version: PROTOCOL_VERSION.to_string(),
            max_pending_commands: DEFAULT_MAX_PENDING,
            log_path: None,
        }
    }
}

impl ServerConfig {
    /// Read `BLOCK_BLAST_HOST`, `BLOCK_BLAST_PORT`, `BLOCK_BLAST_MAX_PENDING`, `BLOCK_BLAST_LOG_PATH`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let host = non_empty(lookup("BLOCK_BLAST_HOST")).unwrap_or(defaults.host);
        let port = parse_var(&lookup, "BLOCK_BLAST_PORT")?.unwrap_or(defaults.port);
        let max_pending_commands =
            parse_var(&lookup, "BLOCK_BLAST_MAX_PENDING")?.unwrap_or(defaults.max_pending_commands);
        let log_path = non_empty(lookup("BLOCK_BLAST_LOG_PATH"));

        Ok(Self {
            host,
            port,
            protocol_version: defaults.protocol_version,
            max_pending_commands,
            log_path,
        })
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr: SocketAddr = format!("{}:{}", self.host, self.port).parse()?;
        Ok(addr)
    }

    /// Check if the adapter is disabled via `BLOCK_BLAST_DISABLED`
    pub fn is_disabled() -> bool {
        is_truthy(std::env::var("BLOCK_BLAST_DISABLED").ok().as_deref())
    }
}

/// What the hosted game looks like
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    pub session: SessionConfig,
    pub settle: SettleDelays,
}

impl GameConfig {
    /// Read `BLOCK_BLAST_RULES`, `BLOCK_BLAST_BOARD_SIZE`, `BLOCK_BLAST_TRAY`,
    /// `BLOCK_BLAST_SEED`, `BLOCK_BLAST_PLACE_SETTLE_MS`, `BLOCK_BLAST_CLEAR_SETTLE_MS`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let rules = match non_empty(lookup("BLOCK_BLAST_RULES")) {
            Some(raw) => RuleSet::from_str(&raw).ok_or(ConfigError::InvalidValue {
                key: "BLOCK_BLAST_RULES",
                value: raw,
            })?,
            None => RuleSet::default(),
        };
        let seed = parse_var(&lookup, "BLOCK_BLAST_SEED")?.unwrap_or_else(clock_seed);

        let mut session = SessionConfig::for_rules(rules, seed);
        if let Some(size) = parse_var(&lookup, "BLOCK_BLAST_BOARD_SIZE")? {
            session.board_size = size;
        }
        if let Some(tray) = parse_var(&lookup, "BLOCK_BLAST_TRAY")? {
            session.tray_capacity = tray;
        }

        let mut settle = SettleDelays::default();
        if let Some(ms) = parse_var(&lookup, "BLOCK_BLAST_PLACE_SETTLE_MS")? {
            settle.place_ms = ms;
        }
        if let Some(ms) = parse_var(&lookup, "BLOCK_BLAST_CLEAR_SETTLE_MS")? {
            settle.clear_ms = ms;
        }

        Ok(Self { session, settle })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError> {
    match non_empty(lookup(key)) {
        None => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { key, value: raw }),
    }
}

fn is_truthy(value: Option<&str>) -> bool {
    value
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

fn clock_seed() -> u32 {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    (nanos as u32) | 1
}
