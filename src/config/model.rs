//! Configuration data model.
//!
//! Field names follow the on-disk keys (`bot_nick`, `host_address`, ...).
//! Every field is required; there are no defaults.

use serde::Deserialize;
use std::path::PathBuf;

/// Connection and output settings for a single logging session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerConfig {
    /// Nickname sent with `NICK` and `USER`.
    #[serde(rename = "bot_nick")]
    pub nick: String,
    /// Fallback nickname used when the server reports the first one in use.
    #[serde(rename = "bot_alt_nick")]
    pub alt_nick: String,
    #[serde(rename = "bot_real_name")]
    pub real_name: String,
    /// Mode bitmask for `USER` (0 visible, 8 invisible).
    pub user_mode: u32,
    /// Hostname or IP address of the IRC server.
    pub host_address: String,
    pub port: u16,
    /// Wrap the connection in TLS.
    pub ssl: bool,
    pub channel: String,
    /// Chat log destination. A leading `~/` expands to the home directory.
    pub output_file: PathBuf,
}

impl ServerConfig {
    /// Reject values that deserialize fine but cannot be used to connect.
    pub fn validate(&self) -> Result<(), String> {
        if self.nick.trim().is_empty() {
            return Err("bot_nick must not be empty".into());
        }
        if self.host_address.trim().is_empty() {
            return Err("host_address must not be empty".into());
        }
        if self.port == 0 {
            return Err("port must not be 0".into());
        }
        if self.channel.trim().is_empty() {
            return Err("channel must not be empty".into());
        }
        if self.output_file.as_os_str().is_empty() {
            return Err("output_file must not be empty".into());
        }
        Ok(())
    }

    /// `host:port` for log messages.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host_address, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ServerConfig {
        ServerConfig {
            nick: "logger".into(),
            alt_nick: "logger_".into(),
            real_name: "Chat Logger".into(),
            user_mode: 8,
            host_address: "irc.example.net".into(),
            port: 6697,
            ssl: true,
            channel: "#test".into(),
            output_file: PathBuf::from("logs/chat.txt"),
        }
    }

    #[test]
    fn test_validate_accepts_complete_config() {
        assert_eq!(sample().validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_blank_fields() {
        let mut cfg = sample();
        cfg.nick = "  ".into();
        assert!(cfg.validate().unwrap_err().contains("bot_nick"));

        let mut cfg = sample();
        cfg.channel.clear();
        assert!(cfg.validate().unwrap_err().contains("channel"));

        let mut cfg = sample();
        cfg.port = 0;
        assert!(cfg.validate().unwrap_err().contains("port"));
    }

    #[test]
    fn test_address() {
        assert_eq!(sample().address(), "irc.example.net:6697");
    }
}
