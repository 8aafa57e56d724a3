use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_BAUD: u32 = 9600;
/// Manufacturer recommendation; 150 ms also works on most sets.
pub const DEFAULT_COMMAND_INTERVAL: Duration = Duration::from_millis(500);

/// How long a response read may block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReadTimeout {
    #[default]
    Forever,
    Bounded(Duration),
}

#[derive(Debug, Error)]
#[error("timeout must be integer ms or 'none', got {0:?}")]
pub struct BadTimeout(String);

impl ReadTimeout {
    pub fn from_cli(s: &str) -> Result<Self, BadTimeout> {
        if s.eq_ignore_ascii_case("none") || s.eq_ignore_ascii_case("forever") {
            Ok(ReadTimeout::Forever)
        } else {
            let ms: u64 = s.parse().map_err(|_| BadTimeout(s.to_string()))?;
            Ok(ReadTimeout::Bounded(Duration::from_millis(ms)))
        }
    }
}

/// Everything needed to open and pace one device connection.
#[derive(Debug, Clone)]
pub struct LinkConfig {
    pub path: String,
    pub baud: u32,
    pub read_timeout: ReadTimeout,
    pub command_interval: Duration,
}

impl LinkConfig {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            baud: DEFAULT_BAUD,
            read_timeout: ReadTimeout::Forever,
            command_interval: DEFAULT_COMMAND_INTERVAL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_timeout() {
        assert_eq!(ReadTimeout::from_cli("none").unwrap(), ReadTimeout::Forever);
        assert_eq!(ReadTimeout::from_cli("Forever").unwrap(), ReadTimeout::Forever);
        assert_eq!(
            ReadTimeout::from_cli("250").unwrap(),
            ReadTimeout::Bounded(Duration::from_millis(250))
        );
        assert!(ReadTimeout::from_cli("2s").is_err());
        assert!(ReadTimeout::from_cli("-1").is_err());
    }

    #[test]
    fn defaults() {
        let c = LinkConfig::new("/dev/ttyUSB0");
        assert_eq!(c.baud, 9600);
        assert_eq!(c.read_timeout, ReadTimeout::Forever);
        assert_eq!(c.command_interval, Duration::from_millis(500));
    }
}
