use std::fmt;
use std::time::Duration;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The serial device could not be opened.
    #[error("open {path}: {source}")]
    Connection {
        path: String,
        #[source]
        source: serialport::Error,
    },
    #[error("serial I/O: {0}")]
    Io(#[from] std::io::Error),
    /// A bounded read did not complete in time.
    #[error("no response within {0:?}")]
    Timeout(Duration),
    #[error("response checksum mismatch: expected 0x{expected:02X}, received 0x{received:02X}")]
    Checksum { expected: u8, received: u8 },
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    /// The device answered with a nonzero answer code.
    #[error("device rejected command: {0}")]
    Device(AnswerCode),
    /// A descriptor carried a request type other than CONTROL or QUERY.
    #[error("invalid request type 0x{0:02X}")]
    InvalidCommand(u8),
}

impl Error {
    /// True when the link itself may be unusable, as opposed to a bad response.
    pub fn is_link_error(&self) -> bool {
        matches!(self, Self::Connection { .. } | Self::Io(_) | Self::Timeout(_))
    }
}

#[derive(Debug, thiserror::Error, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("invalid response header 0x{0:02X}")]
    InvalidHeader(u8),
    #[error("query response has no checksum byte")]
    MissingChecksum,
    #[error("query response carried no data")]
    EmptyPayload,
}

/// Answer byte of a response. `Success` is the only non-error value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerCode {
    Success,
    LimitOverMax,
    LimitOverMin,
    Canceled,
    ParseError,
    Unknown(u8),
}

impl AnswerCode {
    pub fn raw(self) -> u8 {
        match self {
            AnswerCode::Success => 0x00,
            AnswerCode::LimitOverMax => 0x01,
            AnswerCode::LimitOverMin => 0x02,
            AnswerCode::Canceled => 0x03,
            AnswerCode::ParseError => 0x04,
            AnswerCode::Unknown(code) => code,
        }
    }
}

impl From<u8> for AnswerCode {
    fn from(value: u8) -> Self {
        match value {
            0x00 => AnswerCode::Success,
            0x01 => AnswerCode::LimitOverMax,
            0x02 => AnswerCode::LimitOverMin,
            0x03 => AnswerCode::Canceled,
            0x04 => AnswerCode::ParseError,
            other => AnswerCode::Unknown(other),
        }
    }
}

impl fmt::Display for AnswerCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self {
            AnswerCode::Success => "success",
            AnswerCode::LimitOverMax => "limit over (max)",
            AnswerCode::LimitOverMin => "limit over (min)",
            AnswerCode::Canceled => "command canceled",
            AnswerCode::ParseError => "parse error",
            AnswerCode::Unknown(_) => "unknown answer",
        };
        write!(f, "{} (0x{:02X})", what, self.raw())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answer_code_keeps_raw_byte() {
        for b in 0..=u8::MAX {
            assert_eq!(AnswerCode::from(b).raw(), b);
        }
        assert_eq!(AnswerCode::from(0x03), AnswerCode::Canceled);
        assert_eq!(AnswerCode::from(0x7F), AnswerCode::Unknown(0x7F));
    }

    #[test]
    fn display_includes_code() {
        let e = Error::Device(AnswerCode::from(0x01));
        assert_eq!(e.to_string(), "device rejected command: limit over (max) (0x01)");
        let e = Error::from(ProtocolError::InvalidHeader(0x71));
        assert_eq!(e.to_string(), "invalid response header 0x71");
    }

    #[test]
    fn link_errors() {
        assert!(Error::Timeout(Duration::from_millis(10)).is_link_error());
        assert!(Error::Io(std::io::ErrorKind::BrokenPipe.into()).is_link_error());
        assert!(!Error::Checksum { expected: 1, received: 2 }.is_link_error());
        assert!(!Error::Device(AnswerCode::Canceled).is_link_error());
    }
}
