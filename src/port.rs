use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use std::time::Duration;

use crate::config::{LinkConfig, ReadTimeout};
use crate::error::{Error, Result};

/// Driver-level read timeout used while waiting forever; the read loop
/// resumes after each one.
const POLL_TICK: Duration = Duration::from_millis(100);

/// Opens the device at 8N1 without flow control, the set's fixed framing.
pub fn open_port(config: &LinkConfig) -> Result<Box<dyn SerialPort>> {
    let tick = match config.read_timeout {
        ReadTimeout::Forever => POLL_TICK,
        ReadTimeout::Bounded(limit) => limit.clamp(Duration::from_millis(1), POLL_TICK),
    };
    let builder = serialport::new(&config.path, config.baud)
        .timeout(tick)
        .data_bits(DataBits::Eight)
        .parity(Parity::None)
        .stop_bits(StopBits::One)
        .flow_control(FlowControl::None);

    builder.open().map_err(|source| Error::Connection {
        path: config.path.clone(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_device_is_connection_error() {
        let config = LinkConfig::new("/dev/does-not-exist-bravia");
        match open_port(&config) {
            Err(Error::Connection { path, .. }) => assert_eq!(path, "/dev/does-not-exist-bravia"),
            Err(other) => panic!("unexpected error {:?}", other),
            Ok(_) => panic!("opened a device that does not exist"),
        }
    }
}
