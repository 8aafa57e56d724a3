//! Request/response transactions and the command surface.

use std::fmt;
use std::io;
use std::time::{Duration, Instant};

use tracing::{debug, info, trace, warn};

use crate::config::LinkConfig;
use crate::error::{Error, ProtocolError, Result};
use crate::frame::{
    RESPONSE_HEAD_LEN, RequestType, build_frame, parse_control_response, parse_query_response,
};
use crate::proto::command::{
    CommandDescriptor, MUTE_TOGGLE, Operation, POWER_OFF, POWER_ON, POWER_QUERY, VOLUME_DOWN,
    VOLUME_UP,
};
use crate::stats::Stats;
use crate::transport::{SerialTransport, Transport};

/// Connection to one set.
///
/// Owns its transport; every operation takes `&mut self`, so at most one
/// transaction is ever in flight. Sharing across threads needs a mutex
/// around the whole value since responses carry no request tag.
pub struct Bravia<T: Transport> {
    link: T,
    command_interval: Duration,
    last_done: Option<Instant>,
    stats: Stats,
}

impl Bravia<SerialTransport> {
    pub fn open(config: &LinkConfig) -> Result<Self> {
        info!(dev = %config.path, baud = config.baud, "opening serial link");
        let link = SerialTransport::open(config)?;
        Ok(Self::new(link, config.command_interval))
    }
}

impl<T: Transport> Bravia<T> {
    pub fn new(link: T, command_interval: Duration) -> Self {
        Self {
            link,
            command_interval,
            last_done: None,
            stats: Stats::new(),
        }
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn into_inner(self) -> T {
        self.link
    }

    /// Runs one transaction: sends `descriptor` and validates the reply.
    ///
    /// Returns the payload for QUERY requests and `None` for CONTROL. A
    /// failed transaction leaves nothing behind; the link can be used again
    /// unless the error is a link error.
    pub fn send_command(&mut self, descriptor: &CommandDescriptor) -> Result<Option<Vec<u8>>> {
        let kind = RequestType::try_from(descriptor.request)?;
        let frame = build_frame(descriptor)?;

        self.pace();
        let result = self.transact(kind, &frame);
        self.last_done = Some(Instant::now());

        match &result {
            Ok(_) => self.stats.inc_ok(),
            Err(e) => {
                warn!(frame = %Hex(&frame), error = %e, "transaction failed");
                self.stats.inc_failed();
            }
        }
        result
    }

    fn pace(&self) {
        let Some(last) = self.last_done else {
            return;
        };
        let since = last.elapsed();
        if since < self.command_interval {
            let wait = self.command_interval - since;
            trace!(wait_ms = wait.as_millis() as u64, "waiting out command interval");
            std::thread::sleep(wait);
        }
    }

    fn transact(&mut self, kind: RequestType, frame: &[u8]) -> Result<Option<Vec<u8>>> {
        debug!(frame = %Hex(frame), "tx");
        self.link.write_all(frame)?;
        self.stats.add_tx(frame.len());

        let head = self.read_head()?;
        match kind {
            RequestType::Control => {
                debug!(resp = %Hex(&head), "rx");
                parse_control_response(head)?;
                Ok(None)
            }
            RequestType::Query => {
                let tail = self.link.read_exact(head[2] as usize)?;
                self.stats.add_rx(tail.len());
                debug!(head = %Hex(&head), tail = %Hex(&tail), "rx");
                parse_query_response(head, tail).map(Some)
            }
        }
    }

    fn read_head(&mut self) -> Result<[u8; RESPONSE_HEAD_LEN]> {
        let bytes = self.link.read_exact(RESPONSE_HEAD_LEN)?;
        self.stats.add_rx(bytes.len());
        <[u8; RESPONSE_HEAD_LEN]>::try_from(bytes.as_slice()).map_err(|_| {
            Error::Io(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("transport returned {} bytes, wanted {}", bytes.len(), RESPONSE_HEAD_LEN),
            ))
        })
    }

    // ---- Command surface ----

    pub fn power_on(&mut self) -> Result<()> {
        self.send_command(&POWER_ON)?;
        Ok(())
    }

    pub fn power_off(&mut self) -> Result<()> {
        self.send_command(&POWER_OFF)?;
        Ok(())
    }

    pub fn is_powered_on(&mut self) -> Result<bool> {
        let payload = self.send_command(&POWER_QUERY)?.unwrap_or_default();
        let state = payload.first().ok_or(ProtocolError::EmptyPayload)?;
        Ok(*state != 0)
    }

    pub fn volume_up(&mut self) -> Result<()> {
        self.send_command(&VOLUME_UP)?;
        Ok(())
    }

    pub fn volume_down(&mut self) -> Result<()> {
        self.send_command(&VOLUME_DOWN)?;
        Ok(())
    }

    pub fn mute_toggle(&mut self) -> Result<()> {
        self.send_command(&MUTE_TOGGLE)?;
        Ok(())
    }

    /// Queries the power state, then switches to the opposite one.
    ///
    /// These are two separate transactions. If the set changes state in
    /// between (remote control, front panel) the second command acts on the
    /// stale reading; the protocol has no atomic toggle.
    pub fn power_toggle(&mut self) -> Result<()> {
        if self.is_powered_on()? {
            info!("set is on, powering off");
            self.power_off()
        } else {
            info!("set is off, powering on");
            self.power_on()
        }
    }

    pub fn execute(&mut self, op: Operation) -> Result<()> {
        match op {
            Operation::PowerOn => self.power_on(),
            Operation::PowerOff => self.power_off(),
            Operation::PowerToggle => self.power_toggle(),
            Operation::VolumeUp => self.volume_up(),
            Operation::VolumeDown => self.volume_down(),
            Operation::MuteToggle => self.mute_toggle(),
        }
    }
}

/// Space-separated uppercase hex for logs.
struct Hex<'a>(&'a [u8]);

impl fmt::Display for Hex<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, b) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{:02X}", b)?;
        }
        Ok(())
    }
}
