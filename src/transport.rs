//! Byte-level link to the set.
//!
//! The engine only needs two blocking primitives, so they live behind a
//! trait; [`SerialTransport`] is the real one.

use std::io::{self, Read, Write};
use std::time::Instant;

use serialport::SerialPort;
use tracing::trace;

use crate::config::{LinkConfig, ReadTimeout};
use crate::error::{Error, Result};
use crate::port::open_port;

pub trait Transport {
    /// Writes every byte and flushes before returning.
    fn write_all(&mut self, bytes: &[u8]) -> Result<()>;

    /// Blocks until exactly `n` bytes have been received.
    fn read_exact(&mut self, n: usize) -> Result<Vec<u8>>;
}

pub struct SerialTransport {
    port: Box<dyn SerialPort>,
    read_timeout: ReadTimeout,
}

impl SerialTransport {
    pub fn open(config: &LinkConfig) -> Result<Self> {
        let port = open_port(config)?;
        Ok(Self {
            port,
            read_timeout: config.read_timeout,
        })
    }
}

impl Transport for SerialTransport {
    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        self.port.write_all(bytes)?;
        self.port.flush()?;
        Ok(())
    }

    fn read_exact(&mut self, n: usize) -> Result<Vec<u8>> {
        read_exact_with(&mut *self.port, n, self.read_timeout)
    }
}

/// Fills `n` bytes from `reader`, treating driver timeouts according to
/// `timeout`. With [`ReadTimeout::Forever`] they are ignored.
pub(crate) fn read_exact_with<R: Read + ?Sized>(
    reader: &mut R,
    n: usize,
    timeout: ReadTimeout,
) -> Result<Vec<u8>> {
    let mut buf = vec![0u8; n];
    let mut filled = 0;
    let start = Instant::now();

    while filled < n {
        if let ReadTimeout::Bounded(limit) = timeout
            && start.elapsed() >= limit
        {
            return Err(Error::Timeout(limit));
        }
        match reader.read(&mut buf[filled..]) {
            Ok(0) => return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into()),
            Ok(k) => {
                trace!(got = k, filled = filled + k, want = n, "serial read");
                filled += k;
            }
            Err(e) if matches!(e.kind(), io::ErrorKind::TimedOut | io::ErrorKind::Interrupted) => {
                continue;
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::time::Duration;

    /// Replays scripted chunks; reports a driver timeout once drained.
    struct Scripted(VecDeque<io::Result<Vec<u8>>>);

    impl Read for Scripted {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.0.pop_front() {
                Some(Ok(mut chunk)) => {
                    let k = chunk.len().min(buf.len());
                    buf[..k].copy_from_slice(&chunk[..k]);
                    if k < chunk.len() {
                        self.0.push_front(Ok(chunk.split_off(k)));
                    }
                    Ok(k)
                }
                Some(Err(e)) => Err(e),
                None => {
                    std::thread::sleep(Duration::from_millis(1));
                    Err(io::ErrorKind::TimedOut.into())
                }
            }
        }
    }

    fn timed_out() -> io::Result<Vec<u8>> {
        Err(io::ErrorKind::TimedOut.into())
    }

    #[test]
    fn forever_survives_driver_timeouts() {
        let mut r = Scripted(VecDeque::from([
            timed_out(),
            Ok(vec![0x70]),
            timed_out(),
            Err(io::ErrorKind::Interrupted.into()),
            Ok(vec![0x00, 0x70, 0xAA]),
        ]));
        let got = read_exact_with(&mut r, 3, ReadTimeout::Forever).unwrap();
        assert_eq!(got, vec![0x70, 0x00, 0x70]);
        // the extra byte stays buffered for the next read
        let rest = read_exact_with(&mut r, 1, ReadTimeout::Forever).unwrap();
        assert_eq!(rest, vec![0xAA]);
    }

    #[test]
    fn bounded_read_times_out() {
        let limit = Duration::from_millis(20);
        let mut r = Scripted(VecDeque::from([Ok(vec![0x70])]));
        let start = Instant::now();
        match read_exact_with(&mut r, 3, ReadTimeout::Bounded(limit)) {
            Err(Error::Timeout(d)) => assert_eq!(d, limit),
            other => panic!("unexpected {:?}", other),
        }
        assert!(start.elapsed() >= limit);
    }

    #[test]
    fn end_of_stream_is_io_error() {
        let mut r = Scripted(VecDeque::from([Ok(vec![0x70]), Ok(vec![])]));
        match read_exact_with(&mut r, 3, ReadTimeout::Forever) {
            Err(Error::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::UnexpectedEof),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn other_errors_propagate() {
        let mut r = Scripted(VecDeque::from([Err(io::ErrorKind::BrokenPipe.into())]));
        assert!(matches!(
            read_exact_with(&mut r, 1, ReadTimeout::Forever),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn zero_length_read_is_immediate() {
        let mut r = Scripted(VecDeque::new());
        assert!(read_exact_with(&mut r, 0, ReadTimeout::Bounded(Duration::ZERO)).unwrap().is_empty());
    }
}
