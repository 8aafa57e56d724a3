use std::time::Instant;

use tracing::debug;

/// Counters for one connection.
#[derive(Debug, Clone)]
pub struct Stats {
    pub ok: u64,
    pub failed: u64,
    pub bytes_tx: u64,
    pub bytes_rx: u64,
    t0: Instant,
}

impl Stats {
    pub fn new() -> Self {
        Self {
            ok: 0,
            failed: 0,
            bytes_tx: 0,
            bytes_rx: 0,
            t0: Instant::now(),
        }
    }
    pub fn add_tx(&mut self, n: usize) {
        self.bytes_tx += n as u64;
    }
    pub fn add_rx(&mut self, n: usize) {
        self.bytes_rx += n as u64;
    }
    pub fn inc_ok(&mut self) {
        self.ok += 1;
    }
    pub fn inc_failed(&mut self) {
        self.failed += 1;
    }
    pub fn transactions(&self) -> u64 {
        self.ok + self.failed
    }

    pub fn log(&self) {
        debug!(
            ok = self.ok,
            failed = self.failed,
            bytes_tx = self.bytes_tx,
            bytes_rx = self.bytes_rx,
            elapsed_ms = self.t0.elapsed().as_millis() as u64,
            "link stats"
        );
    }
}

impl Default for Stats {
    fn default() -> Self {
        Self::new()
    }
}
