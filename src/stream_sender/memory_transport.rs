use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::Transport;

/// In-process transport: everything written lands in a shared buffer.
///
/// With a byte budget it behaves like a peer that stops reading: once the
/// budget is spent every `write` returns 0.
#[derive(Clone, Default)]
pub struct MemoryTransport {
    written: Arc<Mutex<Vec<u8>>>,
    budget: Option<usize>,
    shutdowns: Arc<AtomicUsize>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_budget(budget: usize) -> Self {
        Self {
            budget: Some(budget),
            ..Self::default()
        }
    }

    /// Copy of every byte accepted so far.
    pub fn written(&self) -> Vec<u8> {
        self.written.lock().map(|w| w.clone()).unwrap_or_default()
    }

    pub fn shutdowns(&self) -> usize {
        self.shutdowns.load(Ordering::SeqCst)
    }
}

impl Write for MemoryTransport {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.budget.map_or(buf.len(), |b| b.min(buf.len()));
        if let Some(b) = self.budget.as_mut() {
            *b -= n;
        }
        self.written
            .lock()
            .map_err(|_| io::Error::other("memory transport poisoned"))?
            .extend_from_slice(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Transport for MemoryTransport {
    fn shutdown(&mut self) -> io::Result<()> {
        self.shutdowns.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
