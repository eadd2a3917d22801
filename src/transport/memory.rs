//! In-memory transport.
//!
//! Records every block written and answers reads from a queue of scripted
//! replies. A [`MemoryHandle`] shares the same state so callers can inspect
//! traffic after the adapter has been moved into a printer.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use super::Adapter;
use crate::error::{Result, TintaError};

/// Operation a [`MemoryAdapter`] can be told to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fail {
    Open,
    Write,
    Close,
}

#[derive(Debug, Default)]
struct State {
    opened: bool,
    closed: bool,
    written: Vec<Vec<u8>>,
    replies: VecDeque<Vec<u8>>,
    fail: Vec<Fail>,
}

#[derive(Debug, Default)]
pub struct MemoryAdapter {
    state: Arc<Mutex<State>>,
}

/// Shared view of a [`MemoryAdapter`]'s state.
#[derive(Debug, Clone)]
pub struct MemoryHandle {
    state: Arc<Mutex<State>>,
}

fn lock(state: &Mutex<State>) -> MutexGuard<'_, State> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MemoryAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&self) -> MemoryHandle {
        MemoryHandle {
            state: Arc::clone(&self.state),
        }
    }

    /// Queue a reply for a later [`Adapter::read`].
    pub fn with_reply(self, reply: &[u8]) -> Self {
        self.handle().push_reply(reply);
        self
    }

    /// Make the given operation fail with a transport error.
    pub fn failing(self, op: Fail) -> Self {
        lock(&self.state).fail.push(op);
        self
    }

    fn check(&self, op: Fail) -> Result<()> {
        if lock(&self.state).fail.contains(&op) {
            return Err(TintaError::Transport(format!("{:?} failed", op).to_lowercase()));
        }
        Ok(())
    }
}

impl MemoryHandle {
    /// Every block written so far, in order.
    pub fn writes(&self) -> Vec<Vec<u8>> {
        lock(&self.state).written.clone()
    }

    /// All written bytes concatenated.
    pub fn bytes(&self) -> Vec<u8> {
        lock(&self.state).written.concat()
    }

    pub fn push_reply(&self, reply: &[u8]) {
        lock(&self.state).replies.push_back(reply.to_vec());
    }

    pub fn is_open(&self) -> bool {
        let state = lock(&self.state);
        state.opened && !state.closed
    }

    pub fn is_closed(&self) -> bool {
        lock(&self.state).closed
    }
}

#[async_trait]
impl Adapter for MemoryAdapter {
    async fn open(&mut self) -> Result<()> {
        self.check(Fail::Open)?;
        let mut state = lock(&self.state);
        state.opened = true;
        state.closed = false;
        Ok(())
    }

    async fn write(&mut self, data: &[u8]) -> Result<()> {
        self.check(Fail::Write)?;
        lock(&self.state).written.push(data.to_vec());
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        self.check(Fail::Close)?;
        lock(&self.state).closed = true;
        Ok(())
    }

    async fn read(&mut self) -> Result<Vec<u8>> {
        let mut state = lock(&self.state);
        if state.closed {
            return Err(TintaError::Transport("adapter closed".into()));
        }
        state
            .replies
            .pop_front()
            .ok_or_else(|| TintaError::Transport("no data available".into()))
    }
}
