//! Sub-call queue and the synchronous call-context handoff.
//!
//! `callTrx` appends to a per-instance [`SubCallQueue`]; the embedding drains
//! it after the contract returns. `recvTrx` forwards raw call contexts over a
//! rendezvous-style channel of capacity one to a single consumer.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SyncSender, TryRecvError};
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use envcall_hostapi::ContractContext;
use envcall_primitives::Transaction;

use crate::error::BridgeError;

/// Slots in the handoff channel.
pub const HANDOFF_CAPACITY: usize = 1;

/// A nested contract invocation requested by a running contract.
#[derive(Debug, Clone)]
pub struct SubCall {
    /// Context the sub-call will execute under.
    pub context: Arc<ContractContext>,
    pub transaction: Transaction,
}

/// Sub-calls in the order they were issued.
#[derive(Debug, Default)]
pub struct SubCallQueue {
    entries: Vec<SubCall>,
}

impl SubCallQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, call: SubCall) {
        self.entries.push(call);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SubCall> {
        self.entries.iter()
    }

    /// Remove and return every queued sub-call.
    pub fn drain(&mut self) -> Vec<SubCall> {
        std::mem::take(&mut self.entries)
    }
}

/// Producer half of the handoff, held by the VM.
#[derive(Debug, Clone)]
pub struct HandoffSender(SyncSender<Bytes>);

impl HandoffSender {
    /// Block until the consumer takes `context`.
    pub fn send(&self, context: Bytes) -> Result<(), BridgeError> {
        self.0.send(context).map_err(|_| BridgeError::HandoffClosed)
    }
}

/// Consumer half of the handoff.
#[derive(Debug)]
pub struct HandoffReceiver(Receiver<Bytes>);

impl HandoffReceiver {
    /// Next forwarded context, or `None` once every sender is gone.
    pub fn recv(&self) -> Option<Bytes> {
        self.0.recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Result<Bytes, RecvTimeoutError> {
        self.0.recv_timeout(timeout)
    }

    pub fn try_recv(&self) -> Result<Bytes, TryRecvError> {
        self.0.try_recv()
    }
}

/// Create a connected handoff pair.
pub fn handoff() -> (HandoffSender, HandoffReceiver) {
    let (tx, rx) = mpsc::sync_channel(HANDOFF_CAPACITY);
    (HandoffSender(tx), HandoffReceiver(rx))
}
