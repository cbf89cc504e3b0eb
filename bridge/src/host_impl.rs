//! Mutable per-instance state reachable from host functions.

use std::sync::Arc;

use bytes::Bytes;
use envcall_hostapi::{ContractContext, HostError, MessageSource};

use crate::dispatch::{handoff, HandoffReceiver, HandoffSender, SubCall, SubCallQueue};
use crate::frame::InvocationFrame;
use crate::memory::MemoryView;

/// State one VM instance carries across host calls.
pub struct VmState {
    contract: Arc<ContractContext>,
    message: Arc<dyn MessageSource + Send + Sync>,
    /// Read position of the `read*Param` cursor within the current message.
    param_cursor: usize,
    sub_calls: SubCallQueue,
    handoff: Option<HandoffSender>,
    size_mismatch_warnings: u64,
}

impl VmState {
    /// State for `contract`, reading messages from its transaction.
    pub fn new(contract: Arc<ContractContext>) -> Self {
        let message: Arc<dyn MessageSource + Send + Sync> = contract.clone();
        Self {
            contract,
            message,
            param_cursor: 0,
            sub_calls: SubCallQueue::new(),
            handoff: None,
            size_mismatch_warnings: 0,
        }
    }

    pub fn with_message_source(mut self, source: Arc<dyn MessageSource + Send + Sync>) -> Self {
        self.message = source;
        self
    }

    pub fn contract(&self) -> &ContractContext {
        &self.contract
    }

    pub fn contract_arc(&self) -> Arc<ContractContext> {
        Arc::clone(&self.contract)
    }

    pub fn message_bytes(&self) -> Result<Bytes, HostError> {
        self.message.current_message_bytes()
    }

    pub fn param_cursor(&self) -> usize {
        self.param_cursor
    }

    pub(crate) fn set_param_cursor(&mut self, pos: usize) {
        self.param_cursor = pos;
    }

    /// Rewind the parameter cursor to the start of the message.
    pub fn reset_param_cursor(&mut self) {
        self.param_cursor = 0;
    }

    pub fn sub_calls(&self) -> &SubCallQueue {
        &self.sub_calls
    }

    pub(crate) fn queue_sub_call(&mut self, call: SubCall) {
        self.sub_calls.push(call);
    }

    pub fn take_sub_calls(&mut self) -> Vec<SubCall> {
        self.sub_calls.drain()
    }

    /// Connect a consumer for `recvTrx`, replacing any previous one.
    pub fn attach_handoff(&mut self) -> HandoffReceiver {
        let (tx, rx) = handoff();
        self.handoff = Some(tx);
        rx
    }

    pub fn detach_handoff(&mut self) {
        self.handoff = None;
    }

    pub(crate) fn handoff(&self) -> Option<&HandoffSender> {
        self.handoff.as_ref()
    }

    /// How many `JsonUnmashal` calls saw a size different from the encoding.
    pub fn size_mismatch_warnings(&self) -> u64 {
        self.size_mismatch_warnings
    }

    pub(crate) fn note_size_mismatch(&mut self) {
        self.size_mismatch_warnings += 1;
    }
}

/// Everything one host function invocation may touch.
pub struct HostCall<'a> {
    pub memory: MemoryView<'a>,
    pub frame: &'a mut InvocationFrame,
    pub state: &'a mut VmState,
}
