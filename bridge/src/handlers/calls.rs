//! Cross-contract calls: `callTrx` queues a sub-transaction, `recvTrx`
//! forwards a serialized call context to the attached consumer.

use std::sync::Arc;

use bytes::Bytes;
use envcall_primitives::types::hash_to_hex;
use envcall_primitives::ContextEnvelope;
use tracing::{debug, warn};

use super::utf8;
use crate::dispatch::SubCall;
use crate::error::BridgeError;
use crate::frame::HostReturn;
use crate::host_impl::HostCall;

pub fn call_trx(call: &mut HostCall<'_>) -> Result<HostReturn, BridgeError> {
    let [contract_addr, method_addr, param_pos, param_len] = call.frame.args::<4>("callTrx")?;
    let contract = utf8(call.memory.read_c_str(contract_addr)?, "contract name")?.to_string();
    let method = utf8(call.memory.read_c_str(method_addr)?, "method name")?.to_string();
    let param = Bytes::copy_from_slice(call.memory.read(param_pos, param_len)?);

    let parent = call.state.contract();
    let transaction = parent.trx.sub_call(contract, method, param);
    let context = Arc::new(parent.child(transaction.clone()));
    debug!(
        sender = %transaction.sender,
        contract = %transaction.contract,
        method = %transaction.method,
        digest = %hash_to_hex(&transaction.digest()),
        "queued sub-call"
    );
    call.state.queue_sub_call(SubCall {
        context,
        transaction,
    });
    Ok(HostReturn::U32(0))
}

/// 1 when the context was handed off, 0 when it was malformed or dropped.
pub fn recv_trx(call: &mut HostCall<'_>) -> Result<HostReturn, BridgeError> {
    let [pos, len] = call.frame.args::<2>("recvTrx")?;
    let raw = Bytes::copy_from_slice(call.memory.read(pos, len)?);

    match ContextEnvelope::from_json(&raw) {
        Ok(envelope) => debug!(
            contract = %envelope.trx.contract,
            method = %envelope.trx.method,
            "received call context"
        ),
        Err(err) => {
            warn!(%err, "discarding malformed call context");
            return Ok(HostReturn::U32(0));
        }
    }

    match call.state.handoff() {
        Some(sender) => {
            sender.send(raw)?;
            Ok(HostReturn::U32(1))
        }
        None => {
            warn!("no call context consumer attached; dropping");
            Ok(HostReturn::U32(0))
        }
    }
}
