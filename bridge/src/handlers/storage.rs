//! `getStrValue`, `setStrValue`, `removeStrValue`.
//!
//! Store failures are a status for the contract, not an abort: they log and
//! return 0.

use tracing::{debug, warn};

use crate::error::BridgeError;
use crate::frame::HostReturn;
use crate::host_impl::HostCall;

/// Read `(contract, object, key)` into `[buf, buf+buf_len)`.
///
/// Returns the value length, or 0 when the key is absent or the value does
/// not fit. Nothing is written in either case.
pub fn get_str_value(call: &mut HostCall<'_>) -> Result<HostReturn, BridgeError> {
    let [c_pos, c_len, o_pos, o_len, k_pos, k_len, buf, buf_len] =
        call.frame.args::<8>("getStrValue")?;
    let contract = call.memory.read(c_pos, c_len)?.to_vec();
    let object = call.memory.read(o_pos, o_len)?.to_vec();
    let key = call.memory.read(k_pos, k_len)?.to_vec();
    call.memory.check(buf, buf_len)?;

    let store = &call.state.contract().store;
    let value = match store.get_str_value(&contract, &object, &key) {
        Ok(value) => value,
        Err(err) if err.is_not_found() => {
            debug!("getStrValue miss");
            return Ok(HostReturn::U64(0));
        }
        Err(err) => {
            warn!(%err, "getStrValue store failure");
            return Ok(HostReturn::U64(0));
        }
    };
    if value.len() as u64 > buf_len {
        debug!(needed = value.len(), available = buf_len, "getStrValue buffer too small");
        return Ok(HostReturn::U64(0));
    }
    call.memory.write(buf, &value)?;
    Ok(HostReturn::U64(value.len() as u64))
}

/// Write under the running contract's namespace; 1 on success, 0 otherwise.
pub fn set_str_value(call: &mut HostCall<'_>) -> Result<HostReturn, BridgeError> {
    let [o_pos, o_len, k_pos, k_len, v_pos, v_len] = call.frame.args::<6>("setStrValue")?;
    let object = call.memory.read(o_pos, o_len)?.to_vec();
    let key = call.memory.read(k_pos, k_len)?.to_vec();
    let value = call.memory.read(v_pos, v_len)?.to_vec();

    let ctx = call.state.contract();
    let stored = ctx
        .store
        .set_str_value(ctx.contract().as_bytes(), &object, &key, &value);
    Ok(HostReturn::U64(status("setStrValue", stored)))
}

/// Delete under the running contract's namespace; 1 on success, 0 otherwise.
pub fn remove_str_value(call: &mut HostCall<'_>) -> Result<HostReturn, BridgeError> {
    let [o_pos, o_len, k_pos, k_len] = call.frame.args::<4>("removeStrValue")?;
    let object = call.memory.read(o_pos, o_len)?.to_vec();
    let key = call.memory.read(k_pos, k_len)?.to_vec();

    let ctx = call.state.contract();
    let removed = ctx
        .store
        .remove_str_value(ctx.contract().as_bytes(), &object, &key);
    Ok(HostReturn::U64(status("removeStrValue", removed)))
}

fn status(func: &str, result: Result<(), envcall_hostapi::HostError>) -> u64 {
    match result {
        Ok(()) => 1,
        Err(err) => {
            warn!(func, %err, "contract store failure");
            0
        }
    }
}
