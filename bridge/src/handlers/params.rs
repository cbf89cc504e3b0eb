//! Message access: `getParam`, `readMessage`, the `read*Param` cursor readers
//! and `parseParam`.

use envcall_primitives::{ParamReader, SemanticType};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::BridgeError;
use crate::frame::HostReturn;
use crate::host_impl::HostCall;

/// Copy the transaction parameter into `[buf, buf+buf_len)`.
pub fn get_param(call: &mut HostCall<'_>) -> Result<HostReturn, BridgeError> {
    let [buf, buf_len] = call.frame.args::<2>("getParam")?;
    let param = call.state.contract().trx.param.clone();
    let needed = param.len() as u64;
    if buf_len < needed {
        return Err(BridgeError::BufferTooSmall {
            needed,
            available: buf_len,
        });
    }
    call.memory.write(buf, &param)?;
    Ok(HostReturn::U64(needed))
}

/// Copy the current message to `addr` and rewind the parameter cursor.
pub fn read_message(call: &mut HostCall<'_>) -> Result<HostReturn, BridgeError> {
    let [addr, len] = call.frame.args::<2>("readMessage")?;
    let message = call.state.message_bytes()?;
    if len != message.len() as u64 {
        return Err(BridgeError::LengthMismatch {
            expected: message.len() as u64,
            got: len,
        });
    }
    call.memory.ingest(addr, &message, SemanticType::Unknown)?;
    call.state.reset_param_cursor();
    Ok(HostReturn::U64(len))
}

pub fn read_int32_param(call: &mut HostCall<'_>) -> Result<HostReturn, BridgeError> {
    let [addr] = call.frame.args::<1>("readInt32Param")?;
    let mut reader = ParamReader::at(call.memory.read_typed(addr)?, call.state.param_cursor());
    let value = reader.read_u32()?;
    call.state.set_param_cursor(reader.position());
    Ok(HostReturn::U64(value as u64))
}

pub fn read_int64_param(call: &mut HostCall<'_>) -> Result<HostReturn, BridgeError> {
    let [addr] = call.frame.args::<1>("readInt64Param")?;
    let mut reader = ParamReader::at(call.memory.read_typed(addr)?, call.state.param_cursor());
    let value = reader.read_u64()?;
    call.state.set_param_cursor(reader.position());
    Ok(HostReturn::U64(value))
}

/// Decode a length-prefixed string at the cursor into a fresh tagged region.
pub fn read_string_param(call: &mut HostCall<'_>) -> Result<HostReturn, BridgeError> {
    let [addr] = call.frame.args::<1>("readStringParam")?;
    let mut reader = ParamReader::at(call.memory.read_typed(addr)?, call.state.param_cursor());
    let text = reader.read_string()?.to_vec();
    let next = reader.position();
    let out = call.memory.store_str(&text)?;
    call.state.set_param_cursor(next);
    Ok(HostReturn::U64(out))
}

/// A transfer record as contracts serialize it with msgpack. Both the array
/// form and the field-keyed map form decode.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TransferParam {
    to: String,
    amount: u32,
}

/// Decode a msgpack transfer record; 1 on success, 0 otherwise.
pub fn parse_param(call: &mut HostCall<'_>) -> Result<HostReturn, BridgeError> {
    let [pos, len] = call.frame.args::<2>("parseParam")?;
    match rmp_serde::from_slice::<TransferParam>(call.memory.read(pos, len)?) {
        Ok(TransferParam { to, amount }) => {
            debug!(%to, amount, "decoded transfer parameter");
            Ok(HostReturn::U64(1))
        }
        Err(err) => {
            warn!(%err, "malformed transfer parameter");
            Ok(HostReturn::U64(0))
        }
    }
}
