//! `strcmp`, `malloc`, `calloc`, `arrayLen`, `memcpy`, `memset`.

use envcall_primitives::SemanticType;

use super::host_size;
use crate::error::BridgeError;
use crate::frame::HostReturn;
use crate::host_impl::HostCall;

/// 0 when both tagged strings are equal up to their first NUL, 1 otherwise.
pub fn strcmp(call: &mut HostCall<'_>) -> Result<HostReturn, BridgeError> {
    let [a, b] = call.frame.args::<2>("strcmp")?;
    let equal = a == b || call.memory.read_c_str(a)? == call.memory.read_c_str(b)?;
    Ok(HostReturn::U64(if equal { 0 } else { 1 }))
}

pub fn malloc(call: &mut HostCall<'_>) -> Result<HostReturn, BridgeError> {
    let [size] = call.frame.args::<1>("malloc")?;
    let addr = call.memory.allocate(host_size(size), SemanticType::Unknown)?;
    Ok(HostReturn::U64(addr))
}

/// `count * size` zeroed bytes.
pub fn calloc(call: &mut HostCall<'_>) -> Result<HostReturn, BridgeError> {
    let [count, size] = call.frame.args::<2>("calloc")?;
    let total = count.checked_mul(size).map_or(usize::MAX, host_size);
    let addr = call.memory.allocate(total, SemanticType::Unknown)?;
    call.memory.fill(addr, 0, total as u64)?;
    Ok(HostReturn::U64(addr))
}

pub fn array_len(call: &mut HostCall<'_>) -> Result<HostReturn, BridgeError> {
    let [addr] = call.frame.args::<1>("arrayLen")?;
    Ok(HostReturn::U64(call.memory.length_of(addr)))
}

pub fn memcpy(call: &mut HostCall<'_>) -> Result<HostReturn, BridgeError> {
    let [dst, src, len] = call.frame.args::<3>("memcpy")?;
    call.memory.copy(dst, src, len)?;
    Ok(HostReturn::U64(1))
}

pub fn memset(call: &mut HostCall<'_>) -> Result<HostReturn, BridgeError> {
    let [dst, value, len] = call.frame.args::<3>("memset")?;
    call.memory.fill(dst, value as u8, len)?;
    Ok(HostReturn::U64(1))
}
