//! `JsonUnmashal` and `JsonMashal`: typed-value documents to and from
//! linear memory.
//!
//! A document unpacks into a blob of inline slots, one per parameter:
//! `int` is a 4-byte LE value, `int64` an 8-byte LE value, `string` and
//! `int_array` a 4-byte address and `int64_array` an 8-byte address of a
//! freshly allocated, tagged region.

use std::num::ParseIntError;
use std::str::FromStr;

use envcall_primitives::typed_value::{
    decode_i32_array, decode_i64_array, encode_i32_array, encode_i64_array, format_list,
    parse_list,
};
use envcall_primitives::{ParamList, ParamType, SemanticType, TypedValue};
use tracing::warn;

use super::addr32;
use crate::error::BridgeError;
use crate::frame::HostReturn;
use crate::host_impl::HostCall;
use crate::memory::MemoryView;

/// Unpack the document at `json_addr` into a blob written at `addr`.
///
/// Returns the blob length. A blob whose length differs from the declared
/// `size` is still written; the mismatch is logged and counted.
pub fn json_unmarshal(call: &mut HostCall<'_>) -> Result<HostReturn, BridgeError> {
    let [addr, size, json_addr] = call.frame.args::<3>("JsonUnmashal")?;
    let doc = ParamList::from_json(call.memory.read_c_str(json_addr)?)?;

    // Resolve every type before allocating anything.
    let types = doc
        .params
        .iter()
        .map(|param| {
            param
                .param_type()
                .ok_or_else(|| BridgeError::UnsupportedType(param.ty.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let encoded: usize = types.iter().map(|ty| ty.inline_width()).sum();

    let mut blob = Vec::with_capacity(encoded);
    for (param, ty) in doc.params.iter().zip(types) {
        pack_param(&mut call.memory, ty, &param.val, &mut blob)?;
    }

    if encoded as u64 != size {
        call.state.note_size_mismatch();
        warn!(declared = size, encoded, "typed-value blob size mismatch");
    }
    call.memory.write(addr, &blob)?;
    Ok(HostReturn::U64(blob.len() as u64))
}

fn pack_param(
    memory: &mut MemoryView<'_>,
    ty: ParamType,
    val: &str,
    blob: &mut Vec<u8>,
) -> Result<(), BridgeError> {
    match ty {
        ParamType::Int => blob.extend(parse_number::<i32>(val)?.to_le_bytes()),
        ParamType::Int64 => blob.extend(parse_number::<i64>(val)?.to_le_bytes()),
        ParamType::String => {
            let at = memory.store_str(val.as_bytes())?;
            blob.extend(addr32(at)?.to_le_bytes());
        }
        ParamType::IntArray => {
            let values = parse_array::<i32>(val)?;
            let at = memory.store_bytes(&encode_i32_array(&values), SemanticType::Int32)?;
            blob.extend(addr32(at)?.to_le_bytes());
        }
        ParamType::Int64Array => {
            let values = parse_array::<i64>(val)?;
            let at = memory.store_bytes(&encode_i64_array(&values), SemanticType::Int64)?;
            blob.extend(at.to_le_bytes());
        }
    }
    Ok(())
}

/// Render `val` as a one-parameter document of the type named at `type_addr`.
///
/// Scalars are taken from `val` itself; strings and arrays are read from the
/// tagged region `val` points at. Returns the address of the NUL-terminated
/// document.
pub fn json_marshal(call: &mut HostCall<'_>) -> Result<HostReturn, BridgeError> {
    let [val, type_addr] = call.frame.args::<2>("JsonMashal")?;
    let name = String::from_utf8_lossy(call.memory.read_c_str(type_addr)?).into_owned();
    let ty = ParamType::parse(&name).ok_or(BridgeError::UnsupportedType(name))?;

    let text = match ty {
        ParamType::Int => (val as u32 as i32).to_string(),
        ParamType::Int64 => (val as i64).to_string(),
        ParamType::String => String::from_utf8_lossy(call.memory.read_c_str(val)?).into_owned(),
        ParamType::IntArray => format_list(decode_i32_array(call.memory.read_typed(val)?)),
        ParamType::Int64Array => format_list(decode_i64_array(call.memory.read_typed(val)?)),
    };

    let doc = TypedValue::new(ty, text).to_json()?;
    let at = call.memory.store_str(&doc)?;
    Ok(HostReturn::U64(at))
}

fn parse_number<T: FromStr<Err = ParseIntError>>(text: &str) -> Result<T, BridgeError> {
    text.trim().parse().map_err(|source| BridgeError::InvalidNumber {
        text: text.to_string(),
        source,
    })
}

fn parse_array<T: FromStr<Err = ParseIntError>>(text: &str) -> Result<Vec<T>, BridgeError> {
    parse_list(text).map_err(|source| BridgeError::InvalidNumber {
        text: text.to_string(),
        source,
    })
}
