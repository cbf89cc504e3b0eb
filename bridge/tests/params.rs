//! Message access: getParam, readMessage, the cursor readers and parseParam.

mod common;

use envcall_bridge::BridgeError;
use envcall_primitives::{ErrorCode, ParamWriter};

use common::*;

const MSG: u64 = 0x400;

fn message() -> Vec<u8> {
    let mut writer = ParamWriter::new();
    writer
        .write_u32(42)
        .write_u64(1 << 40)
        .write_string(b"alice");
    writer.finish()
}

#[test]
fn test_get_param() {
    let (mut vm, _) = vm_with(transaction("wallet", "pay", b"abc"));
    assert_eq!(call_u64(&mut vm, "getParam", &[SCRATCH, 8]), 3);
    assert_eq!(read(&mut vm, SCRATCH, 3), b"abc");
}

#[test]
fn test_get_param_buffer_too_small() {
    let (mut vm, _) = vm_with(transaction("wallet", "pay", b"abcdef"));
    let err = call(&mut vm, "getParam", &[SCRATCH, 2]).unwrap_err();
    assert!(matches!(err, BridgeError::BufferTooSmall { needed: 6, available: 2 }));
    assert_eq!(read(&mut vm, SCRATCH, 2), vec![0, 0]);
}

#[test]
fn test_read_message_and_params_in_order() {
    let msg = message();
    let (mut vm, _) = vm_with(transaction("wallet", "pay", &msg));
    assert_eq!(call_u64(&mut vm, "readMessage", &[MSG, msg.len() as u64]), msg.len() as u64);
    assert_eq!(read(&mut vm, MSG, msg.len() as u64), msg);

    assert_eq!(call_u64(&mut vm, "readInt32Param", &[MSG]), 42);
    assert_eq!(vm.state().param_cursor(), 4);
    assert_eq!(call_u64(&mut vm, "readInt64Param", &[MSG]), 1 << 40);
    let name = call_u64(&mut vm, "readStringParam", &[MSG]);
    assert_eq!(read_c_str(&mut vm, name), "alice");
    assert_eq!(vm.state().param_cursor(), msg.len());
}

#[test]
fn test_read_past_end_keeps_cursor() {
    let msg = message();
    let (mut vm, _) = vm_with(transaction("wallet", "pay", &msg));
    call_u64(&mut vm, "readMessage", &[MSG, msg.len() as u64]);
    call_u64(&mut vm, "readInt32Param", &[MSG]);
    call_u64(&mut vm, "readInt64Param", &[MSG]);
    call_u64(&mut vm, "readStringParam", &[MSG]);

    let err = call(&mut vm, "readInt32Param", &[MSG]).unwrap_err();
    assert_eq!(err.code(), ErrorCode::TruncatedInput);
    assert_eq!(vm.state().param_cursor(), msg.len());
}

#[test]
fn test_read_message_rewinds_cursor() {
    let msg = message();
    let (mut vm, _) = vm_with(transaction("wallet", "pay", &msg));
    call_u64(&mut vm, "readMessage", &[MSG, msg.len() as u64]);
    call_u64(&mut vm, "readInt32Param", &[MSG]);
    call_u64(&mut vm, "readMessage", &[MSG, msg.len() as u64]);
    assert_eq!(vm.state().param_cursor(), 0);
    assert_eq!(call_u64(&mut vm, "readInt32Param", &[MSG]), 42);
}

#[test]
fn test_read_message_length_mismatch() {
    let msg = message();
    let (mut vm, _) = vm_with(transaction("wallet", "pay", &msg));
    let err = call(&mut vm, "readMessage", &[MSG, 3]).unwrap_err();
    assert_eq!(err.code(), ErrorCode::LengthMismatch);
}

#[test]
fn test_read_param_untagged() {
    let (mut vm, _) = vm();
    let err = call(&mut vm, "readInt32Param", &[MSG]).unwrap_err();
    assert!(matches!(err, BridgeError::Untagged(_)));
}

#[test]
fn test_parse_param_array_form() {
    let (mut vm, _) = vm();
    let record = rmp_serde::to_vec(&("bob", 250u32)).unwrap();
    put(&mut vm, SCRATCH, &record);
    assert_eq!(call_u64(&mut vm, "parseParam", &[SCRATCH, record.len() as u64]), 1);
    assert_eq!(call_u64(&mut vm, "parseParam", &[SCRATCH, record.len() as u64 - 1]), 0);
}

#[test]
fn test_parse_param_wide_markers() {
    // array16, str16 and uint32 markers, as contract SDKs emit them
    let record = [
        0xdc, 0x00, 0x02, 0xda, 0x00, 0x03, b'b', b'o', b'b', 0xce, 0x00, 0x00, 0x00, 0xfa,
    ];
    let (mut vm, _) = vm();
    put(&mut vm, SCRATCH, &record);
    assert_eq!(call_u64(&mut vm, "parseParam", &[SCRATCH, record.len() as u64]), 1);
}

#[test]
fn test_parse_param_map_form() {
    let mut record = vec![0x82, 0xa2];
    record.extend_from_slice(b"To");
    record.push(0xa3);
    record.extend_from_slice(b"bob");
    record.push(0xa6);
    record.extend_from_slice(b"Amount");
    record.extend_from_slice(&[0xcc, 0xfa]);
    let (mut vm, _) = vm();
    put(&mut vm, SCRATCH, &record);
    assert_eq!(call_u64(&mut vm, "parseParam", &[SCRATCH, record.len() as u64]), 1);
}

#[test]
fn test_parse_param_rejects_stream_codec() {
    let (mut vm, _) = vm();
    let mut writer = ParamWriter::new();
    writer.write_string(b"bob").write_u32(250);
    let record = writer.finish();
    put(&mut vm, SCRATCH, &record);
    assert_eq!(call_u64(&mut vm, "parseParam", &[SCRATCH, record.len() as u64]), 0);
}
