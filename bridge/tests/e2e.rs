//! End-to-end tests: contract modules in WebAssembly text format running
//! under Wasmtime with the host functions linked.

mod common;

use std::sync::Arc;
use std::time::Duration;

use envcall_bridge::{BridgeConfig, BridgeError, ContractRuntime, RuntimeError, VmState};
use envcall_hostapi::{ContractStore, MemContractStore};
use envcall_primitives::ContextEnvelope;

use common::*;

fn runtime(wat: &str) -> ContractRuntime {
    ContractRuntime::new(wat.as_bytes(), BridgeConfig::default()).unwrap()
}

const DEPOSIT: &str = r#"
    (module
        (import "env" "setStrValue" (func $set (param i64 i64 i64 i64 i64 i64) (result i64)))
        (import "env" "printi" (func $printi (param i64) (result i64)))
        (memory (export "memory") 1)
        (data (i32.const 0) "balances")
        (data (i32.const 16) "alice")
        (data (i32.const 32) "100")
        (func (export "deposit")
            (drop (call $printi
                (call $set (i64.const 0) (i64.const 8) (i64.const 16) (i64.const 5)
                           (i64.const 32) (i64.const 3)))))
    )
"#;

#[test]
fn test_storage_write_from_wasm() {
    let store = Arc::new(MemContractStore::new());
    let ctx = context(Arc::clone(&store), transaction("vault", "deposit", b""));
    let outcome = runtime(DEPOSIT).execute(ctx).unwrap();

    assert_eq!(store.get_str_value(b"vault", b"balances", b"alice").unwrap(), b"100");
    assert!(outcome.sub_calls.is_empty());
    assert!(outcome.fuel_used > 0);
}

const FORWARD: &str = r#"
    (module
        (import "env" "malloc" (func $malloc (param i64) (result i64)))
        (import "env" "callTrx" (func $callTrx (param i64 i64 i64 i64) (result i64)))
        (import "env" "recvTrx" (func $recvTrx (param i64 i64) (result i64)))
        (import "env" "getParam" (func $getParam (param i64 i64) (result i64)))
        (memory (export "memory") 1)
        (data (i32.const 0) "bank\00")
        (data (i32.const 16) "transfer\00")
        (data (i32.const 32) "xyz")
        (func $dup (param $src i32) (param $len i32) (result i64)
            (local $dst i64)
            (local.set $dst (call $malloc (i64.extend_i32_u (local.get $len))))
            (memory.copy (i32.wrap_i64 (local.get $dst)) (local.get $src) (local.get $len))
            (local.get $dst))
        (func (export "pay")
            (drop (call $callTrx
                (call $dup (i32.const 0) (i32.const 5))
                (call $dup (i32.const 16) (i32.const 9))
                (i64.const 32)
                (i64.const 3))))
        (func (export "relay")
            (local $len i64)
            (local.set $len (call $getParam (i64.const 1024) (i64.const 4096)))
            (drop (call $recvTrx (i64.const 1024) (local.get $len))))
    )
"#;

#[test]
fn test_call_trx_from_wasm() {
    let store = Arc::new(MemContractStore::new());
    let ctx = context(store, transaction("wallet", "pay", b""));
    let outcome = runtime(FORWARD).execute(ctx).unwrap();

    assert_eq!(outcome.sub_calls.len(), 1);
    let sub = &outcome.sub_calls[0].transaction;
    assert_eq!(sub.sender, "wallet");
    assert_eq!(sub.contract, "bank");
    assert_eq!(sub.method, "transfer");
    assert_eq!(&sub.param[..], b"xyz");
}

#[test]
fn test_recv_trx_from_wasm() {
    let forwarded = ContextEnvelope {
        trx: transaction("bank", "transfer", b"1"),
    }
    .to_json()
    .unwrap();
    let store = Arc::new(MemContractStore::new());
    let mut state = VmState::new(context(store, transaction("wallet", "relay", &forwarded)));
    let rx = state.attach_handoff();

    runtime(FORWARD).execute_with(state).unwrap();
    let got = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(&got[..], &forwarded[..]);
}

#[test]
fn test_host_error_aborts_contract() {
    let wat = r#"
        (module
            (import "env" "memcpy" (func $memcpy (param i64 i64 i64) (result i64)))
            (memory (export "memory") 1)
            (func (export "run")
                (drop (call $memcpy (i64.const 0) (i64.const 2) (i64.const 4))))
        )
    "#;
    let ctx = context(Arc::new(MemContractStore::new()), transaction("c", "run", b""));
    let err = runtime(wat).execute(ctx).unwrap_err();
    assert!(
        matches!(err, RuntimeError::HostCall(BridgeError::Overlap { .. })),
        "got {err}"
    );
}

#[test]
fn test_missing_method() {
    let ctx = context(Arc::new(MemContractStore::new()), transaction("c", "absent", b""));
    let err = runtime(DEPOSIT).execute(ctx).unwrap_err();
    assert!(matches!(err, RuntimeError::MissingMethod(ref m) if m == "absent"));
}

#[test]
fn test_fuel_exhaustion() {
    let wat = r#"
        (module
            (memory (export "memory") 1)
            (func (export "spin") (loop $l (br $l)))
        )
    "#;
    let config = BridgeConfig {
        fuel_limit: 10_000,
        ..BridgeConfig::default()
    };
    let rt = ContractRuntime::new(wat.as_bytes(), config).unwrap();
    let ctx = context(Arc::new(MemContractStore::new()), transaction("c", "spin", b""));
    assert!(matches!(rt.execute(ctx), Err(RuntimeError::FuelExhausted)));
}

#[test]
fn test_rejects_unlinked_import() {
    let wat = r#"
        (module
            (import "env" "system" (func (param i64) (result i64)))
            (memory (export "memory") 1)
        )
    "#;
    let err = ContractRuntime::new(wat.as_bytes(), BridgeConfig::default()).err().unwrap();
    assert!(matches!(err, RuntimeError::ValidationError(_)));
}
