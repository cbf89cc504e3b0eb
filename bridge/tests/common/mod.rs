//! Shared test helpers for integration tests.
//!
//! Provides a small natively hosted VM, contexts backed by the in-memory
//! store, and shorthands for issuing host calls and seeding memory.

#![allow(dead_code)]

use std::sync::Arc;

use bytes::Bytes;
use envcall_bridge::{BridgeConfig, BridgeError, InvocationFrame, Vm};
use envcall_hostapi::{ContractContext, MemContractStore, NoRoles, OperandStack, StackValue};
use envcall_primitives::Transaction;

/// Start of the guest scratch area used by tests.
pub const SCRATCH: u64 = 0x100;

/// Base of the host allocation region for [`test_config`].
pub const HOST_REGION: u64 = 65536;

/// Two pages: guest data below 64 KiB, host allocations above.
pub fn test_config() -> BridgeConfig {
    BridgeConfig {
        memory_pages: 2,
        host_alloc_pages: 1,
        ..BridgeConfig::default()
    }
}

pub fn transaction(contract: &str, method: &str, param: &[u8]) -> Transaction {
    Transaction {
        version: 1,
        cursor_num: 7,
        cursor_label: 9,
        lifetime: 1_700_000_000,
        sender: "alice".into(),
        contract: contract.into(),
        method: method.into(),
        param: Bytes::copy_from_slice(param),
        ..Transaction::default()
    }
}

pub fn context(store: Arc<MemContractStore>, trx: Transaction) -> Arc<ContractContext> {
    Arc::new(ContractContext::new(Arc::new(NoRoles), store, trx))
}

/// A VM running `wallet.pay` over a fresh store.
pub fn vm() -> (Vm, Arc<MemContractStore>) {
    vm_with(transaction("wallet", "pay", b""))
}

pub fn vm_with(trx: Transaction) -> (Vm, Arc<MemContractStore>) {
    let store = Arc::new(MemContractStore::new());
    let vm = Vm::new(&test_config(), context(Arc::clone(&store), trx));
    (vm, store)
}

/// Call `name` expecting a return; yields whatever was pushed.
pub fn call(vm: &mut Vm, name: &str, params: &[u64]) -> Result<Option<StackValue>, BridgeError> {
    let mut stack = OperandStack::new();
    vm.call(name, InvocationFrame::new(params.to_vec(), true), &mut stack)?;
    Ok(stack.pop())
}

pub fn call_u64(vm: &mut Vm, name: &str, params: &[u64]) -> u64 {
    match call(vm, name, params).unwrap() {
        Some(StackValue::U64(v)) => v,
        other => panic!("{name} pushed {other:?}, expected a u64"),
    }
}

pub fn call_u32(vm: &mut Vm, name: &str, params: &[u64]) -> u32 {
    match call(vm, name, params).unwrap() {
        Some(StackValue::U32(v)) => v,
        other => panic!("{name} pushed {other:?}, expected a u32"),
    }
}

/// Write raw bytes at `addr`.
pub fn put(vm: &mut Vm, addr: u64, data: &[u8]) {
    vm.view().write(addr, data).unwrap();
}

/// Store a NUL-terminated, tagged string and return its address.
pub fn put_str(vm: &mut Vm, text: &str) -> u64 {
    vm.view().store_str(text.as_bytes()).unwrap()
}

pub fn read(vm: &mut Vm, addr: u64, len: u64) -> Vec<u8> {
    vm.view().read(addr, len).unwrap().to_vec()
}

pub fn read_c_str(vm: &mut Vm, addr: u64) -> String {
    String::from_utf8(vm.view().read_c_str(addr).unwrap().to_vec()).unwrap()
}
