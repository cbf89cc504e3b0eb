//! `envcall-bridge`: the host function bridge between a contract VM and
//! the chain.
//!
//! Contracts import a fixed set of named host functions. Each call arrives
//! as an [`InvocationFrame`] of 64-bit words and is dispatched by the
//! [`Registry`] to a handler that reads and writes the instance's linear
//! memory through a bounds-checked [`MemoryView`]. Handlers cover:
//!
//! - **Memory:** `strcmp`, `malloc`, `calloc`, `arrayLen`, `memcpy`, `memset`
//! - **Typed values:** `JsonUnmashal`, `JsonMashal`
//! - **Storage:** `getStrValue`, `setStrValue`, `removeStrValue`
//! - **Messages:** `getParam`, `readMessage`, `read*Param`, `parseParam`
//! - **Cross-contract:** `callTrx`, `recvTrx`
//! - **Debug output:** `printi`, `prints`
//!
//! Instances are hosted either natively by an embedding interpreter
//! ([`Vm`]) or under Wasmtime ([`ContractRuntime`]).

pub mod error;
pub mod config;
pub mod memory;
pub mod frame;
pub mod dispatch;
pub mod host_impl;
pub mod handlers;
pub mod registry;
pub mod vm;
pub mod validation;
pub mod linker;
pub mod runtime;

pub use config::BridgeConfig;
pub use dispatch::{HandoffReceiver, SubCall};
pub use error::{BridgeError, RuntimeError};
pub use frame::{HostReturn, InvocationFrame};
pub use host_impl::{HostCall, VmState};
pub use memory::{LinearMemory, MemoryView, TypeTagTable};
pub use registry::{HostFunction, HostHandler, Registry};
pub use runtime::{ContractRuntime, ExecutionOutcome};
pub use vm::Vm;
