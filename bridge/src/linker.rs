//! Host function registration via the Wasmtime linker.
//!
//! Every built-in bound in the registry is linked under the `env` module
//! with the signature `(i64 × arity) -> i64`. Each import:
//! 1. Extracts memory and [`WasmHost`] from the Caller
//! 2. Builds an invocation frame from the i64 arguments
//! 3. Dispatches through the registry against a borrowed memory view
//! 4. Writes the pushed result, or 0, to the single i64 result

use std::sync::Arc;

use anyhow::anyhow;
use envcall_hostapi::{BumpAllocator, Interpreter, ResumeContext};
use wasmtime::{Caller, Engine, FuncType, Linker, Memory, Val, ValType};

use crate::error::RuntimeError;
use crate::frame::InvocationFrame;
use crate::host_impl::{HostCall, VmState};
use crate::memory::{MemoryView, TypeTagTable};
use crate::registry::{HostFunction, Registry};

/// Import module contracts link host functions from.
pub const HOST_MODULE: &str = "env";

/// Store data for a Wasmtime-hosted contract instance.
pub struct WasmHost {
    pub(crate) tags: TypeTagTable,
    pub(crate) allocator: BumpAllocator,
    pub(crate) state: VmState,
    registry: Arc<Registry>,
}

impl WasmHost {
    /// The allocator starts empty; the runtime installs the real region once
    /// memory has been grown.
    pub fn new(state: VmState, registry: Arc<Registry>) -> Self {
        Self {
            tags: TypeTagTable::new(),
            allocator: BumpAllocator::new(0, 0),
            state,
            registry,
        }
    }

    pub fn state(&self) -> &VmState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut VmState {
        &mut self.state
    }

    pub fn tags(&self) -> &TypeTagTable {
        &self.tags
    }

    pub fn into_state(self) -> VmState {
        self.state
    }
}

/// Receives the single result of a host call made from Wasm.
///
/// Wasmtime owns the guest's execution state, so there is nothing to restore.
#[derive(Debug, Default)]
struct ReturnSlot {
    value: u64,
}

impl Interpreter for ReturnSlot {
    fn push_u32(&mut self, value: u32) {
        self.value = value as u64;
    }

    fn push_u64(&mut self, value: u64) {
        self.value = value;
    }

    fn restore_context(&mut self, _context: ResumeContext) {}
}

fn get_memory(caller: &mut Caller<'_, WasmHost>) -> Option<Memory> {
    caller.get_export("memory").and_then(|e| e.into_memory())
}

/// The Wasm signature of `func`.
pub fn host_func_type(engine: &Engine, func: HostFunction) -> FuncType {
    FuncType::new(
        engine,
        std::iter::repeat(ValType::I64).take(func.arity()),
        [ValType::I64],
    )
}

/// Link every built-in bound in `registry`.
pub fn link_host_functions(
    linker: &mut Linker<WasmHost>,
    registry: &Registry,
) -> Result<(), RuntimeError> {
    let engine = linker.engine().clone();
    for func in registry.builtins() {
        let name = func.name();
        linker.func_new(
            HOST_MODULE,
            name,
            host_func_type(&engine, func),
            move |mut caller: Caller<'_, WasmHost>, params: &[Val], results: &mut [Val]| {
                call_from_wasm(&mut caller, name, params, results)
            },
        )?;
    }
    Ok(())
}

fn call_from_wasm(
    caller: &mut Caller<'_, WasmHost>,
    name: &str,
    params: &[Val],
    results: &mut [Val],
) -> anyhow::Result<()> {
    let memory = get_memory(caller).ok_or_else(|| anyhow!("guest does not export memory"))?;
    let words = params
        .iter()
        .map(|v| v.i64().map(|w| w as u64))
        .collect::<Option<Vec<u64>>>()
        .ok_or_else(|| anyhow!("{name}: non-i64 argument"))?;

    let mut frame = InvocationFrame::new(words, true);
    let mut slot = ReturnSlot::default();
    {
        let (bytes, host) = memory.data_and_store_mut(&mut *caller);
        let WasmHost {
            tags,
            allocator,
            state,
            registry,
        } = host;
        let mut call = HostCall {
            memory: MemoryView::new(bytes, tags, allocator),
            frame: &mut frame,
            state,
        };
        registry.invoke(name, &mut call, &mut slot)?;
    }

    if let Some(result) = results.first_mut() {
        *result = Val::I64(slot.value as i64);
    }
    Ok(())
}
