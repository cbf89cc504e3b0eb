//! Contract runtime: Wasmtime engine, module loading, and method execution.
//!
//! [`ContractRuntime`] loads and validates a contract module once, then runs
//! each transaction in a fresh instance. The instance, its memory and its
//! type tags are discarded after the call; queued sub-calls are returned.

use std::path::Path;
use std::sync::Arc;

use envcall_hostapi::{BumpAllocator, ContractContext};
use tracing::{debug, info};
use wasmtime::{Config, Engine, Linker, Module, Store, Trap};

use crate::config::{BridgeConfig, PAGE_SIZE};
use crate::dispatch::SubCall;
use crate::error::{BridgeError, RuntimeError};
use crate::host_impl::VmState;
use crate::linker::{link_host_functions, WasmHost};
use crate::registry::Registry;
use crate::validation::validate_module;

/// What one contract method execution left behind.
#[derive(Debug)]
pub struct ExecutionOutcome {
    /// Sub-calls issued via `callTrx`, in order.
    pub sub_calls: Vec<SubCall>,
    /// Fuel consumed by the guest.
    pub fuel_used: u64,
    pub size_mismatch_warnings: u64,
}

pub struct ContractRuntime {
    engine: Engine,
    module: Module,
    registry: Arc<Registry>,
    config: BridgeConfig,
}

impl ContractRuntime {
    /// Compile and validate contract bytecode (binary or text format).
    pub fn new(wasm_bytes: &[u8], config: BridgeConfig) -> Result<Self, RuntimeError> {
        let engine = create_engine()?;
        let module = Module::new(&engine, wasm_bytes)?;
        Self::from_module(engine, module, config)
    }

    pub fn from_file(path: &Path, config: BridgeConfig) -> Result<Self, RuntimeError> {
        let engine = create_engine()?;
        let module = Module::from_file(&engine, path)?;
        Self::from_module(engine, module, config)
    }

    fn from_module(engine: Engine, module: Module, config: BridgeConfig) -> Result<Self, RuntimeError> {
        let registry = Arc::new(Registry::with_builtins());
        validate_module(&module, &registry)?;
        Ok(Self {
            engine,
            module,
            registry,
            config,
        })
    }

    /// Run the method named by the context's transaction.
    pub fn execute(&self, contract: Arc<ContractContext>) -> Result<ExecutionOutcome, RuntimeError> {
        self.execute_with(VmState::new(contract))
    }

    /// Run with caller-prepared state, e.g. with a handoff consumer attached.
    pub fn execute_with(&self, state: VmState) -> Result<ExecutionOutcome, RuntimeError> {
        let method = state.contract().method().to_string();
        info!(contract = state.contract().contract(), method = %method, "executing contract");

        let mut store = Store::new(&self.engine, WasmHost::new(state, Arc::clone(&self.registry)));
        store.set_fuel(self.config.fuel_limit)?;

        let mut linker = Linker::new(&self.engine);
        link_host_functions(&mut linker, &self.registry)?;
        let instance = linker.instantiate(&mut store, &self.module)?;

        let wasm_memory = instance
            .get_memory(&mut store, "memory")
            .ok_or_else(|| RuntimeError::MemoryError("no memory export".into()))?;
        let current_pages = wasm_memory.size(&store);
        wasm_memory
            .grow(&mut store, self.config.host_alloc_pages as u64)
            .map_err(|e| RuntimeError::MemoryError(format!("initial grow: {}", e)))?;

        let alloc_base = (current_pages as usize) * PAGE_SIZE;
        let alloc_capacity = (self.config.host_alloc_pages as usize) * PAGE_SIZE;
        store.data_mut().allocator = BumpAllocator::new(alloc_base, alloc_capacity);

        let entry = instance
            .get_func(&mut store, &method)
            .ok_or_else(|| RuntimeError::MissingMethod(method.clone()))?
            .typed::<(), ()>(&store)?;
        handle_trap(entry.call(&mut store, ()))?;

        let fuel_used = self.config.fuel_limit - store.get_fuel()?;
        let mut state = store.into_data().into_state();
        debug!(fuel_used, sub_calls = state.sub_calls().len(), "contract finished");
        Ok(ExecutionOutcome {
            sub_calls: state.take_sub_calls(),
            fuel_used,
            size_mismatch_warnings: state.size_mismatch_warnings(),
        })
    }
}

/// Create a Wasmtime engine with deterministic configuration.
fn create_engine() -> Result<Engine, RuntimeError> {
    let mut wasm_config = Config::new();

    // Fuel metering: prevents infinite loops
    wasm_config.consume_fuel(true);

    // Determinism
    wasm_config.wasm_threads(false);
    wasm_config.wasm_simd(false);
    wasm_config.wasm_relaxed_simd(false);
    wasm_config.wasm_multi_memory(false);
    wasm_config.cranelift_nan_canonicalization(true);

    Ok(Engine::new(&wasm_config)?)
}

/// Convert a guest call result into a runtime error.
///
/// Fuel exhaustion → `FuelExhausted`, host call failures → `HostCall`,
/// anything else → `GuestTrapped`.
fn handle_trap<R>(result: Result<R, anyhow::Error>) -> Result<R, RuntimeError> {
    result.map_err(|e| {
        if matches!(e.downcast_ref::<Trap>(), Some(Trap::OutOfFuel)) {
            return RuntimeError::FuelExhausted;
        }
        match e.downcast::<BridgeError>() {
            Ok(err) => RuntimeError::HostCall(err),
            Err(e) => RuntimeError::GuestTrapped(format!("{:#}", e)),
        }
    })
}
