//! A natively hosted contract VM instance.
//!
//! Owns linear memory, its type tags and allocator, and the per-instance
//! state. The embedding interpreter drives it one host call at a time with
//! [`Vm::call`].

use std::sync::Arc;

use envcall_hostapi::{Allocator, BumpAllocator, ContractContext, Interpreter};

use crate::config::BridgeConfig;
use crate::dispatch::{HandoffReceiver, SubCall};
use crate::error::BridgeError;
use crate::frame::InvocationFrame;
use crate::host_impl::{HostCall, VmState};
use crate::memory::{LinearMemory, MemoryView};
use crate::registry::Registry;

pub struct Vm {
    memory: LinearMemory,
    allocator: Box<dyn Allocator + Send>,
    state: VmState,
    registry: Arc<Registry>,
}

impl Vm {
    /// An instance laid out per `config` with every built-in registered.
    pub fn new(config: &BridgeConfig, contract: Arc<ContractContext>) -> Self {
        let (base, capacity) = config.host_alloc_region();
        Self::with_parts(
            LinearMemory::new(config.memory_size()),
            Box::new(BumpAllocator::new(base, capacity)),
            VmState::new(contract),
            Arc::new(Registry::with_builtins()),
        )
    }

    pub fn with_parts(
        memory: LinearMemory,
        allocator: Box<dyn Allocator + Send>,
        state: VmState,
        registry: Arc<Registry>,
    ) -> Self {
        Self {
            memory,
            allocator,
            state,
            registry,
        }
    }

    /// Perform one host call on behalf of `interp`.
    pub fn call(
        &mut self,
        name: &str,
        mut frame: InvocationFrame,
        interp: &mut dyn Interpreter,
    ) -> Result<(), BridgeError> {
        let Self {
            memory,
            allocator,
            state,
            registry,
        } = self;
        let mut call = HostCall {
            memory: memory.view(allocator.as_mut()),
            frame: &mut frame,
            state,
        };
        registry.invoke(name, &mut call, interp)
    }

    /// Memory as the host sees it, for seeding data or inspecting results.
    pub fn view(&mut self) -> MemoryView<'_> {
        self.memory.view(self.allocator.as_mut())
    }

    pub fn memory(&self) -> &LinearMemory {
        &self.memory
    }

    pub fn state(&self) -> &VmState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut VmState {
        &mut self.state
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn take_sub_calls(&mut self) -> Vec<SubCall> {
        self.state.take_sub_calls()
    }

    pub fn attach_handoff(&mut self) -> HandoffReceiver {
        self.state.attach_handoff()
    }
}
