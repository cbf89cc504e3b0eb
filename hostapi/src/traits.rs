//! Collaborator traits consumed by the host bridge.
//!
//! None of these are implemented by the bridge itself. The interpreter,
//! allocator and message source belong to the VM embedding the bridge;
//! roles come from the chain.

use bytes::Bytes;
use envcall_primitives::{Address, SemanticType};

use crate::error::HostError;
use crate::types::ResumeContext;

/// Assigns regions of a contract's linear memory.
pub trait Allocator {
    /// Reserve `size` bytes for a value of type `ty` and return the base address.
    ///
    /// The returned region must not overlap any live allocation. The caller
    /// validates it against the memory size and records the type tag.
    fn allocate(&mut self, size: usize, ty: SemanticType) -> Result<Address, HostError>;
}

/// The calling interpreter as seen from inside a host call.
pub trait Interpreter {
    /// Push a 32-bit result onto the operand stack.
    fn push_u32(&mut self, value: u32);

    /// Push a 64-bit result onto the operand stack.
    fn push_u64(&mut self, value: u64);

    /// Reinstate the state saved when the call was issued.
    fn restore_context(&mut self, context: ResumeContext);
}

/// Supplies the raw message a contract is executing.
pub trait MessageSource {
    fn current_message_bytes(&self) -> Result<Bytes, HostError>;
}

/// The chain's role and capability source.
///
/// Host functions never query it; a context hands it unchanged to every
/// sub-context it spawns.
pub trait RoleProvider: Send + Sync {}
