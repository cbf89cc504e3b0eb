//! `envcall-hostapi` — collaborator interfaces for the envcall host bridge.
//!
//! The bridge validates and marshals; everything with a life of its own sits
//! behind a trait defined here:
//!
//! - `Allocator` — assigns addresses in a contract's linear memory
//! - `ContractStore` — persistent `(contract, object, key) → value` storage
//! - `Interpreter` — the operand stack and resumption context of the caller
//! - `MessageSource` — the bytes of the message being executed
//! - `RoleProvider` — the chain's role source, carried in a `ContractContext`
//!
//! Reference implementations (`BumpAllocator`, `MemContractStore`,
//! `NoRoles`, `OperandStack`) back the tests and embedders that need no
//! external system.

pub mod error;
pub mod types;
pub mod traits;
pub mod contract_store;
pub mod mem_store;
pub mod bump_alloc;
pub mod operand_stack;

// Re-export commonly used types at the crate root.
pub use error::HostError;
pub use types::{ContractContext, ResumeContext};
pub use traits::{Allocator, Interpreter, MessageSource, RoleProvider};
pub use contract_store::ContractStore;
pub use mem_store::{MemContractStore, NoRoles};
pub use bump_alloc::BumpAllocator;
pub use operand_stack::{OperandStack, StackValue};
