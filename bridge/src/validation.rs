//! Contract module validation.
//!
//! Checks, before a module is accepted:
//!
//! 1. Memory export present
//! 2. All imports are functions from the `env` module
//! 3. No WASI imports
//! 4. Every import names a linked host function with its ABI signature,
//!    `arity` i64 parameters and one i64 result

use wasmtime::{ExternType, Module, ValType};

use crate::error::RuntimeError;
use crate::linker::HOST_MODULE;
use crate::registry::{HostFunction, Registry};

fn is_i64(vt: &ValType) -> bool {
    matches!(vt, ValType::I64)
}

/// Validate a contract module against the host functions in `registry`.
pub fn validate_module(module: &Module, registry: &Registry) -> Result<(), RuntimeError> {
    validate_exports(module)?;
    validate_imports(module, registry)?;
    Ok(())
}

fn validate_exports(module: &Module) -> Result<(), RuntimeError> {
    let has_memory = module
        .exports()
        .any(|e| e.name() == "memory" && matches!(e.ty(), ExternType::Memory(_)));
    if !has_memory {
        return Err(RuntimeError::ValidationError(
            "module must export 'memory'".into(),
        ));
    }
    Ok(())
}

fn validate_imports(module: &Module, registry: &Registry) -> Result<(), RuntimeError> {
    for import in module.imports() {
        let module_name = import.module();
        let name = import.name();

        if module_name.starts_with("wasi") {
            return Err(RuntimeError::ValidationError(format!(
                "WASI import not allowed: {}::{}",
                module_name, name
            )));
        }

        if module_name != HOST_MODULE {
            return Err(RuntimeError::ValidationError(format!(
                "import from unknown module '{}' (only '{}' allowed): {}",
                module_name, HOST_MODULE, name
            )));
        }

        let func_ty = match import.ty() {
            ExternType::Func(ft) => ft,
            _ => {
                return Err(RuntimeError::ValidationError(format!(
                    "non-function import not allowed: {}::{}",
                    module_name, name
                )));
            }
        };

        let func = HostFunction::from_name(name)
            .filter(|f| registry.builtins().any(|b| b == *f))
            .ok_or_else(|| {
                RuntimeError::ValidationError(format!("unknown host function: {}", name))
            })?;

        let params: Vec<ValType> = func_ty.params().collect();
        let results: Vec<ValType> = func_ty.results().collect();
        if params.len() != func.arity() || !params.iter().all(is_i64) {
            return Err(RuntimeError::ValidationError(format!(
                "import '{}' has wrong param signature: expected {} i64 params, got {} params",
                name,
                func.arity(),
                params.len()
            )));
        }
        if results.len() != 1 || !results.iter().all(is_i64) {
            return Err(RuntimeError::ValidationError(format!(
                "import '{}' must return one i64",
                name
            )));
        }
    }

    Ok(())
}
