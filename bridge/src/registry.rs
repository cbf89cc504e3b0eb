//! Host function name table and dispatch.
//!
//! The built-in set is closed: [`HostFunction`] enumerates it and maps each
//! entry to its name, arity and handler. [`Registry`] binds names to handlers
//! with first-registration-wins semantics and drives one call end to end.

use std::collections::BTreeMap;

use envcall_hostapi::Interpreter;
use tracing::{debug, warn};

use crate::error::BridgeError;
use crate::frame::{HostReturn, ResumeGuard};
use crate::handlers::{calls, console, marshal, memory_ops, params, storage};
use crate::host_impl::HostCall;

/// Signature shared by every host function.
pub type HostHandler = fn(&mut HostCall<'_>) -> Result<HostReturn, BridgeError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HostFunction {
    Strcmp,
    Malloc,
    Calloc,
    ArrayLen,
    Memcpy,
    Memset,
    JsonUnmarshal,
    JsonMarshal,
    Printi,
    Prints,
    GetStrValue,
    SetStrValue,
    RemoveStrValue,
    GetParam,
    CallTrx,
    RecvTrx,
    ParseParam,
    ReadMessage,
    ReadInt32Param,
    ReadInt64Param,
    ReadStringParam,
}

impl HostFunction {
    pub const ALL: [HostFunction; 21] = [
        Self::Strcmp,
        Self::Malloc,
        Self::Calloc,
        Self::ArrayLen,
        Self::Memcpy,
        Self::Memset,
        Self::JsonUnmarshal,
        Self::JsonMarshal,
        Self::Printi,
        Self::Prints,
        Self::GetStrValue,
        Self::SetStrValue,
        Self::RemoveStrValue,
        Self::GetParam,
        Self::CallTrx,
        Self::RecvTrx,
        Self::ParseParam,
        Self::ReadMessage,
        Self::ReadInt32Param,
        Self::ReadInt64Param,
        Self::ReadStringParam,
    ];

    /// The import name contracts use. The `JsonUnmashal`/`JsonMashal`
    /// spellings are part of the contract ABI.
    pub fn name(self) -> &'static str {
        match self {
            Self::Strcmp => "strcmp",
            Self::Malloc => "malloc",
            Self::Calloc => "calloc",
            Self::ArrayLen => "arrayLen",
            Self::Memcpy => "memcpy",
            Self::Memset => "memset",
            Self::JsonUnmarshal => "JsonUnmashal",
            Self::JsonMarshal => "JsonMashal",
            Self::Printi => "printi",
            Self::Prints => "prints",
            Self::GetStrValue => "getStrValue",
            Self::SetStrValue => "setStrValue",
            Self::RemoveStrValue => "removeStrValue",
            Self::GetParam => "getParam",
            Self::CallTrx => "callTrx",
            Self::RecvTrx => "recvTrx",
            Self::ParseParam => "parseParam",
            Self::ReadMessage => "readMessage",
            Self::ReadInt32Param => "readInt32Param",
            Self::ReadInt64Param => "readInt64Param",
            Self::ReadStringParam => "readStringParam",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    /// Number of parameter words.
    pub fn arity(self) -> usize {
        match self {
            Self::Malloc
            | Self::ArrayLen
            | Self::Printi
            | Self::ReadInt32Param
            | Self::ReadInt64Param
            | Self::ReadStringParam => 1,
            Self::Strcmp
            | Self::Calloc
            | Self::JsonMarshal
            | Self::Prints
            | Self::GetParam
            | Self::RecvTrx
            | Self::ParseParam
            | Self::ReadMessage => 2,
            Self::Memcpy | Self::Memset | Self::JsonUnmarshal => 3,
            Self::RemoveStrValue | Self::CallTrx => 4,
            Self::SetStrValue => 6,
            Self::GetStrValue => 8,
        }
    }

    pub fn handler(self) -> HostHandler {
        match self {
            Self::Strcmp => memory_ops::strcmp,
            Self::Malloc => memory_ops::malloc,
            Self::Calloc => memory_ops::calloc,
            Self::ArrayLen => memory_ops::array_len,
            Self::Memcpy => memory_ops::memcpy,
            Self::Memset => memory_ops::memset,
            Self::JsonUnmarshal => marshal::json_unmarshal,
            Self::JsonMarshal => marshal::json_marshal,
            Self::Printi => console::printi,
            Self::Prints => console::prints,
            Self::GetStrValue => storage::get_str_value,
            Self::SetStrValue => storage::set_str_value,
            Self::RemoveStrValue => storage::remove_str_value,
            Self::GetParam => params::get_param,
            Self::CallTrx => calls::call_trx,
            Self::RecvTrx => calls::recv_trx,
            Self::ParseParam => params::parse_param,
            Self::ReadMessage => params::read_message,
            Self::ReadInt32Param => params::read_int32_param,
            Self::ReadInt64Param => params::read_int64_param,
            Self::ReadStringParam => params::read_string_param,
        }
    }
}

#[derive(Clone, Copy)]
enum Binding {
    Builtin(HostFunction),
    Custom(HostHandler),
}

/// Name-to-handler table.
#[derive(Clone, Default)]
pub struct Registry {
    bindings: BTreeMap<String, Binding>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for func in HostFunction::ALL {
            registry.bind(func.name(), Binding::Builtin(func));
        }
        registry
    }

    /// Bind `name` to `handler` unless the name is taken.
    ///
    /// Returns `false`, leaving the existing binding in place, when it is.
    pub fn register(&mut self, name: impl Into<String>, handler: HostHandler) -> bool {
        self.bind(name, Binding::Custom(handler))
    }

    fn bind(&mut self, name: impl Into<String>, binding: Binding) -> bool {
        let name = name.into();
        if self.bindings.contains_key(&name) {
            warn!(name = %name, "host function already registered; keeping first");
            return false;
        }
        self.bindings.insert(name, binding);
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }

    /// Built-ins currently bound under their own names.
    pub fn builtins(&self) -> impl Iterator<Item = HostFunction> + '_ {
        self.bindings.values().filter_map(|binding| match binding {
            Binding::Builtin(func) => Some(*func),
            Binding::Custom(_) => None,
        })
    }

    /// Run the function bound to `name`.
    ///
    /// The frame's saved context is restored on every path; on success it is
    /// restored before the result is pushed.
    pub fn invoke(
        &self,
        name: &str,
        call: &mut HostCall<'_>,
        interp: &mut dyn Interpreter,
    ) -> Result<(), BridgeError> {
        let guard = ResumeGuard::new(interp, call.frame.take_context());
        let handler = match self.bindings.get(name) {
            Some(Binding::Builtin(func)) => func.handler(),
            Some(Binding::Custom(handler)) => *handler,
            None => return Err(BridgeError::NotFound(name.to_string())),
        };
        debug!(function = name, params = ?call.frame.params(), "host call");
        match handler(call) {
            Ok(ret) => {
                guard.complete(ret, call.frame.expects_return());
                Ok(())
            }
            Err(err) => {
                warn!(function = name, code = %err.code(), %err, "host call failed");
                Err(err)
            }
        }
    }
}
