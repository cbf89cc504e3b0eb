//! Per-call invocation frame and the resume guard.

use envcall_hostapi::{Interpreter, ResumeContext};

use crate::error::BridgeError;

/// The interpreter's view of one pending host call.
#[derive(Debug, Clone, Default)]
pub struct InvocationFrame {
    params: Vec<u64>,
    expects_return: bool,
    saved_context: Option<ResumeContext>,
}

impl InvocationFrame {
    pub fn new(params: Vec<u64>, expects_return: bool) -> Self {
        Self {
            params,
            expects_return,
            saved_context: None,
        }
    }

    /// Attach the interpreter state to reinstate when the call finishes.
    pub fn with_context(mut self, context: ResumeContext) -> Self {
        self.saved_context = Some(context);
        self
    }

    pub fn params(&self) -> &[u64] {
        &self.params
    }

    pub fn expects_return(&self) -> bool {
        self.expects_return
    }

    /// Exactly `N` parameter words, or an arity error naming `func`.
    pub fn args<const N: usize>(&self, func: &'static str) -> Result<[u64; N], BridgeError> {
        <[u64; N]>::try_from(self.params.as_slice()).map_err(|_| BridgeError::Arity {
            func,
            expected: N,
            got: self.params.len(),
        })
    }

    pub(crate) fn take_context(&mut self) -> Option<ResumeContext> {
        self.saved_context.take()
    }
}

/// What a host function hands back to the interpreter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostReturn {
    U32(u32),
    U64(u64),
}

/// Reinstates the saved interpreter context however the host call ends.
///
/// On success [`ResumeGuard::complete`] restores first and then pushes the
/// result. On any other exit the context is restored when the guard drops.
pub struct ResumeGuard<'a> {
    interp: &'a mut dyn Interpreter,
    context: Option<ResumeContext>,
}

impl<'a> ResumeGuard<'a> {
    pub fn new(interp: &'a mut dyn Interpreter, context: Option<ResumeContext>) -> Self {
        Self { interp, context }
    }

    pub fn complete(mut self, ret: HostReturn, expects_return: bool) {
        self.restore();
        if !expects_return {
            return;
        }
        match ret {
            HostReturn::U32(v) => self.interp.push_u32(v),
            HostReturn::U64(v) => self.interp.push_u64(v),
        }
    }

    fn restore(&mut self) {
        if let Some(context) = self.context.take() {
            self.interp.restore_context(context);
        }
    }
}

impl Drop for ResumeGuard<'_> {
    fn drop(&mut self) {
        self.restore();
    }
}
