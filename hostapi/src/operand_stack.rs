//! A vector-backed interpreter stand-in.
//!
//! Records pushed results and the most recently restored context, which is
//! all a host call can observe of its interpreter.

use crate::traits::Interpreter;
use crate::types::ResumeContext;

/// A value pushed by a host call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackValue {
    U32(u32),
    U64(u64),
}

#[derive(Debug, Clone, Default)]
pub struct OperandStack {
    values: Vec<StackValue>,
    context: Option<ResumeContext>,
}

impl OperandStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pop(&mut self) -> Option<StackValue> {
        self.values.pop()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The context most recently restored by a host call.
    pub fn context(&self) -> Option<&ResumeContext> {
        self.context.as_ref()
    }
}

impl Interpreter for OperandStack {
    fn push_u32(&mut self, value: u32) {
        self.values.push(StackValue::U32(value));
    }

    fn push_u64(&mut self, value: u64) {
        self.values.push(StackValue::U64(value));
    }

    fn restore_context(&mut self, context: ResumeContext) {
        self.context = Some(context);
    }
}
