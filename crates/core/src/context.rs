//! Routing Context
//!
//! The per-conversation call stack used for agent handoff:
//!
//! 1. The bottom frame is the router agent the conversation started with
//! 2. Each delegation pushes the target agent on top
//! 3. A completed delegation pops back to the caller beneath it
//!
//! A recursion counter bounds runaway self-delegation; it is reset on every
//! successful pop and deliberately left alone when the context is emptied.
//!
//! `empty` is terminal: once a turn signals completion the stack is cleared
//! and the context refuses further pushes. Resuming requires a new context.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Stack of active agent identifiers plus the recursion guard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingContext {
    stack: Vec<String>,
    recursive_counter: u32,
    /// Reason recorded by `empty`; `Some` means the context is terminated.
    cleared_reason: Option<String>,
}

impl RoutingContext {
    /// Create a context whose initial frame is the router agent.
    pub fn new(router_id: impl Into<String>) -> Self {
        Self {
            stack: vec![router_id.into()],
            recursive_counter: 0,
            cleared_reason: None,
        }
    }

    // ========================================================================
    // Mutators
    // ========================================================================

    /// Push a delegated agent on top of the stack.
    pub fn push(&mut self, agent_id: impl Into<String>) -> CoreResult<()> {
        if let Some(reason) = &self.cleared_reason {
            return Err(CoreError::routing(format!(
                "cannot push onto an emptied routing context ({})",
                reason
            )));
        }
        self.stack.push(agent_id.into());
        Ok(())
    }

    /// Pop the current agent, returning control to the caller beneath it.
    ///
    /// The initial router frame is never removed; popping it is a no-op that
    /// returns `None`.
    pub fn pop(&mut self) -> Option<String> {
        if self.stack.len() <= 1 {
            return None;
        }
        self.stack.pop()
    }

    /// Clear the whole stack and terminate the context.
    pub fn empty(&mut self, reason: impl Into<String>) {
        self.stack.clear();
        self.cleared_reason = Some(reason.into());
    }

    /// Record one more delegation since the last successful pop.
    pub fn increment_recursive_counter(&mut self) -> u32 {
        self.recursive_counter += 1;
        self.recursive_counter
    }

    pub fn reset_recursive_counter(&mut self) {
        self.recursive_counter = 0;
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Agent currently owning the turn (top of the stack).
    pub fn current_agent_id(&self) -> Option<&str> {
        self.stack.last().map(String::as_str)
    }

    /// The router frame at the bottom of the stack.
    pub fn entry_agent_id(&self) -> Option<&str> {
        self.stack.first().map(String::as_str)
    }

    pub fn stack(&self) -> &[String] {
        &self.stack
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn recursive_counter(&self) -> u32 {
        self.recursive_counter
    }

    /// Whether `empty` has been called on this context.
    pub fn is_terminated(&self) -> bool {
        self.cleared_reason.is_some()
    }

    pub fn cleared_reason(&self) -> Option<&str> {
        self.cleared_reason.as_deref()
    }
}

// ============================================================================
// Tests
// ============================================================================
