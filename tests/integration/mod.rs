//! Integration Tests Module
//!
//! End-to-end tests for the sequential planner, routing hooks, the
//! conversation turn loop and config storage.

// Shared gateway and executor doubles
mod support;


// Conversation turn loop tests
mod conversation_test;
