//! Integration tests for command registration, dispatch and completion.

pub mod binary_test;
pub mod common;
pub mod dispatch_test;
pub mod registration_test;
pub mod suggestion_test;
