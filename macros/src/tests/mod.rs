//! Tests for the type helpers behind the derives
//!
//! The derives themselves are exercised by the main crate's integration tests.
