//! Cell lifecycle and cascading-deletion engine for the apiary unit server.
//!
//! The engine enforces the deletion contract of a cell: synchronous deletion
//! is blocked while any dependent resource exists, while the opt-in
//! recursive mode marks the cell, returns immediately, and hands the actual
//! cleanup to a background worker.

pub mod auth;
pub mod cell;
pub mod cleanup;
pub mod error;
pub mod evaluate;
pub mod inspect;
pub mod lock;
