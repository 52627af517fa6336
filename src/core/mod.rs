//! Core library components.
//!
//! This module contains the reusable business logic for secret protection:
//! encryption, key management, authorization, version history, rotation,
//! and synchronization.

pub mod access;
pub mod constants;
pub mod crypto;
pub mod domain;
pub mod env;
pub mod history;
pub mod keys;
pub mod rotation;
pub mod store;
pub mod sync;
pub mod types;
