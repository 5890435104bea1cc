//! Use-case services on top of the store contract.
//!
//! # Responsibility
//! - Orchestrate store calls into game-level operations.
//! - Stay storage-agnostic: services only see `Store`.

pub mod score_service;
