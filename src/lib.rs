//! tallychain - An append-only transfer ledger with proof-sealed blocks
//!
//! # Architecture
//!
//! ## Core Ledger
//! - [`ledger`] - Chain growth and the pending-transfer buffer
//! - [`block`] - Block and transfer types
//! - [`hashing`] - Canonical serialization and SHA-256 block hashing
//! - [`proof`] - Difficulty target and proof checking
//!
//! ## Collaborators
//! - [`api`] - REST API server (axum)
//! - [`wallet`] - Balance and activity scans over a fetched chain
//!
//! ## Configuration & Utilities
//! - [`config`] - Configuration management
//! - [`error`] - Error types

#![forbid(unsafe_code)]

// ============================================================================
// Core Ledger
// ============================================================================
pub mod block;
pub mod hashing;
pub mod ledger;
pub mod proof;

// ============================================================================
// Collaborators
// ============================================================================
pub mod api;
pub mod wallet;

// ============================================================================
// Configuration & Utilities
// ============================================================================
pub mod config;
pub mod error;
