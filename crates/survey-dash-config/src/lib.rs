// crates/survey-dash-config/src/lib.rs
// ============================================================================
// Module: Survey Dash Config Library
// Description: Canonical config model and strict loading.
// Purpose: Single source of truth for survey-dash.toml semantics.
// Dependencies: survey-dash-source, serde, toml
// ============================================================================

//! ## Overview
//! `survey-dash-config` defines the configuration file model for Survey Dash:
//! the remote source connection, the audit sink, and metric defaults. Loading
//! is strict and fail-closed; nothing is read from the process environment.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
