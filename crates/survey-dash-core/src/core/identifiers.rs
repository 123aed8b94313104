// crates/survey-dash-core/src/core/identifiers.rs
// ============================================================================
// Module: Survey Dash Identifiers
// Description: Canonical opaque identifiers for forms, submissions, and dashboards.
// Purpose: Provide strongly typed, serializable identifiers with stable wire forms.
// Dependencies: rand, serde
// ============================================================================

//! ## Overview
//! This module defines the canonical identifiers used throughout Survey Dash.
//! Identifiers are opaque strings on the wire. Only [`DashboardId`] can be
//! generated locally; every other identifier originates from the remote
//! platform or from the caller.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::fmt::Write as _;

use rand::RngCore;
use rand::rngs::OsRng;
use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Prefix applied to generated dashboard identifiers.
pub const DASHBOARD_ID_PREFIX: &str = "dashboard-";
/// Number of random bytes in a generated dashboard identifier.
const DASHBOARD_ID_RANDOM_BYTES: usize = 16;

// ============================================================================
// SECTION: Identifier Types
// ============================================================================

/// Declares an opaque string identifier with the shared constructor set.
macro_rules! string_identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self::new(value)
            }
        }
    };
}

string_identifier! {
    /// Form identifier assigned by the remote platform.
    ///
    /// # Invariants
    /// - Opaque UTF-8 string; no normalization or validation is applied by this type.
    FormId
}

string_identifier! {
    /// Submission (instance) identifier assigned by the remote platform.
    ///
    /// # Invariants
    /// - Opaque UTF-8 string; no normalization or validation is applied by this type.
    SubmissionId
}

string_identifier! {
    /// Layout item identifier, unique within one dashboard.
    ///
    /// # Invariants
    /// - Uniqueness is enforced by [`crate::DashboardConfig::add_item`], not by this type.
    LayoutItemId
}

string_identifier! {
    /// Dashboard identifier.
    ///
    /// # Invariants
    /// - Immutable once assigned to a [`crate::DashboardConfig`].
    DashboardId
}

impl DashboardId {
    /// Generates a fresh dashboard identifier from 128 bits of OS randomness.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0u8; DASHBOARD_ID_RANDOM_BYTES];
        OsRng.fill_bytes(&mut bytes);
        let mut id =
            String::with_capacity(DASHBOARD_ID_PREFIX.len() + DASHBOARD_ID_RANDOM_BYTES * 2);
        id.push_str(DASHBOARD_ID_PREFIX);
        for byte in bytes {
            let _ = write!(id, "{byte:02x}");
        }
        Self(id)
    }
}
