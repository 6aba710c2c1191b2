// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Consumer-side session management.
//!
//! A [`SessionStore`] drains the capture queue on a periodic tick into the
//! active [`Session`], evicting the oldest records past the per-session bound.

pub mod store;

pub use store::{DrainReport, Session, SessionStore};

/// Default per-session record bound.
pub const DEFAULT_MAX_PER_SESSION: usize = 5000;

/// Default number of records moved per drain tick.
pub const DEFAULT_DRAIN_BATCH: usize = 100;
