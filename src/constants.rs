//! # Constants and type definitions for indexable
//!
//! This module centralizes the **conversion factors**, **fill values** and **common type
//! definitions** used throughout the crate.
//!
//! ## Overview
//!
//! - Time conversions (JD ↔ MJD, days ↔ seconds)
//! - Default fill values used when a masked column is materialized (sorting, display)
//! - Core type aliases (member positions, fast hash map)

use ahash::RandomState;
use std::collections::HashMap;

// -------------------------------------------------------------------------------------------------
// Time conversions
// -------------------------------------------------------------------------------------------------

/// Number of seconds in a Julian day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Conversion factor between Julian Date and Modified Julian Date
pub const JDTOMJD: f64 = 2400000.5;

/// MJD epoch of J2000.0 (2000-01-01 12:00:00 TT)
pub const T2000: f64 = 51544.5;

// -------------------------------------------------------------------------------------------------
// Masked column fill values
// -------------------------------------------------------------------------------------------------

/// Fill value substituted for masked floating-point entries
pub const DEFAULT_FILL_FLOAT: f64 = 1e20;

/// Fill value substituted for masked integer entries
pub const DEFAULT_FILL_INT: i64 = 999_999;

/// Fill value substituted for masked string entries
pub const DEFAULT_FILL_STR: &str = "N/A";

/// Fill value substituted for masked boolean entries
pub const DEFAULT_FILL_BOOL: bool = true;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Modified Julian Date (days)
pub type MJD = f64;

/// Julian Date (days)
pub type JD = f64;

/// Position of a row inside the member arrays of an entity
pub type MemberPosition = usize;

/// Position inside the externally visible class index
pub type ClassPosition = usize;

/// `HashMap` keyed with `ahash`, used on every hot hashing path of the index builder
pub type FastHashMap<K, V> = HashMap<K, V, RandomState>;

/// Number of rows rendered by [`Entity::show`](crate::entity::Entity::show) by default
pub const DISPLAY_HEAD_ROWS: usize = 10;
