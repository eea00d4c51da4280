// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Error type shared by every stage of the calculation.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors surfaced by the resolver, the pillar builder and the scorer.
///
/// None of them is recovered internally: the caller decides whether to retry
/// with corrected input or to report the failure.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum BaziError {
    /// Malformed or out-of-range calendar date.
    InvalidDate(String),
    /// Birth time is neither a clock time nor a recognised two-hour period label.
    InvalidTimeFormat(String),
    /// Instant outside the range the solar/lunar models are valid for.
    CalendricalResolution(String),
    /// A token that is not present in any static table.
    InvalidElementOrRelation(String),
}

impl Display for BaziError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDate(msg) => write!(f, "invalid date: {msg}"),
            Self::InvalidTimeFormat(msg) => write!(f, "invalid time format: {msg}"),
            Self::CalendricalResolution(msg) => write!(f, "calendrical resolution error: {msg}"),
            Self::InvalidElementOrRelation(msg) => {
                write!(f, "invalid element or relation: {msg}")
            }
        }
    }
}

impl Error for BaziError {}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, BaziError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_failing_stage() {
        let err = BaziError::InvalidTimeFormat("25:99".into());
        assert_eq!(err.to_string(), "invalid time format: 25:99");

        let err = BaziError::CalendricalResolution("year 1700".into());
        assert!(err.to_string().starts_with("calendrical resolution error"));
    }
}
