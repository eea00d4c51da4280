// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Birth input parsing and true-solar-time correction.
//!
//! Civil clock time is kept on the zone meridian (120° E for China Standard
//! Time).  Local solar time runs four minutes earlier for every degree west
//! of that meridian:
//!
//! ```text
//! offset_minutes = (longitude − reference_meridian) × 4
//! ```
//!
//! The offset is applied to the full civil timestamp with millisecond
//! precision, so a correction crossing midnight moves the date too and the
//! pillar builder sees the already-shifted day.

use crate::config::BaziConfig;
use crate::error::{BaziError, Result};
use crate::ganzhi::Branch;
use crate::time::{Time, UT};
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};

/// First and last civil years the astronomical models are used for.
pub const SUPPORTED_YEARS: std::ops::RangeInclusive<i32> = 1800..=2199;

/// Minutes of clock time per degree of longitude.
const MINUTES_PER_DEGREE: f64 = 4.0;

/// A birth time as entered: a clock reading or a two-hour period label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BirthTime {
    Clock(NaiveTime),
    /// A period such as `卯时`, resolved to the period's midpoint hour.
    Period(Branch),
}

impl BirthTime {
    /// Clock time used for the calculation.
    pub fn to_naive_time(self) -> NaiveTime {
        match self {
            Self::Clock(t) => t,
            Self::Period(branch) => {
                NaiveTime::from_hms_opt(branch.midpoint_hour(), 0, 0).unwrap_or(NaiveTime::MIN)
            }
        }
    }
}

/// Parse `YYYY-MM-DD`.
pub fn parse_birth_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|e| BaziError::InvalidDate(format!("{input:?}: {e}")))
}

/// Parse `HH:MM`, `HH:MM:SS`, or a period label (`子时`…`亥时`, with or
/// without the trailing `时`).
pub fn parse_birth_time(input: &str) -> Result<BirthTime> {
    let s = input.trim();
    if s.contains(':') {
        return NaiveTime::parse_from_str(s, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
            .map(BirthTime::Clock)
            .map_err(|_| BaziError::InvalidTimeFormat(format!("{input:?}")));
    }
    let label = s.strip_suffix('时').unwrap_or(s);
    label
        .parse::<Branch>()
        .map(BirthTime::Period)
        .map_err(|_| BaziError::InvalidTimeFormat(format!("{input:?}")))
}

/// Civil timestamp after true-solar-time correction.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CorrectedTimestamp {
    /// Wall-clock value as given.
    pub civil: NaiveDateTime,
    /// Local apparent wall-clock value used for the Day and Hour pillars.
    pub corrected: NaiveDateTime,
    /// Longitude the correction was computed for, degrees east.
    pub longitude: f64,
    /// `corrected − civil` in minutes.
    pub offset_minutes: f64,
    /// UTC offset of the civil zone, hours.
    pub zone_hours: f64,
}

impl CorrectedTimestamp {
    /// The corrected clock read on the zone's time axis.
    ///
    /// Solar-term boundaries are compared against this value, so a shift
    /// across a term boundary moves the Month (and Year) pillar just like a
    /// shift across midnight moves the Day pillar.
    pub fn instant(&self) -> Time<UT> {
        Time::<UT>::from_civil(self.corrected, self.zone_hours)
    }

    /// Branch of the two-hour period the corrected time falls in.
    #[inline]
    pub fn hour_branch(&self) -> Branch {
        Branch::of_hour(self.corrected.hour())
    }
}

/// Apply the true-solar-time correction to an already parsed civil timestamp.
pub fn correct(
    civil: NaiveDateTime,
    longitude: f64,
    config: &BaziConfig,
) -> Result<CorrectedTimestamp> {
    if !SUPPORTED_YEARS.contains(&civil.year()) {
        return Err(BaziError::CalendricalResolution(format!(
            "year {} outside {}..={}",
            civil.year(),
            SUPPORTED_YEARS.start(),
            SUPPORTED_YEARS.end()
        )));
    }
    if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
        return Err(BaziError::CalendricalResolution(format!(
            "longitude {longitude} outside [-180, 180]"
        )));
    }

    let offset_minutes = (longitude - config.reference_meridian) * MINUTES_PER_DEGREE;
    let millis = (offset_minutes * 60_000.0).round() as i64;
    let corrected = TimeDelta::try_milliseconds(millis)
        .and_then(|delta| civil.checked_add_signed(delta))
        .ok_or_else(|| {
            BaziError::CalendricalResolution(format!("cannot shift {civil} by {offset_minutes} min"))
        })?;

    log::debug!(
        "true solar time: {civil} at {longitude}°E → {corrected} ({offset_minutes:+.2} min)"
    );

    Ok(CorrectedTimestamp {
        civil,
        corrected,
        longitude,
        offset_minutes,
        zone_hours: config.reference_meridian / 15.0,
    })
}

/// Parse a birth date and time and correct them for `longitude`.
pub fn resolve(
    birth_date: &str,
    birth_time: &str,
    longitude: f64,
    config: &BaziConfig,
) -> Result<CorrectedTimestamp> {
    let date = parse_birth_date(birth_date)?;
    let time = parse_birth_time(birth_time)?;
    correct(date.and_time(time.to_naive_time()), longitude, config)
}
