// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Typed astronomical instants.
//!
//! [`Time<S>`] stores a Julian Day quantity in [`Days`] whose meaning is fixed
//! by the compile-time marker `S: TimeScale`.  Two scales are enough for the
//! calendar work in this crate:
//!
//! | Marker | Axis | Used for |
//! |--------|------|----------|
//! | [`UT`] | Universal Time (civil clocks) | birth instants, term instants, new moons |
//! | [`TT`] | Terrestrial Time (uniform)    | solar longitude series |
//!
//! Converting `Time<UT>` to `Time<TT>` adds **ΔT** (see [`delta_t`]); the
//! inverse uses a short fixed-point iteration.
//!
//! Civil wall-clock values enter and leave through
//! [`Time::<UT>::from_civil`] / [`Time::<UT>::to_civil`], which take a fixed
//! UTC offset in hours (China Standard Time is `+8`).

pub mod delta_t;
pub mod lunar;
pub mod solar;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use qtty::{Day, Days, Second, Seconds, Simplify};
use std::marker::PhantomData;
use std::ops::{Add, Sub};

/// Julian Day of the Unix epoch (1970-01-01T00:00:00Z).
const UNIX_EPOCH_JD: f64 = 2_440_587.5;

/// Offset between `NaiveDate::num_days_from_ce()` and the Julian Day Number.
const CE_TO_JDN: i64 = 1_721_425;

// ═══════════════════════════════════════════════════════════════════════════
// TimeScale trait and markers
// ═══════════════════════════════════════════════════════════════════════════

/// Marker trait for time scales.
///
/// Each scale converts its native Julian Day quantity to and from the
/// canonical JD on the TT axis.
pub trait TimeScale: Copy + Clone + std::fmt::Debug + PartialEq + PartialOrd + 'static {
    /// Display label used by [`Time`] formatting.
    const LABEL: &'static str;

    /// Convert a quantity in this scale to an absolute JD(TT).
    fn to_jd_tt(value: Days) -> Days;

    /// Convert an absolute JD(TT) back to this scale.
    fn from_jd_tt(jd_tt: Days) -> Days;
}

/// Terrestrial Time, the uniform axis the solar series are expressed on.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct TT;

impl TimeScale for TT {
    const LABEL: &'static str = "JD(TT)";

    #[inline(always)]
    fn to_jd_tt(value: Days) -> Days {
        value
    }

    #[inline(always)]
    fn from_jd_tt(jd_tt: Days) -> Days {
        jd_tt
    }
}

/// Universal Time, the axis civil clocks follow.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct UT;

impl TimeScale for UT {
    const LABEL: &'static str = "JD(UT)";

    #[inline]
    fn to_jd_tt(ut_value: Days) -> Days {
        ut_value + delta_t::delta_t(ut_value).to::<Day>()
    }

    #[inline]
    fn from_jd_tt(jd_tt: Days) -> Days {
        // dΔT/dJD is tiny, three rounds are plenty.
        let mut ut = jd_tt;
        for _ in 0..3 {
            ut = jd_tt - delta_t::delta_t(ut).to::<Day>();
        }
        ut
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Time<S>
// ═══════════════════════════════════════════════════════════════════════════

/// A point on time scale `S`, stored as a Julian Day.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct Time<S: TimeScale> {
    quantity: Days,
    _scale: PhantomData<S>,
}

impl<S: TimeScale> Time<S> {
    /// Create from a raw Julian Day value on this scale.
    #[inline]
    pub const fn new(value: f64) -> Self {
        Self {
            quantity: Days::new(value),
            _scale: PhantomData,
        }
    }

    /// Create from a [`Days`] quantity.
    #[inline]
    pub const fn from_days(days: Days) -> Self {
        Self {
            quantity: days,
            _scale: PhantomData,
        }
    }

    /// The underlying quantity in days.
    #[inline]
    pub const fn quantity(&self) -> Days {
        self.quantity
    }

    /// The underlying Julian Day value.
    #[inline]
    pub const fn value(&self) -> f64 {
        self.quantity.value()
    }

    /// Convert this instant to another time scale through JD(TT).
    #[inline]
    pub fn to<T: TimeScale>(&self) -> Time<T> {
        Time::<T>::from_days(T::from_jd_tt(S::to_jd_tt(self.quantity)))
    }
}

impl Time<TT> {
    /// J2000.0 epoch: 2000-01-01T12:00:00 TT.
    pub const J2000: Self = Self::new(2_451_545.0);

    /// One Julian century expressed in days.
    pub const JULIAN_CENTURY: Days = Days::new(36_525.0);

    /// Julian centuries since J2000.0, the argument of the solar series.
    #[inline]
    pub fn julian_centuries(&self) -> f64 {
        ((*self - Self::J2000) / Self::JULIAN_CENTURY)
            .simplify()
            .value()
    }
}

impl Time<UT> {
    /// Build an instant from a wall-clock value observed at `utc_offset_hours`.
    pub fn from_civil(datetime: NaiveDateTime, utc_offset_hours: f64) -> Self {
        let utc = datetime.and_utc();
        let seconds = Seconds::new(utc.timestamp() as f64)
            + Seconds::new(utc.timestamp_subsec_nanos() as f64 / 1e9)
            - Seconds::new(utc_offset_hours * 3_600.0);
        Self::from_days(Days::new(UNIX_EPOCH_JD) + seconds.to::<Day>())
    }

    /// Wall-clock value of this instant at `utc_offset_hours`, rounded to the
    /// millisecond.
    ///
    /// Returns `None` outside chrono's representable range.
    pub fn to_civil(&self, utc_offset_hours: f64) -> Option<NaiveDateTime> {
        let local = self.quantity - Days::new(UNIX_EPOCH_JD)
            + Seconds::new(utc_offset_hours * 3_600.0).to::<Day>();
        let millis = (local.to::<Second>().value() * 1_000.0).round() as i64;
        DateTime::from_timestamp_millis(millis).map(|dt| dt.naive_utc())
    }

    /// **ΔT = TT − UT** for this epoch.
    #[inline]
    pub fn delta_t(&self) -> Seconds {
        delta_t::delta_t(self.quantity)
    }
}

/// Julian Day Number of a civil date (the integer day count used for day pillars).
#[inline]
pub fn julian_day_number(date: NaiveDate) -> i64 {
    date.num_days_from_ce() as i64 + CE_TO_JDN
}

/// Julian Day Number of a proleptic Gregorian date given as plain integers.
///
/// Unlike [`julian_day_number`] this never fails; out-of-range months and
/// days simply roll over arithmetically.
pub fn gregorian_jdn(year: i32, month: u32, day: u32) -> i64 {
    let a = (14 - month as i64) / 12;
    let y = year as i64 + 4_800 - a;
    let m = month as i64 + 12 * a - 3;
    day as i64 + (153 * m + 2) / 5 + 365 * y + y.div_euclid(4) - y.div_euclid(100)
        + y.div_euclid(400)
        - 32_045
}

/// Civil date for a Julian Day Number.
#[inline]
pub fn date_from_jdn(jdn: i64) -> Option<NaiveDate> {
    i32::try_from(jdn - CE_TO_JDN)
        .ok()
        .and_then(NaiveDate::from_num_days_from_ce_opt)
}

// ── Display ───────────────────────────────────────────────────────────────

impl<S: TimeScale> std::fmt::Display for Time<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", S::LABEL, self.quantity)
    }
}

// ── Arithmetic ────────────────────────────────────────────────────────────

impl<S: TimeScale> Add<Days> for Time<S> {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Days) -> Self::Output {
        Self::from_days(self.quantity + rhs)
    }
}

impl<S: TimeScale> Sub<Days> for Time<S> {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Days) -> Self::Output {
        Self::from_days(self.quantity - rhs)
    }
}

impl<S: TimeScale> Sub for Time<S> {
    type Output = Days;
    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        self.quantity - rhs.quantity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn civil(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_from_civil_at_greenwich_noon_is_j2000_on_ut_axis() {
        let ut = Time::<UT>::from_civil(civil(2000, 1, 1, 12, 0), 0.0);
        assert!((ut.value() - 2_451_545.0).abs() < 1e-9);
    }

    #[test]
    fn test_from_civil_honours_utc_offset() {
        let beijing = Time::<UT>::from_civil(civil(2000, 1, 1, 20, 0), 8.0);
        let greenwich = Time::<UT>::from_civil(civil(2000, 1, 1, 12, 0), 0.0);
        assert!((beijing - greenwich).abs() < Days::new(1e-9));
    }

    #[test]
    fn test_civil_roundtrip_keeps_milliseconds() {
        let dt = NaiveDate::from_ymd_opt(2000, 12, 18)
            .unwrap()
            .and_hms_milli_opt(6, 59, 43, 200)
            .unwrap();
        let back = Time::<UT>::from_civil(dt, 8.0).to_civil(8.0).unwrap();
        assert_eq!(back, dt);
    }

    #[test]
    fn test_ut_to_tt_adds_delta_t() {
        let ut = Time::<UT>::new(2_451_545.0);
        let tt = ut.to::<TT>();
        let offset = (tt.quantity() - ut.quantity()).to::<Second>();
        assert!((offset - Seconds::new(63.8)).abs() < Seconds::new(1.0));
    }

    #[test]
    fn test_ut_tt_roundtrip() {
        let tt = Time::<TT>::new(2_451_545.0);
        let back = tt.to::<UT>().to::<TT>();
        assert!((back - tt).abs() < Days::new(1e-10));
    }

    #[test]
    fn test_julian_centuries_at_j2000_is_zero() {
        assert_eq!(Time::<TT>::J2000.julian_centuries(), 0.0);
        let next = Time::<TT>::J2000 + Time::<TT>::JULIAN_CENTURY;
        assert!((next.julian_centuries() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_julian_day_number_matches_known_dates() {
        let d = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        assert_eq!(julian_day_number(d), 2_451_545);
        assert_eq!(date_from_jdn(2_451_545), Some(d));
        let d = NaiveDate::from_ymd_opt(1984, 2, 2).unwrap();
        assert_eq!(julian_day_number(d), 2_445_733);
        assert_eq!(gregorian_jdn(1984, 2, 2), 2_445_733);
        assert_eq!(gregorian_jdn(2000, 12, 31), 2_451_910);
    }

    #[test]
    fn test_display_carries_scale_label() {
        let s = format!("{}", Time::<UT>::new(2_451_545.0));
        assert!(s.starts_with("JD(UT)"));
    }
}
