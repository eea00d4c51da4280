// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Chinese lunisolar calendar (农历).
//!
//! Months begin on the civil day (China Standard Time, UTC+8) containing a
//! new moon.  Month 11 is the month holding the winter solstice; in a year
//! with thirteen new moons between two such months, the first month lacking
//! a principal term (中气) is the leap month.
//!
//! New moons come from the truncated Meeus series (mean lunation plus the
//! principal periodic terms), evaluated on TT and brought back to UT with
//! the crate's own ΔT model.  Accuracy is a few minutes, so a new moon
//! falling within minutes of local midnight may land on the neighbouring day.

use super::solar::sun_longitude;
use super::{Time, TT, UT};

/// Mean synodic month in days.
const SYNODIC_MONTH: f64 = 29.530_588_853;

/// Julian Day of the first mean new moon of the series (1900-01-01).
const LUNATION_EPOCH: f64 = 2_415_021.076_998_695;

/// Zone the calendar is reckoned in, in hours east of Greenwich.
const CALENDAR_ZONE_HOURS: f64 = 8.0;

const MONTH_NAMES: [&str; 12] = [
    "正", "二", "三", "四", "五", "六", "七", "八", "九", "十", "十一", "十二",
];

const DAY_NAMES: [&str; 30] = [
    "初一", "初二", "初三", "初四", "初五", "初六", "初七", "初八", "初九", "初十", "十一", "十二",
    "十三", "十四", "十五", "十六", "十七", "十八", "十九", "二十", "廿一", "廿二", "廿三", "廿四",
    "廿五", "廿六", "廿七", "廿八", "廿九", "三十",
];

/// Instant of the `k`-th new moon after the one of 1900-01-01.
pub fn new_moon(k: i64) -> Time<UT> {
    let k = k as f64;
    let t = k / 1_236.85;
    let t2 = t * t;
    let t3 = t2 * t;

    let mut jde = 2_415_020.759_33 + 29.530_588_68 * k + 0.000_117_8 * t2 - 0.000_000_155 * t3;
    jde += 0.000_33 * (166.56 + 132.87 * t - 0.009_173 * t2).to_radians().sin();

    let m = (359.224_2 + 29.105_356_08 * k - 0.000_033_3 * t2 - 0.000_003_47 * t3).to_radians();
    let mp = (306.025_3 + 385.816_918_06 * k + 0.010_730_6 * t2 + 0.000_012_36 * t3).to_radians();
    let f = (21.296_4 + 390.670_506_46 * k - 0.001_652_8 * t2 - 0.000_002_39 * t3).to_radians();

    let correction = (0.173_4 - 0.000_393 * t) * m.sin() + 0.002_1 * (2.0 * m).sin()
        - 0.406_8 * mp.sin()
        + 0.016_1 * (2.0 * mp).sin()
        - 0.000_4 * (3.0 * mp).sin()
        + 0.010_4 * (2.0 * f).sin()
        - 0.005_1 * (m + mp).sin()
        - 0.007_4 * (m - mp).sin()
        + 0.000_4 * (2.0 * f + m).sin()
        - 0.000_4 * (2.0 * f - m).sin()
        - 0.000_6 * (2.0 * f + mp).sin()
        + 0.001_0 * (2.0 * f - mp).sin()
        + 0.000_5 * (2.0 * mp + m).sin();

    Time::<TT>::new(jde + correction).to::<UT>()
}

/// Julian Day Number of the local civil day holding the `k`-th new moon.
#[inline]
fn new_moon_day(k: i64) -> i64 {
    (new_moon(k).value() + 0.5 + CALENDAR_ZONE_HOURS / 24.0).floor() as i64
}

/// 30° sector (0 = 春分) the Sun occupies at local midnight starting `jdn`.
#[inline]
fn sun_sector(jdn: i64) -> u8 {
    let midnight = Time::<UT>::new(jdn as f64 - 0.5 - CALENDAR_ZONE_HOURS / 24.0);
    (sun_longitude(midnight) / 30.0).floor() as u8 % 12
}

/// Start day of the lunar month 11 that contains the winter solstice of
/// Gregorian `year`.
fn month_eleven(year: i32) -> i64 {
    let offset = super::gregorian_jdn(year, 12, 31) - 2_415_021;
    let k = (offset as f64 / SYNODIC_MONTH).floor() as i64;
    let start = new_moon_day(k);
    // Sector 9 begins at 270°, the winter solstice.
    if sun_sector(start) >= 9 {
        new_moon_day(k - 1)
    } else {
        start
    }
}

/// Number of months after month 11 (starting at `month11`) until the first
/// month without a principal term.
fn leap_month_offset(month11: i64) -> i64 {
    let k = ((month11 as f64 - LUNATION_EPOCH) / SYNODIC_MONTH + 0.5).floor() as i64;
    let mut i = 1;
    let mut arc = sun_sector(new_moon_day(k + i));
    loop {
        let last = arc;
        i += 1;
        arc = sun_sector(new_moon_day(k + i));
        if arc == last || i >= 14 {
            break;
        }
    }
    i - 1
}

// ═══════════════════════════════════════════════════════════════════════════
// LunarDate
// ═══════════════════════════════════════════════════════════════════════════

/// A date on the Chinese lunisolar calendar.
///
/// `year` is the Gregorian year in which the lunar year begins (正月初一),
/// so January dates before the lunar new year carry the previous year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LunarDate {
    pub year: i32,
    /// 1 (正月) through 12.
    pub month: u8,
    /// 1 through 30.
    pub day: u8,
    pub is_leap: bool,
}

impl LunarDate {
    /// Lunar date of the civil day with Julian Day Number `jdn` (UTC+8).
    pub fn from_jdn(jdn: i64) -> Self {
        let mut k = ((jdn as f64 - LUNATION_EPOCH) / SYNODIC_MONTH).floor() as i64 + 1;
        while new_moon_day(k) > jdn {
            k -= 1;
        }
        while new_moon_day(k + 1) <= jdn {
            k += 1;
        }
        let month_start = new_moon_day(k);

        let year = civil_year_of(jdn);

        let (mut lunar_year, a11, b11) = {
            let this11 = month_eleven(year);
            if this11 >= month_start {
                (year, month_eleven(year - 1), this11)
            } else {
                (year + 1, this11, month_eleven(year + 1))
            }
        };

        let day = (jdn - month_start + 1) as u8;
        let diff = (month_start - a11).div_euclid(29);
        let mut month = diff + 11;
        let mut is_leap = false;
        if b11 - a11 > 365 {
            let leap = leap_month_offset(a11);
            if diff >= leap {
                month = diff + 10;
                is_leap = diff == leap;
            }
        }
        if month > 12 {
            month -= 12;
        }
        if month >= 11 && diff < 4 {
            lunar_year -= 1;
        }

        Self {
            year: lunar_year,
            month: month as u8,
            day,
            is_leap,
        }
    }

    /// Month label such as `十一月` or `闰二月`.
    pub fn month_name(&self) -> String {
        let name = MONTH_NAMES[(self.month as usize + 11) % 12];
        if self.is_leap {
            format!("闰{name}月")
        } else {
            format!("{name}月")
        }
    }

    /// Day label such as `初一` or `廿三`.
    #[inline]
    pub fn day_name(&self) -> &'static str {
        DAY_NAMES[(self.day as usize).clamp(1, 30) - 1]
    }
}

impl std::fmt::Display for LunarDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.month_name(), self.day_name())
    }
}

/// Gregorian year of a Julian Day Number.
fn civil_year_of(jdn: i64) -> i32 {
    let a = jdn + 32_044;
    let b = (4 * a + 3).div_euclid(146_097);
    let c = a - 146_097 * b / 4;
    let d = (4 * c + 3).div_euclid(1_461);
    let e = c - 1_461 * d / 4;
    let m = (5 * e + 2).div_euclid(153);
    (100 * b + d - 4_800 + m / 10) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::gregorian_jdn;

    fn lunar(y: i32, m: u32, d: u32) -> LunarDate {
        LunarDate::from_jdn(gregorian_jdn(y, m, d))
    }

    #[test]
    fn test_new_moon_of_2000_01_06() {
        // Astronomical new moon: 2000-01-06 18:14 UT.
        let k = ((2_451_550.26 - LUNATION_EPOCH) / SYNODIC_MONTH).round() as i64;
        let found = new_moon(k);
        let gap_minutes = (found.value() - 2_451_550.259_7).abs() * 1_440.0;
        assert!(gap_minutes < 10.0, "off by {gap_minutes} min");
    }

    #[test]
    fn test_known_lunar_dates() {
        assert_eq!(
            lunar(2000, 12, 18),
            LunarDate { year: 2000, month: 11, day: 23, is_leap: false }
        );
        assert_eq!(
            lunar(1990, 1, 1),
            LunarDate { year: 1989, month: 12, day: 5, is_leap: false }
        );
        assert_eq!(
            lunar(2024, 2, 10),
            LunarDate { year: 2024, month: 1, day: 1, is_leap: false }
        );
        assert_eq!(
            lunar(2024, 2, 9),
            LunarDate { year: 2023, month: 12, day: 30, is_leap: false }
        );
    }

    #[test]
    fn test_leap_months() {
        let d = lunar(2023, 3, 22);
        assert!(d.is_leap);
        assert_eq!((d.month, d.day), (2, 1));
        assert_eq!(d.month_name(), "闰二月");

        let after = lunar(2023, 4, 20);
        assert!(!after.is_leap);
        assert_eq!((after.month, after.day), (3, 1));

        let d = lunar(2020, 5, 23);
        assert!(d.is_leap);
        assert_eq!(d.month, 4);
    }

    #[test]
    fn test_days_advance_continuously_across_a_year() {
        let start = gregorian_jdn(2017, 1, 1);
        let mut previous = LunarDate::from_jdn(start);
        for jdn in start + 1..start + 400 {
            let today = LunarDate::from_jdn(jdn);
            assert!((1..=30).contains(&today.day));
            if today.day != 1 {
                assert_eq!(today.day, previous.day + 1, "jump at JDN {jdn}");
                assert_eq!(today.month, previous.month);
            }
            previous = today;
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(lunar(2000, 12, 18).to_string(), "十一月廿三");
        assert_eq!(lunar(1990, 1, 27).to_string(), "正月初一");
    }

    #[test]
    fn test_civil_year_of_known_days() {
        for (y, m, d) in [(1800, 1, 1), (1999, 12, 31), (2000, 1, 1), (2199, 12, 31)] {
            assert_eq!(civil_year_of(gregorian_jdn(y, m, d)), y);
        }
    }
}
