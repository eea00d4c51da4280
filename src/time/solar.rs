// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Apparent solar longitude and the 24 solar terms (节气).
//!
//! The longitude series is the low-precision solution of Meeus,
//! *Astronomical Algorithms* (2nd ed.) ch. 25, including nutation in
//! longitude and aberration.  Its error stays around 0.01°, which places a
//! term instant within roughly a quarter of an hour.
//!
//! Terms are numbered from 立春 (315°) so that even indices are the twelve
//! sectional terms (节) opening each BaZi month, and odd indices are the
//! principal terms (中气) used for lunar month numbering.

use qtty::Days;

use super::{Time, TT, UT};

/// Tropical year in days, used to turn a longitude gap into a time step.
const TROPICAL_YEAR: f64 = 365.242_2;

/// Longitude of 立春, the first sectional term of the BaZi year.
const LICHUN_LONGITUDE: f64 = 315.0;

/// Wrap an angle to `[0, 360)`.
#[inline]
pub(crate) fn wrap360(deg: f64) -> f64 {
    deg.rem_euclid(360.0)
}

/// Wrap an angle to `[-180, 180)`.
#[inline]
fn wrap180(deg: f64) -> f64 {
    wrap360(deg + 180.0) - 180.0
}

/// Apparent geocentric longitude of the Sun, in degrees `[0, 360)`.
pub fn apparent_longitude(instant: Time<TT>) -> f64 {
    let t = instant.julian_centuries();

    let l0 = 280.466_46 + 36_000.769_83 * t + 0.000_303_2 * t * t;
    let m = (357.529_11 + 35_999.050_29 * t - 0.000_153_7 * t * t).to_radians();
    let c = (1.914_602 - 0.004_817 * t - 0.000_014 * t * t) * m.sin()
        + (0.019_993 - 0.000_101 * t) * (2.0 * m).sin()
        + 0.000_289 * (3.0 * m).sin();
    let omega = (125.04 - 1_934.136 * t).to_radians();

    wrap360(l0 + c - 0.005_69 - 0.004_78 * omega.sin())
}

/// Apparent solar longitude at a UT instant.
#[inline]
pub fn sun_longitude(instant: Time<UT>) -> f64 {
    apparent_longitude(instant.to::<TT>())
}

/// Zero-based BaZi month for a solar longitude: `0` is the 寅 month opened by
/// 立春, `11` the 丑 month opened by 小寒.
#[inline]
pub fn month_offset(longitude: f64) -> u8 {
    (wrap360(longitude - LICHUN_LONGITUDE) / 30.0).floor() as u8 % 12
}

// ═══════════════════════════════════════════════════════════════════════════
// SolarTerm
// ═══════════════════════════════════════════════════════════════════════════

/// The 24 solar terms in order from 立春.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SolarTerm {
    Lichun,
    Yushui,
    Jingzhe,
    Chunfen,
    Qingming,
    Guyu,
    Lixia,
    Xiaoman,
    Mangzhong,
    Xiazhi,
    Xiaoshu,
    Dashu,
    Liqiu,
    Chushu,
    Bailu,
    Qiufen,
    Hanlu,
    Shuangjiang,
    Lidong,
    Xiaoxue,
    Daxue,
    Dongzhi,
    Xiaohan,
    Dahan,
}

impl SolarTerm {
    /// All terms, 立春 first.
    pub const ALL: [SolarTerm; 24] = [
        Self::Lichun,
        Self::Yushui,
        Self::Jingzhe,
        Self::Chunfen,
        Self::Qingming,
        Self::Guyu,
        Self::Lixia,
        Self::Xiaoman,
        Self::Mangzhong,
        Self::Xiazhi,
        Self::Xiaoshu,
        Self::Dashu,
        Self::Liqiu,
        Self::Chushu,
        Self::Bailu,
        Self::Qiufen,
        Self::Hanlu,
        Self::Shuangjiang,
        Self::Lidong,
        Self::Xiaoxue,
        Self::Daxue,
        Self::Dongzhi,
        Self::Xiaohan,
        Self::Dahan,
    ];

    const NAMES: [&'static str; 24] = [
        "立春", "雨水", "惊蛰", "春分", "清明", "谷雨", "立夏", "小满", "芒种", "夏至", "小暑", "大暑",
        "立秋", "处暑", "白露", "秋分", "寒露", "霜降", "立冬", "小雪", "大雪", "冬至", "小寒", "大寒",
    ];

    /// Position in [`SolarTerm::ALL`].
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Term from its position, wrapping modulo 24.
    #[inline]
    pub const fn from_index(index: usize) -> Self {
        Self::ALL[index % 24]
    }

    /// Solar longitude at which the term begins.
    #[inline]
    pub fn longitude(self) -> f64 {
        wrap360(LICHUN_LONGITUDE + 15.0 * self.index() as f64)
    }

    /// Chinese name.
    #[inline]
    pub const fn name(self) -> &'static str {
        Self::NAMES[self.index()]
    }

    /// `true` for the sectional terms (节) that open a BaZi month.
    #[inline]
    pub const fn is_jie(self) -> bool {
        self.index() % 2 == 0
    }

    /// The term in effect at a given solar longitude.
    #[inline]
    pub fn containing(longitude: f64) -> Self {
        Self::from_index((wrap360(longitude - LICHUN_LONGITUDE) / 15.0).floor() as usize)
    }
}

impl std::fmt::Display for SolarTerm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Term instants
// ═══════════════════════════════════════════════════════════════════════════

/// Instant at which the Sun reaches `target` longitude, starting from a guess
/// within a few days of the answer.
pub fn find_longitude(target: f64, guess: Time<UT>) -> Time<UT> {
    let mut t = guess;
    for _ in 0..10 {
        let gap = wrap180(target - sun_longitude(t));
        if gap.abs() < 1e-7 {
            break;
        }
        t = t + Days::new(gap * TROPICAL_YEAR / 360.0);
    }
    t
}

/// The sectional term (节) at or before `instant`, with its instant.
pub fn previous_jie(instant: Time<UT>) -> (SolarTerm, Time<UT>) {
    let longitude = sun_longitude(instant);
    let term = SolarTerm::from_index(2 * month_offset(longitude) as usize);
    let behind = wrap360(longitude - term.longitude());
    let guess = instant - Days::new(behind * TROPICAL_YEAR / 360.0);
    (term, find_longitude(term.longitude(), guess))
}

/// The sectional term (节) strictly after `instant`, with its instant.
pub fn next_jie(instant: Time<UT>) -> (SolarTerm, Time<UT>) {
    let longitude = sun_longitude(instant);
    let term = SolarTerm::from_index(2 * month_offset(longitude) as usize + 2);
    let ahead = wrap360(term.longitude() - longitude);
    let guess = instant + Days::new(ahead * TROPICAL_YEAR / 360.0);
    (term, find_longitude(term.longitude(), guess))
}

/// Instant of a term in the Gregorian year `year`.
///
/// Terms from 小寒 to 大寒 fall in January; the rest follow in order, so the
/// guess is placed from the mean longitude motion starting at the vernal
/// equinox (about 20 March).
pub fn term_in_year(term: SolarTerm, year: i32) -> Time<UT> {
    const MARCH_EQUINOX_DAY_OF_YEAR: f64 = 79.5;
    let jan1 = Time::<UT>::new(super::gregorian_jdn(year, 1, 1) as f64 - 0.5);
    let past_equinox = wrap360(term.longitude());
    let mut day = MARCH_EQUINOX_DAY_OF_YEAR + past_equinox * TROPICAL_YEAR / 360.0;
    if day > 366.0 {
        day -= TROPICAL_YEAR;
    }
    find_longitude(term.longitude(), jan1 + Days::new(day))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn beijing(y: i32, m: u32, d: u32, h: u32, min: u32) -> Time<UT> {
        let dt = NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap();
        Time::<UT>::from_civil(dt, 8.0)
    }

    #[test]
    fn test_longitude_at_j2000() {
        // Meeus: apparent longitude ≈ 280.37° at 2000-01-01 12h TT.
        let lambda = apparent_longitude(Time::<TT>::J2000);
        assert!((lambda - 280.37).abs() < 0.05, "λ = {lambda}");
    }

    #[test]
    fn test_meeus_example_25a() {
        // 1992-10-13 0h TD → λ = 199.906°
        let lambda = apparent_longitude(Time::<TT>::new(2_448_908.5));
        assert!((lambda - 199.906).abs() < 0.01, "λ = {lambda}");
    }

    #[test]
    fn test_lichun_2000_instant() {
        // 立春 2000: 2000-02-04 20:40 Beijing time.
        let found = term_in_year(SolarTerm::Lichun, 2000);
        let expected = beijing(2000, 2, 4, 20, 40);
        let gap_minutes = (found - expected).value().abs() * 1_440.0;
        assert!(gap_minutes < 20.0, "off by {gap_minutes} min");
    }

    #[test]
    fn test_xiaohan_is_found_in_january() {
        let found = term_in_year(SolarTerm::Xiaohan, 1990);
        let civil = found.to_civil(8.0).unwrap();
        assert_eq!(civil.date(), NaiveDate::from_ymd_opt(1990, 1, 5).unwrap());
    }

    #[test]
    fn test_month_offset_boundaries() {
        assert_eq!(month_offset(315.0), 0);
        assert_eq!(month_offset(314.999), 11);
        assert_eq!(month_offset(0.0), 1);
        assert_eq!(month_offset(285.0), 11);
        assert_eq!(month_offset(255.0), 10);
    }

    #[test]
    fn test_previous_and_next_jie_bracket_the_instant() {
        let birth = beijing(2000, 12, 18, 7, 0);
        let (prev, at_prev) = previous_jie(birth);
        let (next, at_next) = next_jie(birth);
        assert_eq!(prev, SolarTerm::Daxue);
        assert_eq!(next, SolarTerm::Xiaohan);
        assert!(at_prev < birth && birth < at_next);
        assert!((at_next - at_prev).value() > 28.0 && (at_next - at_prev).value() < 32.0);
    }

    #[test]
    fn test_term_table_is_consistent() {
        for term in SolarTerm::ALL {
            assert_eq!(SolarTerm::containing(term.longitude() + 0.5), term);
            assert_eq!(term.is_jie(), term.index() % 2 == 0);
        }
        assert_eq!(SolarTerm::Dongzhi.longitude(), 270.0);
        assert_eq!(SolarTerm::Chunfen.longitude(), 0.0);
        assert_eq!(SolarTerm::Xiaohan.name(), "小寒");
    }
}
