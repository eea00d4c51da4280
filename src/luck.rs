// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Luck pillars (大运): eight ten-year decades stepped from the Month pillar.
//!
//! ## Direction
//!
//! | Gender | Yang year stem | Yin year stem |
//! |--------|----------------|---------------|
//! | male   | forward (顺排) | backward (逆排) |
//! | female | backward (逆排) | forward (顺排) |
//!
//! ## Starting age
//!
//! Counting forward, the distance from birth to the next sectional term (节);
//! counting backward, the distance back to the previous one.  Three days
//! make one year, so one day is four months and six hours one month.  The
//! decade ranges use the distance rounded to whole years, never below one.

use crate::config::StartAgeRule;
use crate::error::BaziError;
use crate::ganzhi::{Polarity, Stem};
use crate::pillars::{BaziChart, Pillar};
use crate::time::solar::{next_jie, previous_jie, SolarTerm};
use crate::time::{Time, UT};
use chrono::Datelike;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Number of decades in a sequence.
pub const DECADE_COUNT: usize = 8;

/// Days of distance to a sectional term per year of starting age.
const DAYS_PER_YEAR_OF_AGE: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Male => "男",
            Self::Female => "女",
        }
    }
}

impl Display for Gender {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Gender {
    type Err = BaziError;

    /// Accepts `male`/`female` (any case), `m`/`f`, `男`/`女`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" | "m" | "男" => Ok(Self::Male),
            "female" | "f" | "女" => Ok(Self::Female),
            _ => Err(BaziError::InvalidElementOrRelation(format!(
                "unknown gender {s:?}"
            ))),
        }
    }
}

/// Direction in which the decades step through the sexagenary cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    /// Forward for a Yang-year male or a Yin-year female.
    pub const fn of(gender: Gender, year_stem_polarity: Polarity) -> Self {
        match (gender, year_stem_polarity) {
            (Gender::Male, Polarity::Yang) | (Gender::Female, Polarity::Yin) => Self::Forward,
            _ => Self::Backward,
        }
    }

    /// `+1` or `-1`.
    #[inline]
    pub const fn step(self) -> i64 {
        match self {
            Self::Forward => 1,
            Self::Backward => -1,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Forward => "顺排",
            Self::Backward => "逆排",
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Starting age
// ═══════════════════════════════════════════════════════════════════════════

/// Age at which the first decade begins.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StartAge {
    /// Whole years used for the decade ranges.
    pub age: u32,
    /// Precise offset as (years, months, days), when derived from a term.
    pub precise: Option<(u32, u32, u32)>,
    /// The sectional term counted to, when derived from a term.
    pub term: Option<SolarTerm>,
}

impl StartAge {
    /// A fixed starting age.
    pub const fn fixed(age: u32) -> Self {
        Self {
            age,
            precise: None,
            term: None,
        }
    }

    /// Starting age from the distance between `birth` and the adjacent
    /// sectional term in `direction`.
    pub fn from_solar_terms(birth: Time<UT>, direction: Direction) -> Self {
        let (term, days) = match direction {
            Direction::Forward => {
                let (term, at) = next_jie(birth);
                (term, (at - birth).value())
            }
            Direction::Backward => {
                let (term, at) = previous_jie(birth);
                (term, (birth - at).value())
            }
        };
        let days = days.max(0.0);
        let years_f = days / DAYS_PER_YEAR_OF_AGE;


        log::debug!(
            "start age: {days:.3} days to {term} → {years_f:.3} years ({})",
            direction
        );
        Self {
            age: (years_f.round() as u32).max(1),
            precise: Some(split_age(years_f)),
            term: Some(term),
        }
    }
}

/// Years of age as (years, months, days), with 30-day months; rounding to
/// the nearest day carries into months and years.
fn split_age(years: f64) -> (u32, u32, u32) {
    let days = (years.max(0.0) * 360.0).round() as u32;
    (days / 360, days % 360 / 30, days % 30)
}

// ═══════════════════════════════════════════════════════════════════════════
// Decades
// ═══════════════════════════════════════════════════════════════════════════

/// One luck pillar with its age and calendar-year ranges (inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LuckPillar {
    /// Zero-based position in the sequence.
    pub index: usize,
    pub pillar: Pillar,
    pub start_age: u32,
    pub end_age: u32,
    pub start_year: i32,
    pub end_year: i32,
}

impl LuckPillar {
    /// e.g. `6-15岁`
    pub fn ages_label(&self) -> String {
        format!("{}-{}岁", self.start_age, self.end_age)
    }

    /// e.g. `2006-2015`
    pub fn years_label(&self) -> String {
        format!("{}-{}", self.start_year, self.end_year)
    }

    #[inline]
    pub fn contains_age(&self, age: i32) -> bool {
        (self.start_age as i32..=self.end_age as i32).contains(&age)
    }

    #[inline]
    pub fn contains_year(&self, year: i32) -> bool {
        (self.start_year..=self.end_year).contains(&year)
    }
}

impl Display for LuckPillar {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} ({})", self.pillar, self.ages_label(), self.years_label())
    }
}

/// The eight decades of a chart.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecadeSequence {
    pub direction: Direction,
    pub start: StartAge,
    pub birth_year: i32,
    pub decades: Vec<LuckPillar>,
}

impl DecadeSequence {
    /// The decade containing `current_year − birth_year`, clamped to the
    /// first and last decade.
    pub fn current(&self, current_year: i32) -> Option<&LuckPillar> {
        let age = current_year - self.birth_year;
        let first = self.decades.first()?;
        if age < first.start_age as i32 {
            return Some(first);
        }
        self.decades
            .iter()
            .find(|d| d.contains_age(age))
            .or_else(|| self.decades.last())
    }

    /// The decade running in calendar year `year`, if any.
    pub fn at_year(&self, year: i32) -> Option<&LuckPillar> {
        self.decades.iter().find(|d| d.contains_year(year))
    }
}

/// Step eight decades from the Month pillar.
pub fn sequence(
    gender: Gender,
    year_stem: Stem,
    month: Pillar,
    birth_year: i32,
    start: StartAge,
) -> DecadeSequence {
    let direction = Direction::of(gender, year_stem.polarity());
    let decades = (0..DECADE_COUNT)
        .map(|i| {
            let start_age = start.age + 10 * i as u32;
            let start_year = birth_year + start_age as i32;
            LuckPillar {
                index: i,
                pillar: month.offset(direction.step() * (i as i64 + 1)),
                start_age,
                end_age: start_age + 9,
                start_year,
                end_year: start_year + 9,
            }
        })
        .collect();
    log::debug!("decades {direction} from {month}, starting at age {}", start.age);
    DecadeSequence {
        direction,
        start,
        birth_year,
        decades,
    }
}

/// Decades of a chart under a starting-age rule.
pub fn sequence_for_chart(chart: &BaziChart, gender: Gender, rule: StartAgeRule) -> DecadeSequence {
    let direction = Direction::of(gender, chart.year.stem.polarity());
    let start = match rule {
        StartAgeRule::SolarTerm => StartAge::from_solar_terms(chart.timestamp.instant(), direction),
        StartAgeRule::Fixed(age) => StartAge::fixed(age),
    };
    sequence(
        gender,
        chart.year.stem,
        chart.month,
        chart.timestamp.civil.year(),
        start,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BaziConfig;
    use crate::ganzhi::GanZhi;
    use crate::resolver::resolve;

    fn ganzhou_chart() -> BaziChart {
        let config = BaziConfig::default();
        let ts = resolve("2000-12-18", "07:20", 114.93, &config).unwrap();
        BaziChart::build(&ts, &config).unwrap()
    }

    #[test]
    fn test_direction_table() {
        assert_eq!(Direction::of(Gender::Male, Polarity::Yang), Direction::Forward);
        assert_eq!(Direction::of(Gender::Male, Polarity::Yin), Direction::Backward);
        assert_eq!(Direction::of(Gender::Female, Polarity::Yang), Direction::Backward);
        assert_eq!(Direction::of(Gender::Female, Polarity::Yin), Direction::Forward);
    }

    #[test]
    fn test_forward_sequence_steps_from_month() {
        let month: GanZhi = "戊子".parse().unwrap();
        let seq = sequence(Gender::Male, Stem::Geng, month, 2000, StartAge::fixed(6));
        let names: Vec<String> = seq.decades.iter().map(|d| d.pillar.to_string()).collect();
        assert_eq!(
            names,
            ["己丑", "庚寅", "辛卯", "壬辰", "癸巳", "甲午", "乙未", "丙申"]
        );
        assert_eq!(seq.decades[0].ages_label(), "6-15岁");
        assert_eq!(seq.decades[0].years_label(), "2006-2015");
        assert_eq!(seq.decades[7].end_age, 85);
    }

    #[test]
    fn test_backward_sequence_wraps() {
        let month: GanZhi = "甲子".parse().unwrap();
        let seq = sequence(Gender::Female, Stem::Jia, month, 1984, StartAge::fixed(3));
        assert_eq!(seq.direction, Direction::Backward);
        assert_eq!(seq.decades[0].pillar.to_string(), "癸亥");
        assert_eq!(seq.decades[1].pillar.to_string(), "壬戌");
    }

    #[test]
    fn test_current_decade_is_clamped() {
        let month: GanZhi = "戊子".parse().unwrap();
        let seq = sequence(Gender::Male, Stem::Geng, month, 2000, StartAge::fixed(6));
        assert_eq!(seq.current(2003).map(|d| d.index), Some(0));
        assert_eq!(seq.current(2026).map(|d| d.index), Some(2));
        assert_eq!(seq.current(2200).map(|d| d.index), Some(7));
        assert_eq!(seq.at_year(2016).map(|d| d.index), Some(1));
        assert_eq!(seq.at_year(2001), None);
    }

    #[test]
    fn test_start_age_from_solar_terms() {
        let chart = ganzhou_chart();
        // Next 节 is 小寒 on 2001-01-05, about 18.3 days away.
        let male = sequence_for_chart(&chart, Gender::Male, StartAgeRule::SolarTerm);
        assert_eq!(male.direction, Direction::Forward);
        assert_eq!(male.start.term, Some(SolarTerm::Xiaohan));
        assert_eq!(male.start.age, 6);
        assert!(matches!(male.start.precise, Some((6, 1, _))), "{:?}", male.start.precise);

        // Previous 节 is 大雪 on 2000-12-07, about 11.1 days back.
        let female = sequence_for_chart(&chart, Gender::Female, StartAgeRule::SolarTerm);
        assert_eq!(female.direction, Direction::Backward);
        assert_eq!(female.start.term, Some(SolarTerm::Daxue));
        assert_eq!(female.start.age, 4);
        assert_eq!(female.decades[0].pillar.to_string(), "丁亥");
    }

    #[test]
    fn test_fixed_rule() {
        let chart = ganzhou_chart();
        let seq = sequence_for_chart(&chart, Gender::Male, StartAgeRule::Fixed(6));
        assert_eq!(seq.start, StartAge::fixed(6));
        assert_eq!(seq.decades[0].start_year, 2006);
    }

    #[test]
    fn test_gender_parsing() {
        assert_eq!("male".parse::<Gender>(), Ok(Gender::Male));
        assert_eq!("女".parse::<Gender>(), Ok(Gender::Female));
        assert!("other".parse::<Gender>().is_err());
    }

    #[test]
    fn test_precise_age_carries_whole_months() {
        assert_eq!(split_age(0.0), (0, 0, 0));
        assert_eq!(split_age(2.5), (2, 6, 0));
        // 2 years 11 months 29.8 days rounds up to exactly 3 years.
        assert_eq!(split_age(1_079.8 / 360.0), (3, 0, 0));
        // 29.6 days rounds up to a full month, never to day 30.
        assert_eq!(split_age((2.0 * 360.0 + 29.6) / 360.0), (2, 1, 0));
        for step in 0..3_600 {
            let (_, months, days) = split_age(step as f64 / 359.7);
            assert!(months < 12 && days < 30, "{step}");
        }
    }
}
