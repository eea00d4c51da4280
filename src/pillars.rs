// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! The Four Pillars (四柱).
//!
//! | Pillar | Boundary | Rule |
//! |--------|----------|------|
//! | Year  | 立春 (λ☉ = 315°) | `(year − 4) mod 60`, 1984 = 甲子 |
//! | Month | each 节 (every 30° from 315°) | branch 寅 + k; stem from the year stem (五虎遁) |
//! | Day   | midnight, or 23:00 under [`ZiHourPolicy::NextDay`] | `(JDN + 49) mod 60` |
//! | Hour  | odd clock hours | branch `(h + 1) / 2`; stem from the day stem (五鼠遁) |
//!
//! All boundaries are evaluated on the true-solar-time clock produced by the
//! [resolver](crate::resolver).

use crate::config::{BaziConfig, HiddenStemWeights, ZiHourPolicy};
use crate::error::{BaziError, Result};
use crate::ganzhi::{Branch, Element, GanZhi, Stem};
use crate::resolver::CorrectedTimestamp;
use crate::time::lunar::LunarDate;
use crate::time::solar::{month_offset, sun_longitude, SolarTerm};
use crate::time::julian_day_number;
use chrono::{Datelike, Timelike};
use std::fmt::{Display, Formatter};

/// A single pillar is one member of the sexagenary cycle.
pub type Pillar = GanZhi;

/// Offset between the Julian Day Number and the sexagenary day index
/// (JDN 2451545, 2000-01-01, is 戊午 = 54).
const DAY_CYCLE_OFFSET: i64 = 49;

/// Sexagenary day of a Julian Day Number.
#[inline]
pub fn day_pillar_of_jdn(jdn: i64) -> Pillar {
    GanZhi::from_index(jdn + DAY_CYCLE_OFFSET)
}

/// Month pillar for a year stem and a zero-based month offset from 寅.
#[inline]
pub fn month_pillar(year_stem: Stem, offset: u8) -> Pillar {
    let stem = Stem::from_index((year_stem.index() % 5) * 2 + 2 + offset as usize);
    let branch = Branch::from_index(2 + offset as usize);
    GanZhi { stem, branch }
}

/// Hour pillar for a day stem and an hour branch.
#[inline]
pub fn hour_pillar(day_stem: Stem, branch: Branch) -> Pillar {
    let stem = Stem::from_index((day_stem.index() % 5) * 2 + branch.index());
    GanZhi { stem, branch }
}

/// Hidden stems of a branch with their weights: primary first, then each
/// secondary.
pub fn weighted_hidden_stems(
    branch: Branch,
    weights: &HiddenStemWeights,
) -> impl Iterator<Item = (Stem, f64)> {
    let (primary, secondary) = (weights.primary, weights.secondary);
    branch
        .hidden_stems()
        .iter()
        .enumerate()
        .map(move |(i, &stem)| (stem, if i == 0 { primary } else { secondary }))
}

/// Position of a pillar in the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PillarPosition {
    Year,
    Month,
    Day,
    Hour,
}

impl PillarPosition {
    pub const ALL: [PillarPosition; 4] = [Self::Year, Self::Month, Self::Day, Self::Hour];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Year => "年柱",
            Self::Month => "月柱",
            Self::Day => "日柱",
            Self::Hour => "时柱",
        }
    }
}

/// One pillar as presented: its position, 干支 and element label.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PillarDetail {
    pub position: PillarPosition,
    pub ganzhi: Pillar,
    /// e.g. `金土`
    pub element: String,
}

// ═══════════════════════════════════════════════════════════════════════════
// BaziChart
// ═══════════════════════════════════════════════════════════════════════════

/// A complete Four-Pillar chart.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BaziChart {
    pub year: Pillar,
    pub month: Pillar,
    pub day: Pillar,
    pub hour: Pillar,
    /// Timestamp the chart was built from.
    pub timestamp: CorrectedTimestamp,
    /// Solar term in effect at birth.
    pub solar_term: SolarTerm,
    /// Gregorian year whose 立春 opened the birth year pillar.
    pub solar_year: i32,
}

impl BaziChart {
    /// Build the chart for a corrected timestamp.
    ///
    /// # Errors
    /// [`BaziError::CalendricalResolution`] when the corrected date lies
    /// outside the supported range.
    pub fn build(timestamp: &CorrectedTimestamp, config: &BaziConfig) -> Result<Self> {
        let corrected = timestamp.corrected;
        let civil_year = corrected.year();
        if !crate::resolver::SUPPORTED_YEARS.contains(&civil_year) {
            return Err(BaziError::CalendricalResolution(format!(
                "corrected year {civil_year} is outside the supported range"
            )));
        }

        let longitude = sun_longitude(timestamp.instant());
        let offset = month_offset(longitude);

        // January and the start of February before 立春 belong to the
        // previous year's 子/丑 months.
        let solar_year = if corrected.month() <= 2 && offset >= 10 {
            civil_year - 1
        } else {
            civil_year
        };
        let year = GanZhi::of_year(solar_year);
        let month = month_pillar(year.stem, offset);

        let jdn = julian_day_number(corrected.date());
        let late_zi = corrected.hour() == 23;
        let day = match config.zi_hour {
            ZiHourPolicy::NextDay if late_zi => day_pillar_of_jdn(jdn + 1),
            _ => day_pillar_of_jdn(jdn),
        };
        let hour_stem_source = if late_zi {
            day_pillar_of_jdn(jdn + 1).stem
        } else {
            day.stem
        };
        let hour = hour_pillar(hour_stem_source, timestamp.hour_branch());

        let chart = Self {
            year,
            month,
            day,
            hour,
            timestamp: *timestamp,
            solar_term: SolarTerm::containing(longitude),
            solar_year,
        };
        log::debug!(
            "chart {chart} for {corrected} (λ☉ = {longitude:.4}°, {})",
            chart.solar_term
        );
        Ok(chart)
    }

    /// Year, month, day and hour pillars in order.
    #[inline]
    pub fn pillars(&self) -> [Pillar; 4] {
        [self.year, self.month, self.day, self.hour]
    }

    /// Pillar at `position`.
    #[inline]
    pub fn pillar(&self, position: PillarPosition) -> Pillar {
        match position {
            PillarPosition::Year => self.year,
            PillarPosition::Month => self.month,
            PillarPosition::Day => self.day,
            PillarPosition::Hour => self.hour,
        }
    }

    /// Year, Month, Day and Hour pillars with their element labels.
    pub fn details(&self) -> [PillarDetail; 4] {
        PillarPosition::ALL.map(|position| {
            let ganzhi = self.pillar(position);
            PillarDetail {
                position,
                ganzhi,
                element: ganzhi.element_label(),
            }
        })
    }

    /// The Day Master (日主): the stem of the Day pillar.
    #[inline]
    pub fn day_master(&self) -> Stem {
        self.day.stem
    }

    #[inline]
    pub fn day_master_element(&self) -> Element {
        self.day.stem.element()
    }

    /// Space-separated chart, e.g. `庚辰 戊子 庚戌 己卯`.
    pub fn formatted(&self) -> String {
        self.to_string()
    }

    /// Lunar date of the corrected civil day.
    pub fn lunar_date(&self) -> LunarDate {
        LunarDate::from_jdn(julian_day_number(self.timestamp.corrected.date()))
    }

    /// Lunar date label with year and hour, e.g. `庚辰年十一月廿三卯时`.
    pub fn lunar_label(&self) -> String {
        let lunar = self.lunar_date();
        format!(
            "{}年{}{}时",
            GanZhi::of_year(lunar.year),
            lunar,
            self.hour.branch
        )
    }
}

impl Display for BaziChart {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {} {}", self.year, self.month, self.day, self.hour)
    }
}
