// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! The `calculate` entry point and the [`BaziContext`] aggregate.
//!
//! ```text
//! BirthInput ─► resolver ─► pillars ─┬─► strength ─┐
//!                                    ├─► pattern  ─┼─► BaziContext ─► timeline
//!                                    └─► luck     ─┘
//! ```
//!
//! The current year is always passed in, so the same input and config give
//! the same context on any day.

use crate::config::BaziConfig;
use crate::error::Result;
use crate::ganzhi::{Element, GanZhi, Stem};
use crate::luck::{sequence_for_chart, DecadeSequence, Gender, LuckPillar};
use crate::pattern::{classify, Pattern};
use crate::pillars::{BaziChart, PillarDetail};
use crate::places::{resolve_longitude, CityTable, LongitudeLookup};
use crate::relations::{ten_god, TenGod};
use crate::resolver::resolve;
use crate::strength::{analyze, ElementSets, ElementalProfile, Strength};
use crate::timeline::{score_years, AnnualScore, ScoringBasis};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// Birth data as entered.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BirthInput {
    /// `YYYY-MM-DD`
    pub birth_date: String,
    /// `HH:MM`, `HH:MM:SS` or a period label such as `卯时`.
    pub birth_time: String,
    pub gender: Gender,
    /// Free-form place name, resolved through a [`LongitudeLookup`].
    pub birth_place: Option<String>,
    /// Pre-resolved longitude; takes precedence over `birth_place`.
    pub longitude: Option<f64>,
}

impl BirthInput {
    pub fn new(birth_date: &str, birth_time: &str, gender: Gender) -> Self {
        Self {
            birth_date: birth_date.to_string(),
            birth_time: birth_time.to_string(),
            gender,
            birth_place: None,
            longitude: None,
        }
    }

    pub fn with_place(mut self, place: &str) -> Self {
        self.birth_place = Some(place.to_string());
        self
    }

    pub fn with_longitude(mut self, longitude: f64) -> Self {
        self.longitude = Some(longitude);
        self
    }
}

/// Echo of the input plus the resolved time and lunar date.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BasicInfo {
    pub gender: Gender,
    pub birth_date: String,
    pub birth_time: String,
    pub birth_place: Option<String>,
    pub longitude: f64,
    /// True solar time, `YYYY-MM-DD HH:MM:SS`.
    pub true_solar_time: String,
    /// e.g. `庚辰年十一月廿三卯时`
    pub lunar_date: String,
}

/// One entry of the annual list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LiunianEntry {
    pub year: i32,
    pub ganzhi: GanZhi,
    /// Ten-God of the year stem relative to the Day Master.
    pub relation: TenGod,
}

/// Everything derived from one birth input.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BaziContext {
    pub basic: BasicInfo,
    pub chart: BaziChart,
    /// The four pillars with their element labels.
    pub pillars: [PillarDetail; 4],
    pub elements: ElementalProfile,
    pub day_master: Stem,
    pub day_master_element: Element,
    pub strength: Strength,
    pub favorable: [Element; 2],
    pub unfavorable: [Element; 2],
    pub pattern: Pattern,
    pub decades: DecadeSequence,
    pub current_decade: Option<LuckPillar>,
    pub liunian: Vec<LiunianEntry>,
    pub current_year: i32,
}

/// Calculate with the built-in city table.
pub fn calculate(
    input: &BirthInput,
    config: &BaziConfig,
    current_year: i32,
) -> Result<BaziContext> {
    calculate_with(input, config, current_year, &CityTable::builtin())
}

/// Calculate with a caller-supplied place lookup.
///
/// # Errors
/// - [`BaziError::InvalidDate`](crate::BaziError::InvalidDate) and
///   [`BaziError::InvalidTimeFormat`](crate::BaziError::InvalidTimeFormat)
///   for malformed input;
/// - [`BaziError::CalendricalResolution`](crate::BaziError::CalendricalResolution)
///   outside the supported years or for an impossible longitude.
pub fn calculate_with<L: LongitudeLookup + ?Sized>(
    input: &BirthInput,
    config: &BaziConfig,
    current_year: i32,
    lookup: &L,
) -> Result<BaziContext> {
    let longitude = match input.longitude {
        Some(lon) => lon,
        None => resolve_longitude(lookup, input.birth_place.as_deref(), config.default_longitude),
    };
    let timestamp = resolve(&input.birth_date, &input.birth_time, longitude, config)?;
    let chart = BaziChart::build(&timestamp, config)?;

    let analysis = analyze(&chart, &config.hidden_stems, &config.strength);
    let pattern = classify(&chart);
    let decades = sequence_for_chart(&chart, input.gender, config.start_age);
    let current_decade = decades.current(current_year).copied();

    let day_master = chart.day_master();
    let radius = config.liunian_radius.max(0);
    let liunian = (current_year - radius..=current_year + radius)
        .map(|year| {
            let ganzhi = GanZhi::of_year(year);
            LiunianEntry {
                year,
                ganzhi,
                relation: ten_god(day_master, ganzhi.stem),
            }
        })
        .collect();

    let basic = BasicInfo {
        gender: input.gender,
        birth_date: input.birth_date.clone(),
        birth_time: input.birth_time.clone(),
        birth_place: input.birth_place.clone(),
        longitude,
        true_solar_time: timestamp.corrected.format("%Y-%m-%d %H:%M:%S").to_string(),
        lunar_date: chart.lunar_label(),
    };

    log::debug!(
        "context: {chart}, {day_master}{} {}, {}",
        day_master.element(),
        analysis.strength,
        pattern
    );

    Ok(BaziContext {
        basic,
        pillars: chart.details(),
        chart,
        elements: analysis.profile,
        day_master,
        day_master_element: day_master.element(),
        strength: analysis.strength,
        favorable: analysis.elements.favorable,
        unfavorable: analysis.elements.unfavorable,
        pattern,
        decades,
        current_decade,
        liunian,
        current_year,
    })
}

impl BaziContext {
    /// The favorable and unfavorable sets together.
    #[inline]
    pub fn element_sets(&self) -> ElementSets {
        ElementSets {
            favorable: self.favorable,
            unfavorable: self.unfavorable,
        }
    }

    /// Inputs of the annual scorer for this chart.
    pub fn scoring_basis(&self) -> ScoringBasis {
        ScoringBasis {
            day_master: self.day_master,
            day_branch: self.chart.day.branch,
            elements: self.element_sets(),
        }
    }

    /// Scores of the liunian window, using the configured rules.
    pub fn timeline(&self, config: &BaziConfig) -> BTreeMap<i32, AnnualScore> {
        let years: Vec<i32> = self.liunian.iter().map(|entry| entry.year).collect();
        score_years(&years, self, &config.scoring)
    }

    /// The compact record handed to the narrative layer first.
    pub fn summary(&self) -> ContextSummary {
        ContextSummary {
            chart: self.chart.formatted(),
            day_master: format!("{}{}", self.day_master, self.day_master_element),
            strength: self.strength,
            pattern: self.pattern,
            favorable: self.favorable,
            unfavorable: self.unfavorable,
            current_decade: self.current_decade.map(|d| d.pillar),
        }
    }
}

/// Short summary of a [`BaziContext`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContextSummary {
    pub chart: String,
    /// Day Master with its element, e.g. `庚金`.
    pub day_master: String,
    pub strength: Strength,
    pub pattern: Pattern,
    pub favorable: [Element; 2],
    pub unfavorable: [Element; 2],
    pub current_decade: Option<GanZhi>,
}

impl Display for ContextSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "八字 {} | 日主 {} {} | {} | 喜 {}{} 忌 {}{}",
            self.chart,
            self.day_master,
            self.strength,
            self.pattern,
            self.favorable[0],
            self.favorable[1],
            self.unfavorable[0],
            self.unfavorable[1],
        )?;
        if let Some(decade) = self.current_decade {
            write!(f, " | 大运 {decade}")?;
        }
        Ok(())
    }
}
