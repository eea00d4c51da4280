// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! BaZi (Four Pillars) engine.
//!
//! Turns a birth date, time, gender and place into a four-pillar chart and
//! the analyses layered on it: elemental balance, Day Master strength,
//! favorable elements, pattern, the eight luck decades and annual scores.
//!
//! # Pipeline
//!
//! | Stage | Module | Output |
//! |-------|--------|--------|
//! | Parse and correct to true solar time | [`resolver`] | [`CorrectedTimestamp`] |
//! | Four pillars from solar terms | [`pillars`] | [`BaziChart`] |
//! | Elemental profile and strength | [`strength`] | [`StrengthAnalysis`] |
//! | Pattern | [`pattern`] | [`Pattern`] |
//! | Luck decades | [`luck`] | [`DecadeSequence`] |
//! | Aggregate | [`context`] | [`BaziContext`] |
//! | Annual scores | [`timeline`] | [`AnnualScore`] |
//!
//! # Time
//!
//! Month and year boundaries come from the apparent solar longitude, so the
//! [`time`] module carries typed instants ([`Time<S>`](time::Time)) on the
//! [`UT`](time::UT) and [`TT`](time::TT) scales, with ΔT applied between them.
//!
//! # Example
//!
//! ```
//! use ganzhi::{calculate, BaziConfig, BirthInput, Gender};
//!
//! let input = BirthInput::new("2000-12-18", "07:20", Gender::Male).with_place("赣州");
//! let ctx = calculate(&input, &BaziConfig::default(), 2026).unwrap();
//! assert_eq!(ctx.chart.formatted(), "庚辰 戊子 庚戌 己卯");
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod ganzhi;
pub mod luck;
pub mod pattern;
pub mod pillars;
pub mod places;
pub mod relations;
pub mod resolver;
pub mod strength;
pub mod tags;
pub mod time;
pub mod timeline;

// ── Re-exports ────────────────────────────────────────────────────────────

pub use config::{
    BaziConfig, HiddenStemWeights, ScoringRules, StartAgeRule, StrengthWeights, ZiHourPolicy,
};
pub use context::{calculate, calculate_with, BaziContext, BirthInput, ContextSummary};
pub use error::{BaziError, Result};
pub use ganzhi::{Branch, Element, GanZhi, Polarity, Stem};
pub use luck::{DecadeSequence, Direction, Gender, LuckPillar, StartAge};
pub use pattern::Pattern;
pub use pillars::{BaziChart, Pillar, PillarDetail, PillarPosition};
pub use places::{CityTable, LongitudeLookup};
pub use relations::{ten_god, BranchRelation, ElementRelation, TenGod};
pub use resolver::CorrectedTimestamp;
pub use strength::{ElementSets, ElementalProfile, Strength, StrengthAnalysis};
pub use time::lunar::LunarDate;
pub use time::solar::SolarTerm;
pub use timeline::{score_year, score_years, AnnualScore, FortuneLevel, ScoreRequest};
