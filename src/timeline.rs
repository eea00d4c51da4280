// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Annual (流年) scoring.
//!
//! A year is scored from its sexagenary pillar against the Day Master, the
//! day branch, the favorable sets and the decade in force.  Scores start at
//! a base of 50 and are clamped to `[25, 75]`; the default rules are listed
//! on [`ScoringRules`].
//!
//! ## Levels
//!
//! | Score | Level |
//! |-------|-------|
//! | ≤ 28    | 大凶 |
//! | 29 – 36 | 中凶 |
//! | 37 – 45 | 小凶 |
//! | 46 – 54 | 平   |
//! | 55 – 63 | 小吉 |
//! | 64 – 71 | 中吉 |
//! | ≥ 72    | 大吉 |
//!
//! The clamp keeps the extreme bands narrow: only a handful of year/chart
//! combinations reach them.

use crate::config::ScoringRules;
use crate::context::BaziContext;
use crate::error::{BaziError, Result};
use crate::ganzhi::{Branch, Element, GanZhi, Stem};
use crate::pillars::Pillar;
use crate::relations::{
    is_clash, is_harm, is_punishment, is_six_combination, is_three_combination, ElementRelation,
};
use crate::strength::ElementSets;
use crate::tags::event_tag;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

// ═══════════════════════════════════════════════════════════════════════════
// FortuneLevel
// ═══════════════════════════════════════════════════════════════════════════

/// Seven ordered fortune bands, worst first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FortuneLevel {
    DaXiong,
    ZhongXiong,
    XiaoXiong,
    Ping,
    XiaoJi,
    ZhongJi,
    DaJi,
}

impl FortuneLevel {
    pub const ALL: [FortuneLevel; 7] = [
        Self::DaXiong,
        Self::ZhongXiong,
        Self::XiaoXiong,
        Self::Ping,
        Self::XiaoJi,
        Self::ZhongJi,
        Self::DaJi,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::DaXiong => "大凶",
            Self::ZhongXiong => "中凶",
            Self::XiaoXiong => "小凶",
            Self::Ping => "平",
            Self::XiaoJi => "小吉",
            Self::ZhongJi => "中吉",
            Self::DaJi => "大吉",
        }
    }

    /// Band of an annual score on the clamped `[25, 75]` scale.
    pub const fn from_score(score: i32) -> Self {
        match score {
            i32::MIN..=28 => Self::DaXiong,
            29..=36 => Self::ZhongXiong,
            37..=45 => Self::XiaoXiong,
            46..=54 => Self::Ping,
            55..=63 => Self::XiaoJi,
            64..=71 => Self::ZhongJi,
            _ => Self::DaJi,
        }
    }

    /// Band of a score on the `0..=100` scale used by narrative timelines.
    pub const fn from_percent(score: i32) -> Self {
        match score {
            95.. => Self::DaJi,
            85..=94 => Self::ZhongJi,
            70..=84 => Self::XiaoJi,
            40..=69 => Self::Ping,
            25..=39 => Self::XiaoXiong,
            15..=24 => Self::ZhongXiong,
            _ => Self::DaXiong,
        }
    }

    #[inline]
    pub fn is_auspicious(self) -> bool {
        self > Self::Ping
    }
}

impl Display for FortuneLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FortuneLevel {
    type Err = BaziError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.name() == s.trim())
            .ok_or_else(|| BaziError::InvalidElementOrRelation(format!("unknown level {s:?}")))
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Scoring
// ═══════════════════════════════════════════════════════════════════════════

/// Score of one year.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnnualScore {
    pub year: i32,
    pub pillar: Pillar,
    pub score: i32,
    pub level: FortuneLevel,
    /// Short event tags; empty when the birth year is unknown or later.
    pub tags: Vec<String>,
}

/// Everything a year is scored against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringBasis {
    pub day_master: Stem,
    pub day_branch: Branch,
    pub elements: ElementSets,
}

/// Points for the year stem against the Day Master.
fn stem_points(day_master: Element, year_stem: Element, rules: &ScoringRules) -> i32 {
    match ElementRelation::of(day_master, year_stem) {
        ElementRelation::Resource => rules.stem_generates_day_master,
        ElementRelation::Companion => rules.stem_same_as_day_master,
        ElementRelation::Output => rules.day_master_generates_stem,
        ElementRelation::Wealth => rules.day_master_controls_stem,
        ElementRelation::Power => rules.stem_controls_day_master,
    }
}

/// Cumulative points for the year branch against the day branch.
fn branch_points(day_branch: Branch, year_branch: Branch, rules: &ScoringRules) -> i32 {
    let mut points = 0;
    if is_six_combination(day_branch, year_branch) {
        points += rules.six_combination;
    }
    if is_three_combination(day_branch, year_branch) {
        points += rules.three_combination;
    }
    if is_clash(day_branch, year_branch) {
        points += rules.six_clash;
    }
    if is_punishment(day_branch, year_branch) {
        points += rules.punishment;
    }
    if is_harm(day_branch, year_branch) {
        points += rules.harm;
    }
    points
}

/// `+bonus` for a favorable element, `−bonus` for an unfavorable one.
#[inline]
fn membership(elements: &ElementSets, element: Element, bonus: i32) -> i32 {
    if elements.is_favorable(element) {
        bonus
    } else if elements.is_unfavorable(element) {
        -bonus
    } else {
        0
    }
}

/// Points from the decade in force.
fn decade_points(
    elements: &ElementSets,
    decade_stem: Option<Stem>,
    decade_branch: Option<Branch>,
    year_branch: Branch,
    rules: &ScoringRules,
) -> i32 {
    let mut points = 0;
    if let Some(stem) = decade_stem {
        points += membership(elements, stem.element(), rules.decade_favorable_stem);
    }
    if let Some(branch) = decade_branch {
        if is_six_combination(branch, year_branch) {
            points += rules.decade_branch_combination;
        }
        if is_clash(branch, year_branch) {
            points += rules.decade_branch_clash;
        }
    }
    points
}

/// Raw (unclamped) score of a year pillar.
pub fn raw_score(
    pillar: Pillar,
    basis: &ScoringBasis,
    decade_stem: Option<Stem>,
    decade_branch: Option<Branch>,
    rules: &ScoringRules,
) -> i32 {
    let stem = stem_points(basis.day_master.element(), pillar.stem.element(), rules);
    let branch = branch_points(basis.day_branch, pillar.branch, rules);
    let favorable = membership(&basis.elements, pillar.stem.element(), rules.favorable_stem)
        + membership(&basis.elements, pillar.branch.element(), rules.favorable_branch);
    let decade = decade_points(&basis.elements, decade_stem, decade_branch, pillar.branch, rules);
    let total = rules.base + stem + branch + favorable + decade;
    log::trace!(
        "{pillar}: base {} stem {stem:+} branch {branch:+} sets {favorable:+} decade {decade:+} = {total}",
        rules.base
    );
    total
}

/// Score of `year` with an optional decade pillar, clamped and banded.
pub fn score(
    year: i32,
    basis: &ScoringBasis,
    decade: Option<Pillar>,
    rules: &ScoringRules,
) -> AnnualScore {
    let pillar = GanZhi::of_year(year);
    let raw = raw_score(
        pillar,
        basis,
        decade.map(|d| d.stem),
        decade.map(|d| d.branch),
        rules,
    );
    banded(year, pillar, raw, rules)
}

fn banded(year: i32, pillar: Pillar, raw: i32, rules: &ScoringRules) -> AnnualScore {
    let score = raw.clamp(rules.min_score, rules.max_score);
    AnnualScore {
        year,
        pillar,
        score,
        level: FortuneLevel::from_score(score),
        tags: Vec::new(),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Label-based request
// ═══════════════════════════════════════════════════════════════════════════

/// A scoring request expressed with Chinese labels, as exchanged with the
/// narrative layer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoreRequest {
    pub year: i32,
    pub day_master: String,
    pub day_branch: String,
    pub favorable: Vec<String>,
    pub unfavorable: Vec<String>,
    pub dayun_stem: Option<String>,
    pub dayun_branch: Option<String>,
}

/// Parse a two-element set; exactly two distinct labels are required.
fn parse_set(labels: &[String], what: &str) -> Result<[Element; 2]> {
    let elements = labels
        .iter()
        .map(|l| l.parse::<Element>())
        .collect::<Result<Vec<_>>>()?;
    match elements.as_slice() {
        &[a, b] if a != b => Ok([a, b]),
        _ => Err(BaziError::InvalidElementOrRelation(format!(
            "{what} needs two distinct elements, got {labels:?}"
        ))),
    }
}

/// Score one year from labels.
///
/// # Errors
/// [`BaziError::InvalidElementOrRelation`] for any label that is not a
/// stem, branch or element, or for overlapping favorable/unfavorable sets.
pub fn score_year(request: &ScoreRequest, rules: &ScoringRules) -> Result<AnnualScore> {
    let favorable = parse_set(&request.favorable, "favorable")?;
    let unfavorable = parse_set(&request.unfavorable, "unfavorable")?;
    if favorable.iter().any(|e| unfavorable.contains(e)) {
        return Err(BaziError::InvalidElementOrRelation(
            "favorable and unfavorable sets overlap".into(),
        ));
    }
    let basis = ScoringBasis {
        day_master: request.day_master.parse()?,
        day_branch: request.day_branch.parse()?,
        elements: ElementSets {
            favorable,
            unfavorable,
        },
    };
    let decade_stem = request.dayun_stem.as_deref().map(str::parse::<Stem>).transpose()?;
    let decade_branch = request.dayun_branch.as_deref().map(str::parse::<Branch>).transpose()?;

    let pillar = GanZhi::of_year(request.year);
    let raw = raw_score(pillar, &basis, decade_stem, decade_branch, rules);
    Ok(banded(request.year, pillar, raw, rules))
}

/// Score several years of a calculated chart, each against the decade
/// running in that year, with event tags.
pub fn score_years(
    years: &[i32],
    context: &BaziContext,
    rules: &ScoringRules,
) -> BTreeMap<i32, AnnualScore> {
    let basis = context.scoring_basis();
    let birth_year = context.decades.birth_year;
    years
        .iter()
        .map(|&year| {
            let decade = context.decades.at_year(year).map(|d| d.pillar);
            let mut annual = score(year, &basis, decade, rules);
            annual.tags = event_tag(year, birth_year, annual.score)
                .map(|tag| vec![tag.to_string()])
                .unwrap_or_default();
            (year, annual)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strength::Strength;

    fn basis(dm: Stem, branch: Branch, strength: Strength) -> ScoringBasis {
        ScoringBasis {
            day_master: dm,
            day_branch: branch,
            elements: ElementSets::for_day_master(dm.element(), strength),
        }
    }

    #[test]
    fn test_band_thresholds() {
        let expected = [
            (25, FortuneLevel::DaXiong),
            (28, FortuneLevel::DaXiong),
            (29, FortuneLevel::ZhongXiong),
            (36, FortuneLevel::ZhongXiong),
            (37, FortuneLevel::XiaoXiong),
            (45, FortuneLevel::XiaoXiong),
            (46, FortuneLevel::Ping),
            (54, FortuneLevel::Ping),
            (55, FortuneLevel::XiaoJi),
            (63, FortuneLevel::XiaoJi),
            (64, FortuneLevel::ZhongJi),
            (71, FortuneLevel::ZhongJi),
            (72, FortuneLevel::DaJi),
            (75, FortuneLevel::DaJi),
        ];
        for (score, level) in expected {
            assert_eq!(FortuneLevel::from_score(score), level, "{score}");
        }
    }

    #[test]
    fn test_percent_scale() {
        assert_eq!(FortuneLevel::from_percent(95), FortuneLevel::DaJi);
        assert_eq!(FortuneLevel::from_percent(85), FortuneLevel::ZhongJi);
        assert_eq!(FortuneLevel::from_percent(70), FortuneLevel::XiaoJi);
        assert_eq!(FortuneLevel::from_percent(40), FortuneLevel::Ping);
        assert_eq!(FortuneLevel::from_percent(25), FortuneLevel::XiaoXiong);
        assert_eq!(FortuneLevel::from_percent(15), FortuneLevel::ZhongXiong);
        assert_eq!(FortuneLevel::from_percent(14), FortuneLevel::DaXiong);
    }

    #[test]
    fn test_worked_example() {
        // Day Master 庚 (Weak, favorable 土金), day branch 戌, year 2024 甲辰:
        //   甲 Wood: Day Master controls it          +5
        //   辰 vs 戌: six-clash                      −10
        //   甲 Wood unfavorable −5, 辰 Earth favorable +3
        let b = basis(Stem::Geng, Branch::Xu, Strength::Weak);
        let s = score(2024, &b, None, &ScoringRules::default());
        assert_eq!(s.pillar.to_string(), "甲辰");
        assert_eq!(s.score, 50 + 5 - 10 - 5 + 3);
        assert_eq!(s.level, FortuneLevel::XiaoXiong);
    }

    #[test]
    fn test_decade_contribution() {
        // Decade 己丑 with day master 庚 Weak: 己 Earth favorable +3;
        // 丑 vs 子 (2020 庚子) six-combination +3.
        let b = basis(Stem::Geng, Branch::Xu, Strength::Weak);
        let rules = ScoringRules::default();
        let without = score(2020, &b, None, &rules);
        let with = score(2020, &b, Some("己丑".parse().unwrap()), &rules);
        assert_eq!(with.score - without.score, 6);
    }

    #[test]
    fn test_scores_stay_in_range_for_every_combination() {
        let rules = ScoringRules::default();
        for dm in Stem::ALL {
            for branch in Branch::ALL {
                for strength in [Strength::Strong, Strength::Weak] {
                    let b = basis(dm, branch, strength);
                    for year in 1984..2044 {
                        for decade in (0..60).map(GanZhi::from_index).map(Some).chain([None]) {
                            let s = score(year, &b, decade, &rules);
                            assert!((25..=75).contains(&s.score));
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_label_request() {
        let request = ScoreRequest {
            year: 2024,
            day_master: "庚".into(),
            day_branch: "戌".into(),
            favorable: vec!["土".into(), "金".into()],
            unfavorable: vec!["木".into(), "水".into()],
            dayun_stem: None,
            dayun_branch: None,
        };
        let s = score_year(&request, &ScoringRules::default()).unwrap();
        assert_eq!(s.score, 43);

        let bad = ScoreRequest {
            day_master: "X".into(),
            ..request.clone()
        };
        assert!(matches!(
            score_year(&bad, &ScoringRules::default()),
            Err(BaziError::InvalidElementOrRelation(_))
        ));

        let overlapping = ScoreRequest {
            unfavorable: vec!["土".into(), "水".into()],
            ..request
        };
        assert!(score_year(&overlapping, &ScoringRules::default()).is_err());
    }
}
