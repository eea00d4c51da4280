// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Tunable constants of the calculation.
//!
//! Every rule with a schooling-dependent choice lives here instead of being
//! hard-coded, so two charts computed with the same [`BaziConfig`] are always
//! identical.  [`BaziConfig::default`] reproduces the conventional values:
//!
//! | Field | Default |
//! |-------|---------|
//! | `reference_meridian` | 120° E (China Standard Time) |
//! | `default_longitude` | 120° E |
//! | `zi_hour` | [`ZiHourPolicy::NextDay`] |
//! | `start_age` | [`StartAgeRule::SolarTerm`] |
//! | `strength` | seasonal support 40, per unit 10 |
//! | `hidden_stems` | primary 1.0, secondary 0.3 |
//! | `liunian_radius` | 10 (a 21-year window) |
//! | `scoring` | base 50, clamped to `[25, 75]` |

/// How the late Zi hour (23:00–23:59) is assigned to a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ZiHourPolicy {
    /// 23:00 starts the next day: Day and Hour pillars both roll over.
    #[default]
    NextDay,
    /// The Day pillar stays on the civil day; only the Hour stem is taken
    /// from the following day (早晚子时).
    SameDay,
}

/// How the age at which the first decade begins is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StartAgeRule {
    /// Distance to the adjacent sectional term, three days to a year.
    #[default]
    SolarTerm,
    /// A fixed starting age for every chart.
    Fixed(u32),
}

/// Weights of the Strong/Weak balance.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StrengthWeights {
    /// Added to the supporting side when the month branch supports the Day Master.
    pub seasonal_support: f64,
    /// Added per unit of elemental weight.
    pub per_unit: f64,
}

impl Default for StrengthWeights {
    fn default() -> Self {
        Self {
            seasonal_support: 40.0,
            per_unit: 10.0,
        }
    }
}

/// Weights given to the stems hidden in each branch.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HiddenStemWeights {
    pub primary: f64,
    pub secondary: f64,
}

impl Default for HiddenStemWeights {
    fn default() -> Self {
        Self {
            primary: 1.0,
            secondary: 0.3,
        }
    }
}

/// Point deltas of the annual scorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoringRules {
    pub base: i32,
    pub min_score: i32,
    pub max_score: i32,

    // Year stem against the Day Master.
    pub stem_generates_day_master: i32,
    pub stem_same_as_day_master: i32,
    pub day_master_generates_stem: i32,
    pub day_master_controls_stem: i32,
    pub stem_controls_day_master: i32,

    // Year branch against the day branch.
    pub six_combination: i32,
    pub three_combination: i32,
    pub six_clash: i32,
    pub punishment: i32,
    pub harm: i32,

    // Favorable / unfavorable membership.
    pub favorable_stem: i32,
    pub favorable_branch: i32,

    // Current decade.
    pub decade_favorable_stem: i32,
    pub decade_branch_combination: i32,
    pub decade_branch_clash: i32,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            base: 50,
            min_score: 25,
            max_score: 75,
            stem_generates_day_master: 10,
            stem_same_as_day_master: 5,
            day_master_generates_stem: 0,
            day_master_controls_stem: 5,
            stem_controls_day_master: -10,
            six_combination: 8,
            three_combination: 5,
            six_clash: -10,
            punishment: -5,
            harm: -5,
            favorable_stem: 5,
            favorable_branch: 3,
            decade_favorable_stem: 3,
            decade_branch_combination: 3,
            decade_branch_clash: -5,
        }
    }
}

/// Complete configuration of a calculation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BaziConfig {
    /// Meridian of the civil time zone the birth time is given in, degrees east.
    pub reference_meridian: f64,
    /// Longitude used when no place is given or the place is unknown.
    pub default_longitude: f64,
    pub zi_hour: ZiHourPolicy,
    pub start_age: StartAgeRule,
    pub strength: StrengthWeights,
    pub hidden_stems: HiddenStemWeights,
    /// Years either side of the current year listed in the liunian window.
    pub liunian_radius: i32,
    pub scoring: ScoringRules,
}

impl Default for BaziConfig {
    fn default() -> Self {
        Self {
            reference_meridian: 120.0,
            default_longitude: 120.0,
            zi_hour: ZiHourPolicy::default(),
            start_age: StartAgeRule::default(),
            strength: StrengthWeights::default(),
            hidden_stems: HiddenStemWeights::default(),
            liunian_radius: 10,
            scoring: ScoringRules::default(),
        }
    }
}

impl BaziConfig {
    pub fn with_reference_meridian(mut self, degrees: f64) -> Self {
        self.reference_meridian = degrees;
        self
    }

    pub fn with_default_longitude(mut self, degrees: f64) -> Self {
        self.default_longitude = degrees;
        self
    }

    pub fn with_zi_hour(mut self, policy: ZiHourPolicy) -> Self {
        self.zi_hour = policy;
        self
    }

    pub fn with_start_age(mut self, rule: StartAgeRule) -> Self {
        self.start_age = rule;
        self
    }

    pub fn with_strength(mut self, weights: StrengthWeights) -> Self {
        self.strength = weights;
        self
    }

    pub fn with_hidden_stems(mut self, weights: HiddenStemWeights) -> Self {
        self.hidden_stems = weights;
        self
    }

    /// Negative radii are treated as zero.
    pub fn with_liunian_radius(mut self, radius: i32) -> Self {
        self.liunian_radius = radius.max(0);
        self
    }

    pub fn with_scoring(mut self, rules: ScoringRules) -> Self {
        self.scoring = rules;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_conventional_rules() {
        let config = BaziConfig::default();
        assert_eq!(config.reference_meridian, 120.0);
        assert_eq!(config.zi_hour, ZiHourPolicy::NextDay);
        assert_eq!(config.start_age, StartAgeRule::SolarTerm);
        assert_eq!(config.liunian_radius, 10);
        assert_eq!(config.scoring.base, 50);
        assert_eq!((config.scoring.min_score, config.scoring.max_score), (25, 75));
        assert_eq!(config.hidden_stems.secondary, 0.3);
    }

    #[test]
    fn builders_override_single_fields() {
        let config = BaziConfig::default()
            .with_zi_hour(ZiHourPolicy::SameDay)
            .with_start_age(StartAgeRule::Fixed(6))
            .with_liunian_radius(-3);
        assert_eq!(config.zi_hour, ZiHourPolicy::SameDay);
        assert_eq!(config.start_age, StartAgeRule::Fixed(6));
        assert_eq!(config.liunian_radius, 0);
        assert_eq!(config.default_longitude, 120.0);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn config_roundtrips_through_json() {
        let config = BaziConfig::default().with_start_age(StartAgeRule::Fixed(6));
        let json = serde_json::to_string(&config).unwrap();
        let back: BaziConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
