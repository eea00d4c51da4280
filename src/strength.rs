// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Elemental balance of a chart and the Day Master's strength.
//!
//! Each of the four stems counts 1.0 for its element; each branch counts
//! through its hidden stems (primary 1.0, secondaries 0.3 by default).  The
//! Day Master is supported by its own element and by the element generating
//! it; the other three elements oppose it.
//!
//! ```text
//! support  = [month branch supports] × 40 + 10 × Σ weight(supporting elements)
//! opposing = [month branch opposes]  × 40 + 10 × Σ weight(other elements)
//! Strong  ⇔ support ≥ opposing
//! ```

use crate::config::{HiddenStemWeights, StrengthWeights};
use crate::ganzhi::Element;
use crate::pillars::{weighted_hidden_stems, BaziChart};
use std::fmt::{Display, Formatter};
use std::ops::Index;

// ═══════════════════════════════════════════════════════════════════════════
// ElementalProfile
// ═══════════════════════════════════════════════════════════════════════════

/// Weighted count per element.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElementalProfile {
    pub wood: f64,
    pub fire: f64,
    pub earth: f64,
    pub metal: f64,
    pub water: f64,
}

impl ElementalProfile {
    /// Profile of a chart under the given hidden-stem weights.
    pub fn of_chart(chart: &BaziChart, weights: &HiddenStemWeights) -> Self {
        let mut profile = Self::default();
        for pillar in chart.pillars() {
            profile.add(pillar.stem.element(), 1.0);
            for (stem, weight) in weighted_hidden_stems(pillar.branch, weights) {
                profile.add(stem.element(), weight);
            }
        }
        profile
    }

    #[inline]
    fn slot(&self, element: Element) -> &f64 {
        match element {
            Element::Wood => &self.wood,
            Element::Fire => &self.fire,
            Element::Earth => &self.earth,
            Element::Metal => &self.metal,
            Element::Water => &self.water,
        }
    }

    #[inline]
    fn add(&mut self, element: Element, weight: f64) {
        let slot = match element {
            Element::Wood => &mut self.wood,
            Element::Fire => &mut self.fire,
            Element::Earth => &mut self.earth,
            Element::Metal => &mut self.metal,
            Element::Water => &mut self.water,
        };
        *slot += weight;
    }

    /// Weighted count of one element.
    #[inline]
    pub fn get(&self, element: Element) -> f64 {
        *self.slot(element)
    }

    /// Sum over all elements.
    pub fn total(&self) -> f64 {
        self.wood + self.fire + self.earth + self.metal + self.water
    }

    /// `(element, count)` pairs in generating order.
    pub fn iter(&self) -> impl Iterator<Item = (Element, f64)> + '_ {
        Element::ALL.into_iter().map(|e| (e, self.get(e)))
    }

    /// The element with the largest count (first in generating order on ties).
    pub fn dominant(&self) -> Element {
        self.iter()
            .fold((Element::Wood, f64::MIN), |best, (e, n)| {
                if n > best.1 {
                    (e, n)
                } else {
                    best
                }
            })
            .0
    }

    /// Elements with a zero count.
    pub fn missing(&self) -> Vec<Element> {
        self.iter().filter(|&(_, n)| n == 0.0).map(|(e, _)| e).collect()
    }
}

impl Index<Element> for ElementalProfile {
    type Output = f64;

    fn index(&self, element: Element) -> &f64 {
        self.slot(element)
    }
}

impl Display for ElementalProfile {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (e, n) in self.iter() {
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "{e}{n:.1}")?;
            first = false;
        }
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Strength
// ═══════════════════════════════════════════════════════════════════════════

/// Strong (身强) or Weak (身弱) Day Master.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Strength {
    Strong,
    Weak,
}

impl Strength {
    /// Ties go to Strong.
    #[inline]
    fn from_balance(support: f64, opposing: f64) -> Self {
        if support >= opposing {
            Self::Strong
        } else {
            Self::Weak
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Strong => "身强",
            Self::Weak => "身弱",
        }
    }
}

impl Display for Strength {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether `element` supports a Day Master of element `day_master`.
#[inline]
fn supports(day_master: Element, element: Element) -> bool {
    element == day_master || element == day_master.generated_by()
}

/// The two sides of the balance, `(support, opposing)`.
pub fn balance(
    profile: &ElementalProfile,
    month_element: Element,
    day_master: Element,
    weights: &StrengthWeights,
) -> (f64, f64) {
    let (mut support, mut opposing) = (0.0, 0.0);
    if supports(day_master, month_element) {
        support += weights.seasonal_support;
    } else {
        opposing += weights.seasonal_support;
    }
    for (element, count) in profile.iter() {
        if supports(day_master, element) {
            support += weights.per_unit * count;
        } else {
            opposing += weights.per_unit * count;
        }
    }
    (support, opposing)
}

/// Classify the Day Master.
pub fn classify(
    profile: &ElementalProfile,
    month_element: Element,
    day_master: Element,
    weights: &StrengthWeights,
) -> Strength {
    let (support, opposing) = balance(profile, month_element, day_master, weights);
    Strength::from_balance(support, opposing)
}

// ═══════════════════════════════════════════════════════════════════════════
// Favorable elements
// ═══════════════════════════════════════════════════════════════════════════

/// Favorable (喜用) and unfavorable (忌) elements, two each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElementSets {
    pub favorable: [Element; 2],
    pub unfavorable: [Element; 2],
}

impl ElementSets {
    /// A strong Day Master wants the elements it controls and generates; a
    /// weak one wants its resource and its own element.
    pub const fn for_day_master(day_master: Element, strength: Strength) -> Self {
        let draining = [day_master.controls(), day_master.generates()];
        let supporting = [day_master.generated_by(), day_master];
        match strength {
            Strength::Strong => Self {
                favorable: draining,
                unfavorable: supporting,
            },
            Strength::Weak => Self {
                favorable: supporting,
                unfavorable: draining,
            },
        }
    }

    #[inline]
    pub fn is_favorable(&self, element: Element) -> bool {
        self.favorable.contains(&element)
    }

    #[inline]
    pub fn is_unfavorable(&self, element: Element) -> bool {
        self.unfavorable.contains(&element)
    }
}

/// Full result of the strength analysis.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StrengthAnalysis {
    pub profile: ElementalProfile,
    pub strength: Strength,
    pub support: f64,
    pub opposing: f64,
    pub elements: ElementSets,
}

/// Profile, strength and favorable sets of a chart.
pub fn analyze(
    chart: &BaziChart,
    hidden: &HiddenStemWeights,
    weights: &StrengthWeights,
) -> StrengthAnalysis {
    let profile = ElementalProfile::of_chart(chart, hidden);
    let day_master = chart.day_master_element();
    let month_element = chart.month.branch.element();
    let (support, opposing) = balance(&profile, month_element, day_master, weights);
    let strength = Strength::from_balance(support, opposing);
    StrengthAnalysis {
        profile,
        strength,
        support,
        opposing,
        elements: ElementSets::for_day_master(day_master, strength),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BaziConfig;
    use crate::pillars::BaziChart;
    use crate::resolver::resolve;
    use approx::assert_abs_diff_eq;

    fn chart(date: &str, time: &str, lon: f64) -> BaziChart {
        let config = BaziConfig::default();
        BaziChart::build(&resolve(date, time, lon, &config).unwrap(), &config).unwrap()
    }

    #[test]
    fn test_profile_conserves_weight() {
        let hidden = HiddenStemWeights::default();
        let c = chart("2000-12-18", "07:20", 114.93);
        let profile = ElementalProfile::of_chart(&c, &hidden);
        let expected: f64 = 4.0
            + c.pillars()
                .iter()
                .map(|p| 1.0 + 0.3 * (p.branch.hidden_stems().len() - 1) as f64)
                .sum::<f64>();
        assert_abs_diff_eq!(profile.total(), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_profile_of_known_chart() {
        // 庚辰 戊子 庚戌 己卯: stems 金 土 金 土; 辰 戊乙癸, 子 癸, 戌 戊辛丁, 卯 乙.
        let c = chart("2000-12-18", "07:20", 114.93);
        let p = ElementalProfile::of_chart(&c, &HiddenStemWeights::default());
        assert_abs_diff_eq!(p[Element::Metal], 2.3, epsilon = 1e-9);
        assert_abs_diff_eq!(p[Element::Earth], 4.0, epsilon = 1e-9);
        assert_abs_diff_eq!(p[Element::Water], 1.3, epsilon = 1e-9);
        assert_abs_diff_eq!(p[Element::Wood], 1.3, epsilon = 1e-9);
        assert_abs_diff_eq!(p[Element::Fire], 0.3, epsilon = 1e-9);
        assert_eq!(p.dominant(), Element::Earth);
        assert!(p.missing().is_empty());
        assert_eq!(p.metal, p.get(Element::Metal));
        assert_eq!(p.to_string(), "木1.3 火0.3 土4.0 金2.3 水1.3");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_profile_serializes_by_element_name() {
        let c = chart("2000-12-18", "07:20", 114.93);
        let p = ElementalProfile::of_chart(&c, &HiddenStemWeights::default());
        let json = serde_json::to_value(p).unwrap();
        assert_eq!(json["earth"], serde_json::json!(4.0));
        assert_eq!(json["fire"].as_f64().map(|f| (f * 10.0).round()), Some(3.0));
        assert!(json.get("counts").is_none());
    }

    #[test]
    fn test_known_chart_is_weak() {
        // Metal Day Master in a Water month: season opposes (40), but
        // 金 2.3 + 土 4.0 give 63 against 29 + 40 = 69 → Weak.
        let c = chart("2000-12-18", "07:20", 114.93);
        let a = analyze(
            &c,
            &HiddenStemWeights::default(),
            &StrengthWeights::default(),
        );
        assert_abs_diff_eq!(a.support, 63.0, epsilon = 1e-9);
        assert_abs_diff_eq!(a.opposing, 69.0, epsilon = 1e-9);
        assert_eq!(a.strength, Strength::Weak);
        assert_eq!(a.elements.favorable, [Element::Earth, Element::Metal]);
        assert_eq!(a.elements.unfavorable, [Element::Wood, Element::Water]);
    }

    #[test]
    fn test_metal_strong_prefers_wood_and_water() {
        let sets = ElementSets::for_day_master(Element::Metal, Strength::Strong);
        assert_eq!(sets.favorable, [Element::Wood, Element::Water]);
        assert_eq!(sets.unfavorable, [Element::Earth, Element::Metal]);
    }

    #[test]
    fn test_favorable_sets_are_disjoint() {
        for e in Element::ALL {
            for s in [Strength::Strong, Strength::Weak] {
                let sets = ElementSets::for_day_master(e, s);
                assert_ne!(sets.favorable[0], sets.favorable[1]);
                for f in sets.favorable {
                    assert!(!sets.unfavorable.contains(&f), "{e} {s}");
                }
            }
        }
    }

    #[test]
    fn test_seasonal_support_decides_a_tie() {
        let profile = ElementalProfile::default();
        let w = StrengthWeights::default();
        assert_eq!(classify(&profile, Element::Wood, Element::Wood, &w), Strength::Strong);
        assert_eq!(classify(&profile, Element::Water, Element::Wood, &w), Strength::Strong);
        assert_eq!(classify(&profile, Element::Metal, Element::Wood, &w), Strength::Weak);
    }
}
