// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Five elements, Heavenly Stems, Earthly Branches and the sexagenary cycle.
//!
//! | Type | Members | Order |
//! |------|---------|-------|
//! | [`Element`] | 木 火 土 金 水 | generating cycle |
//! | [`Stem`] | 甲 … 癸 | Yang at even index |
//! | [`Branch`] | 子 … 亥 | Yang at even index |
//! | [`GanZhi`] | 甲子 … 癸亥 | 60-cycle, 甲子 = 0 |
//!
//! All tables are `const`; every lookup is total over the closed enums.
//! Parsing from a Chinese label goes through [`std::str::FromStr`] and fails
//! with [`BaziError::InvalidElementOrRelation`].

use crate::error::BaziError;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

// ═══════════════════════════════════════════════════════════════════════════
// Element
// ═══════════════════════════════════════════════════════════════════════════

/// The five elements (五行), in generating order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Element {
    Wood,
    Fire,
    Earth,
    Metal,
    Water,
}

impl Element {
    pub const ALL: [Element; 5] = [
        Self::Wood,
        Self::Fire,
        Self::Earth,
        Self::Metal,
        Self::Water,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub const fn from_index(index: usize) -> Self {
        Self::ALL[index % 5]
    }

    /// Chinese name: 木 火 土 金 水.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Wood => "木",
            Self::Fire => "火",
            Self::Earth => "土",
            Self::Metal => "金",
            Self::Water => "水",
        }
    }

    /// The element this one generates (木→火→土→金→水→木).
    #[inline]
    pub const fn generates(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    /// The element that generates this one.
    #[inline]
    pub const fn generated_by(self) -> Self {
        Self::from_index(self.index() + 4)
    }

    /// The element this one controls (木→土→水→火→金→木).
    #[inline]
    pub const fn controls(self) -> Self {
        Self::from_index(self.index() + 2)
    }

    /// The element that controls this one.
    #[inline]
    pub const fn controlled_by(self) -> Self {
        Self::from_index(self.index() + 3)
    }
}

impl Display for Element {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Element {
    type Err = BaziError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|e| e.name() == s.trim())
            .ok_or_else(|| BaziError::InvalidElementOrRelation(format!("unknown element {s:?}")))
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Polarity
// ═══════════════════════════════════════════════════════════════════════════

/// Yin/Yang polarity (阴阳).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Polarity {
    Yang,
    Yin,
}

impl Polarity {
    #[inline]
    const fn of_index(index: usize) -> Self {
        if index % 2 == 0 {
            Self::Yang
        } else {
            Self::Yin
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Yang => "阳",
            Self::Yin => "阴",
        }
    }
}

impl Display for Polarity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Stem
// ═══════════════════════════════════════════════════════════════════════════

/// The ten Heavenly Stems (天干).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Stem {
    Jia,
    Yi,
    Bing,
    Ding,
    Wu,
    Ji,
    Geng,
    Xin,
    Ren,
    Gui,
}

impl Stem {
    pub const ALL: [Stem; 10] = [
        Self::Jia,
        Self::Yi,
        Self::Bing,
        Self::Ding,
        Self::Wu,
        Self::Ji,
        Self::Geng,
        Self::Xin,
        Self::Ren,
        Self::Gui,
    ];

    const NAMES: [&'static str; 10] = ["甲", "乙", "丙", "丁", "戊", "己", "庚", "辛", "壬", "癸"];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Stem at `index`, wrapping modulo 10.
    #[inline]
    pub const fn from_index(index: usize) -> Self {
        Self::ALL[index % 10]
    }

    /// Stem `steps` positions away, in either direction.
    #[inline]
    pub fn offset(self, steps: i64) -> Self {
        Self::from_index((self.index() as i64 + steps).rem_euclid(10) as usize)
    }

    /// Element: pairs of stems share one, 甲乙 木 through 壬癸 水.
    #[inline]
    pub const fn element(self) -> Element {
        Element::from_index(self.index() / 2)
    }

    #[inline]
    pub const fn polarity(self) -> Polarity {
        Polarity::of_index(self.index())
    }

    #[inline]
    pub const fn name(self) -> &'static str {
        Self::NAMES[self.index()]
    }
}

impl Display for Stem {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Stem {
    type Err = BaziError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|stem| stem.name() == s.trim())
            .ok_or_else(|| BaziError::InvalidElementOrRelation(format!("unknown stem {s:?}")))
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Branch
// ═══════════════════════════════════════════════════════════════════════════

/// The twelve Earthly Branches (地支).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Branch {
    Zi,
    Chou,
    Yin,
    Mao,
    Chen,
    Si,
    Wu,
    Wei,
    Shen,
    You,
    Xu,
    Hai,
}

impl Branch {
    pub const ALL: [Branch; 12] = [
        Self::Zi,
        Self::Chou,
        Self::Yin,
        Self::Mao,
        Self::Chen,
        Self::Si,
        Self::Wu,
        Self::Wei,
        Self::Shen,
        Self::You,
        Self::Xu,
        Self::Hai,
    ];

    const NAMES: [&'static str; 12] = [
        "子", "丑", "寅", "卯", "辰", "巳", "午", "未", "申", "酉", "戌", "亥",
    ];

    const ELEMENTS: [Element; 12] = [
        Element::Water,
        Element::Earth,
        Element::Wood,
        Element::Wood,
        Element::Earth,
        Element::Fire,
        Element::Fire,
        Element::Earth,
        Element::Metal,
        Element::Metal,
        Element::Earth,
        Element::Water,
    ];

    /// Hidden stems (藏干), primary first.
    const HIDDEN: [&'static [Stem]; 12] = [
        &[Stem::Gui],
        &[Stem::Ji, Stem::Gui, Stem::Xin],
        &[Stem::Jia, Stem::Bing, Stem::Wu],
        &[Stem::Yi],
        &[Stem::Wu, Stem::Yi, Stem::Gui],
        &[Stem::Bing, Stem::Wu, Stem::Geng],
        &[Stem::Ding, Stem::Ji],
        &[Stem::Ji, Stem::Ding, Stem::Yi],
        &[Stem::Geng, Stem::Ren, Stem::Wu],
        &[Stem::Xin],
        &[Stem::Wu, Stem::Xin, Stem::Ding],
        &[Stem::Ren, Stem::Jia],
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Branch at `index`, wrapping modulo 12.
    #[inline]
    pub const fn from_index(index: usize) -> Self {
        Self::ALL[index % 12]
    }

    /// Branch `steps` positions away, in either direction.
    #[inline]
    pub fn offset(self, steps: i64) -> Self {
        Self::from_index((self.index() as i64 + steps).rem_euclid(12) as usize)
    }

    /// Primary element.
    #[inline]
    pub const fn element(self) -> Element {
        Self::ELEMENTS[self.index()]
    }

    #[inline]
    pub const fn polarity(self) -> Polarity {
        Polarity::of_index(self.index())
    }

    /// Hidden stems, primary first.
    #[inline]
    pub const fn hidden_stems(self) -> &'static [Stem] {
        Self::HIDDEN[self.index()]
    }

    /// The primary hidden stem, which shares the branch's element.
    #[inline]
    pub const fn primary_stem(self) -> Stem {
        Self::HIDDEN[self.index()][0]
    }

    #[inline]
    pub const fn name(self) -> &'static str {
        Self::NAMES[self.index()]
    }

    /// The branch ruling the two-hour period that contains `hour` (0–23).
    ///
    /// 子 covers 23:00–00:59, 丑 01:00–02:59, and so on.
    #[inline]
    pub const fn of_hour(hour: u32) -> Self {
        Self::from_index(((hour + 1) / 2) as usize)
    }

    /// Midpoint hour of the branch's two-hour period (子 → 0, 丑 → 2, …).
    #[inline]
    pub const fn midpoint_hour(self) -> u32 {
        (self.index() as u32) * 2
    }
}

impl Display for Branch {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Branch {
    type Err = BaziError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|branch| branch.name() == s.trim())
            .ok_or_else(|| BaziError::InvalidElementOrRelation(format!("unknown branch {s:?}")))
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// GanZhi
// ═══════════════════════════════════════════════════════════════════════════

/// A stem-branch pair of the sexagenary cycle (干支).
///
/// Only pairs of equal polarity exist; [`GanZhi::new`] rejects the others.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GanZhi {
    pub stem: Stem,
    pub branch: Branch,
}

impl GanZhi {
    /// 甲子, position 0 of the cycle.
    pub const JIA_ZI: Self = Self {
        stem: Stem::Jia,
        branch: Branch::Zi,
    };

    /// Pair a stem and a branch; `None` when their polarities differ.
    pub fn new(stem: Stem, branch: Branch) -> Option<Self> {
        (stem.polarity() == branch.polarity()).then_some(Self { stem, branch })
    }

    /// Cycle member at `index`, taken modulo 60 (negative values wrap).
    #[inline]
    pub fn from_index(index: i64) -> Self {
        let i = index.rem_euclid(60) as usize;
        Self {
            stem: Stem::from_index(i),
            branch: Branch::from_index(i),
        }
    }

    /// Position in the cycle, `0..60`.
    #[inline]
    pub fn index(self) -> usize {
        let s = self.stem.index() as i64;
        let b = self.branch.index() as i64;
        (6 * s - 5 * b).rem_euclid(60) as usize
    }

    /// Sexagenary label of a solar year, anchored at 甲子 = 1984.
    #[inline]
    pub fn of_year(year: i32) -> Self {
        Self::from_index(year as i64 - 4)
    }

    /// Cycle member `steps` positions away.
    #[inline]
    pub fn offset(self, steps: i64) -> Self {
        Self::from_index(self.index() as i64 + steps)
    }

    /// Element label: stem element followed by branch element, e.g. `金土`.
    pub fn element_label(self) -> String {
        format!("{}{}", self.stem.element(), self.branch.element())
    }
}

impl Display for GanZhi {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.stem, self.branch)
    }
}

impl FromStr for GanZhi {
    type Err = BaziError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        let (Some(stem), Some(branch), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(BaziError::InvalidElementOrRelation(format!(
                "not a stem-branch pair: {s:?}"
            )));
        };
        let stem: Stem = stem.to_string().parse()?;
        let branch: Branch = branch.to_string().parse()?;
        Self::new(stem, branch).ok_or_else(|| {
            BaziError::InvalidElementOrRelation(format!("{stem}{branch} is not in the cycle"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_cycles_are_consistent() {
        for e in Element::ALL {
            assert_eq!(e.generates().generated_by(), e);
            assert_eq!(e.controls().controlled_by(), e);
            assert_ne!(e.generates(), e.controls());
        }
        assert_eq!(Element::Wood.generates(), Element::Fire);
        assert_eq!(Element::Wood.controls(), Element::Earth);
        assert_eq!(Element::Metal.controls(), Element::Wood);
        assert_eq!(Element::Water.controlled_by(), Element::Earth);
    }

    #[test]
    fn test_stem_elements_and_polarity() {
        assert_eq!(Stem::Jia.element(), Element::Wood);
        assert_eq!(Stem::Geng.element(), Element::Metal);
        assert_eq!(Stem::Gui.element(), Element::Water);
        assert_eq!(Stem::Jia.polarity(), Polarity::Yang);
        assert_eq!(Stem::Yi.polarity(), Polarity::Yin);
        assert_eq!(Stem::Jia.offset(-1), Stem::Gui);
    }

    #[test]
    fn test_primary_hidden_stem_shares_branch_element() {
        for b in Branch::ALL {
            assert_eq!(b.primary_stem().element(), b.element(), "{b}");
            assert!((1..=3).contains(&b.hidden_stems().len()));
        }
    }

    #[test]
    fn test_hour_branches() {
        assert_eq!(Branch::of_hour(23), Branch::Zi);
        assert_eq!(Branch::of_hour(0), Branch::Zi);
        assert_eq!(Branch::of_hour(1), Branch::Chou);
        assert_eq!(Branch::of_hour(6), Branch::Mao);
        assert_eq!(Branch::of_hour(12), Branch::Wu);
        assert_eq!(Branch::of_hour(22), Branch::Hai);
        for b in Branch::ALL {
            assert_eq!(Branch::of_hour(b.midpoint_hour()), b);
        }
    }

    #[test]
    fn test_sexagenary_cycle_roundtrip() {
        for i in 0..60 {
            let gz = GanZhi::from_index(i);
            assert_eq!(gz.index() as i64, i);
            assert_eq!(GanZhi::new(gz.stem, gz.branch), Some(gz));
        }
        assert_eq!(GanZhi::from_index(-1).to_string(), "癸亥");
        assert_eq!(GanZhi::new(Stem::Jia, Branch::Chou), None);
    }

    #[test]
    fn test_year_anchor() {
        assert_eq!(GanZhi::of_year(1984), GanZhi::JIA_ZI);
        assert_eq!(GanZhi::of_year(2000).to_string(), "庚辰");
        assert_eq!(GanZhi::of_year(2024).to_string(), "甲辰");
        assert_eq!(GanZhi::of_year(1989).to_string(), "己巳");
    }

    #[test]
    fn test_parsing_labels() {
        assert_eq!("金".parse::<Element>(), Ok(Element::Metal));
        assert_eq!("庚".parse::<Stem>(), Ok(Stem::Geng));
        assert_eq!("戌".parse::<Branch>(), Ok(Branch::Xu));
        assert_eq!("庚戌".parse::<GanZhi>().map(|g| g.index()), Ok(46));
        assert!(matches!(
            "铁".parse::<Element>(),
            Err(BaziError::InvalidElementOrRelation(_))
        ));
        assert!("甲丑".parse::<GanZhi>().is_err());
        assert!("甲子丑".parse::<GanZhi>().is_err());
    }

    #[test]
    fn test_element_label() {
        assert_eq!(GanZhi::of_year(2000).element_label(), "金土");
    }
}
