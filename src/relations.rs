// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Relations between stems, elements and branches.
//!
//! ## Ten Gods (十神)
//!
//! The Ten-God of a stem is fixed by how its element relates to the Day
//! Master's element and whether the two share polarity:
//!
//! | Relation to Day Master | Same polarity | Opposite polarity |
//! |------------------------|---------------|-------------------|
//! | same element           | 比肩 | 劫财 |
//! | Day Master generates   | 食神 | 伤官 |
//! | Day Master controls    | 偏财 | 正财 |
//! | controls Day Master    | 七杀 | 正官 |
//! | generates Day Master   | 偏印 | 正印 |
//!
//! The full 10 × 10 matrix is materialised at compile time.
//!
//! ## Branch relations
//!
//! Six-combinations (六合), three-combinations (三合), six-clashes (六冲),
//! punishments (刑) and harms (害) are static pair tables; more than one
//! relation can hold for the same pair (e.g. 子卯 is only a punishment,
//! 寅巳 is both a punishment and a harm).

use crate::error::BaziError;
use crate::ganzhi::{Branch, Element, Stem};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

// ═══════════════════════════════════════════════════════════════════════════
// Element relations
// ═══════════════════════════════════════════════════════════════════════════

/// How an element stands relative to a reference (the Day Master's) element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ElementRelation {
    /// Same element.
    Companion,
    /// Generates the reference element.
    Resource,
    /// Generated by the reference element.
    Output,
    /// Controlled by the reference element.
    Wealth,
    /// Controls the reference element.
    Power,
}

impl ElementRelation {
    /// Relation of `other` seen from `reference`.
    pub const fn of(reference: Element, other: Element) -> Self {
        match (other.index() + 5 - reference.index()) % 5 {
            0 => Self::Companion,
            1 => Self::Output,
            2 => Self::Wealth,
            3 => Self::Power,
            _ => Self::Resource,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Ten Gods
// ═══════════════════════════════════════════════════════════════════════════

/// The ten relations a stem can bear to the Day Master.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TenGod {
    BiJian,
    JieCai,
    ShiShen,
    ShangGuan,
    PianCai,
    ZhengCai,
    QiSha,
    ZhengGuan,
    PianYin,
    ZhengYin,
}

impl TenGod {
    pub const ALL: [TenGod; 10] = [
        Self::BiJian,
        Self::JieCai,
        Self::ShiShen,
        Self::ShangGuan,
        Self::PianCai,
        Self::ZhengCai,
        Self::QiSha,
        Self::ZhengGuan,
        Self::PianYin,
        Self::ZhengYin,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::BiJian => "比肩",
            Self::JieCai => "劫财",
            Self::ShiShen => "食神",
            Self::ShangGuan => "伤官",
            Self::PianCai => "偏财",
            Self::ZhengCai => "正财",
            Self::QiSha => "七杀",
            Self::ZhengGuan => "正官",
            Self::PianYin => "偏印",
            Self::ZhengYin => "正印",
        }
    }

    /// Element relation this god stands for.
    pub const fn relation(self) -> ElementRelation {
        match self {
            Self::BiJian | Self::JieCai => ElementRelation::Companion,
            Self::ShiShen | Self::ShangGuan => ElementRelation::Output,
            Self::PianCai | Self::ZhengCai => ElementRelation::Wealth,
            Self::QiSha | Self::ZhengGuan => ElementRelation::Power,
            Self::PianYin | Self::ZhengYin => ElementRelation::Resource,
        }
    }

    const fn derive(day_master: Stem, other: Stem) -> Self {
        let same_polarity = day_master.index() % 2 == other.index() % 2;
        let relation = ElementRelation::of(day_master.element(), other.element());
        match (relation, same_polarity) {
            (ElementRelation::Companion, true) => Self::BiJian,
            (ElementRelation::Companion, false) => Self::JieCai,
            (ElementRelation::Output, true) => Self::ShiShen,
            (ElementRelation::Output, false) => Self::ShangGuan,
            (ElementRelation::Wealth, true) => Self::PianCai,
            (ElementRelation::Wealth, false) => Self::ZhengCai,
            (ElementRelation::Power, true) => Self::QiSha,
            (ElementRelation::Power, false) => Self::ZhengGuan,
            (ElementRelation::Resource, true) => Self::PianYin,
            (ElementRelation::Resource, false) => Self::ZhengYin,
        }
    }
}

impl Display for TenGod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TenGod {
    type Err = BaziError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|god| god.name() == s.trim())
            .ok_or_else(|| BaziError::InvalidElementOrRelation(format!("unknown ten god {s:?}")))
    }
}

/// `TEN_GODS[day_master][other]`.
const TEN_GODS: [[TenGod; 10]; 10] = {
    let mut table = [[TenGod::BiJian; 10]; 10];
    let mut dm = 0;
    while dm < 10 {
        let mut other = 0;
        while other < 10 {
            table[dm][other] = TenGod::derive(Stem::from_index(dm), Stem::from_index(other));
            other += 1;
        }
        dm += 1;
    }
    table
};

/// Ten-God of `stem` relative to `day_master`.
#[inline]
pub const fn ten_god(day_master: Stem, stem: Stem) -> TenGod {
    TEN_GODS[day_master.index()][stem.index()]
}

// ═══════════════════════════════════════════════════════════════════════════
// Branch relations
// ═══════════════════════════════════════════════════════════════════════════

/// 子丑 寅亥 卯戌 辰酉 巳申 午未
const SIX_COMBINATIONS: [(Branch, Branch); 6] = [
    (Branch::Zi, Branch::Chou),
    (Branch::Yin, Branch::Hai),
    (Branch::Mao, Branch::Xu),
    (Branch::Chen, Branch::You),
    (Branch::Si, Branch::Shen),
    (Branch::Wu, Branch::Wei),
];

/// 申子辰 亥卯未 寅午戌 巳酉丑
const THREE_COMBINATIONS: [[Branch; 3]; 4] = [
    [Branch::Shen, Branch::Zi, Branch::Chen],
    [Branch::Hai, Branch::Mao, Branch::Wei],
    [Branch::Yin, Branch::Wu, Branch::Xu],
    [Branch::Si, Branch::You, Branch::Chou],
];

/// 寅巳申 丑戌未
const PUNISHMENT_GROUPS: [[Branch; 3]; 2] = [
    [Branch::Yin, Branch::Si, Branch::Shen],
    [Branch::Chou, Branch::Xu, Branch::Wei],
];

/// 辰 午 酉 亥 punish themselves.
const SELF_PUNISHMENT: [Branch; 4] = [Branch::Chen, Branch::Wu, Branch::You, Branch::Hai];

/// 子未 丑午 寅巳 卯辰 申亥 酉戌
const HARMS: [(Branch, Branch); 6] = [
    (Branch::Zi, Branch::Wei),
    (Branch::Chou, Branch::Wu),
    (Branch::Yin, Branch::Si),
    (Branch::Mao, Branch::Chen),
    (Branch::Shen, Branch::Hai),
    (Branch::You, Branch::Xu),
];

#[inline]
fn unordered(pairs: &[(Branch, Branch)], a: Branch, b: Branch) -> bool {
    pairs
        .iter()
        .any(|&(x, y)| (x == a && y == b) || (x == b && y == a))
}

/// 六合
#[inline]
pub fn is_six_combination(a: Branch, b: Branch) -> bool {
    unordered(&SIX_COMBINATIONS, a, b)
}

/// Two distinct branches of the same 三合 trine.
pub fn is_three_combination(a: Branch, b: Branch) -> bool {
    a != b
        && THREE_COMBINATIONS
            .iter()
            .any(|trine| trine.contains(&a) && trine.contains(&b))
}

/// 六冲: branches six positions apart.
#[inline]
pub fn is_clash(a: Branch, b: Branch) -> bool {
    (a.index() + 6) % 12 == b.index()
}

/// 刑: within 寅巳申 or 丑戌未, 子卯, or a self-punishing branch met twice.
pub fn is_punishment(a: Branch, b: Branch) -> bool {
    if a == b {
        return SELF_PUNISHMENT.contains(&a);
    }
    unordered(&[(Branch::Zi, Branch::Mao)], a, b)
        || PUNISHMENT_GROUPS
            .iter()
            .any(|group| group.contains(&a) && group.contains(&b))
}

/// 害
#[inline]
pub fn is_harm(a: Branch, b: Branch) -> bool {
    unordered(&HARMS, a, b)
}

/// Kind of relation between two branches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BranchRelation {
    SixCombination,
    ThreeCombination,
    Clash,
    Punishment,
    Harm,
}

impl BranchRelation {
    pub const ALL: [BranchRelation; 5] = [
        Self::SixCombination,
        Self::ThreeCombination,
        Self::Clash,
        Self::Punishment,
        Self::Harm,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::SixCombination => "六合",
            Self::ThreeCombination => "三合",
            Self::Clash => "六冲",
            Self::Punishment => "相刑",
            Self::Harm => "相害",
        }
    }

    /// Whether this relation holds between `a` and `b`.
    pub fn holds(self, a: Branch, b: Branch) -> bool {
        match self {
            Self::SixCombination => is_six_combination(a, b),
            Self::ThreeCombination => is_three_combination(a, b),
            Self::Clash => is_clash(a, b),
            Self::Punishment => is_punishment(a, b),
            Self::Harm => is_harm(a, b),
        }
    }
}

impl Display for BranchRelation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Every relation holding between two branches, in [`BranchRelation::ALL`] order.
pub fn branch_relations(a: Branch, b: Branch) -> Vec<BranchRelation> {
    BranchRelation::ALL
        .into_iter()
        .filter(|relation| relation.holds(a, b))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ten_god_examples() {
        // Day Master 庚 (Yang Metal).
        assert_eq!(ten_god(Stem::Geng, Stem::Geng), TenGod::BiJian);
        assert_eq!(ten_god(Stem::Geng, Stem::Xin), TenGod::JieCai);
        assert_eq!(ten_god(Stem::Geng, Stem::Ren), TenGod::ShiShen);
        assert_eq!(ten_god(Stem::Geng, Stem::Gui), TenGod::ShangGuan);
        assert_eq!(ten_god(Stem::Geng, Stem::Jia), TenGod::PianCai);
        assert_eq!(ten_god(Stem::Geng, Stem::Yi), TenGod::ZhengCai);
        assert_eq!(ten_god(Stem::Geng, Stem::Bing), TenGod::QiSha);
        assert_eq!(ten_god(Stem::Geng, Stem::Ding), TenGod::ZhengGuan);
        assert_eq!(ten_god(Stem::Geng, Stem::Wu), TenGod::PianYin);
        assert_eq!(ten_god(Stem::Geng, Stem::Ji), TenGod::ZhengYin);
        // Day Master 甲 sees 己 as 正财, 庚 as 七杀.
        assert_eq!(ten_god(Stem::Jia, Stem::Ji), TenGod::ZhengCai);
        assert_eq!(ten_god(Stem::Jia, Stem::Geng), TenGod::QiSha);
    }

    #[test]
    fn test_every_row_holds_each_god_once() {
        for dm in Stem::ALL {
            for god in TenGod::ALL {
                let n = Stem::ALL.iter().filter(|&&s| ten_god(dm, s) == god).count();
                assert_eq!(n, 1, "{dm} / {god}");
            }
        }
    }

    #[test]
    fn test_element_relation_matches_cycles() {
        for e in Element::ALL {
            assert_eq!(ElementRelation::of(e, e), ElementRelation::Companion);
            assert_eq!(ElementRelation::of(e, e.generates()), ElementRelation::Output);
            assert_eq!(ElementRelation::of(e, e.controls()), ElementRelation::Wealth);
            assert_eq!(ElementRelation::of(e, e.controlled_by()), ElementRelation::Power);
            assert_eq!(ElementRelation::of(e, e.generated_by()), ElementRelation::Resource);
        }
    }

    #[test]
    fn test_branch_pairs_are_symmetric() {
        for a in Branch::ALL {
            for b in Branch::ALL {
                assert_eq!(branch_relations(a, b), branch_relations(b, a), "{a}{b}");
            }
        }
    }

    #[test]
    fn test_branch_relation_examples() {
        assert!(is_six_combination(Branch::Zi, Branch::Chou));
        assert!(is_six_combination(Branch::Hai, Branch::Yin));
        assert!(is_clash(Branch::Zi, Branch::Wu));
        assert!(is_clash(Branch::Si, Branch::Hai));
        assert!(!is_clash(Branch::Zi, Branch::Zi));
        assert!(is_three_combination(Branch::Shen, Branch::Chen));
        assert!(!is_three_combination(Branch::Zi, Branch::Zi));
        assert!(is_punishment(Branch::Zi, Branch::Mao));
        assert!(is_punishment(Branch::Wu, Branch::Wu));
        assert!(!is_punishment(Branch::Zi, Branch::Zi));
        assert!(is_punishment(Branch::Chou, Branch::Wei));
        assert_eq!(
            branch_relations(Branch::Yin, Branch::Si),
            vec![BranchRelation::Punishment, BranchRelation::Harm]
        );
        assert_eq!(
            branch_relations(Branch::Yin, Branch::Shen),
            vec![BranchRelation::Clash, BranchRelation::Punishment]
        );
        assert!(branch_relations(Branch::Zi, Branch::Yin).is_empty());
    }

    #[test]
    fn test_each_branch_has_one_clash_and_one_six_combination() {
        for a in Branch::ALL {
            assert_eq!(Branch::ALL.iter().filter(|&&b| is_clash(a, b)).count(), 1);
            assert_eq!(Branch::ALL.iter().filter(|&&b| is_six_combination(a, b)).count(), 1);
            assert_eq!(Branch::ALL.iter().filter(|&&b| is_harm(a, b)).count(), 1);
        }
    }
}
