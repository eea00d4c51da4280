// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Chart pattern (格局) from the Ten-God of the Month stem.
//!
//! | Month-stem Ten-God | Pattern |
//! |--------------------|---------|
//! | 正官 / 七杀 | 正官格 / 七杀格 |
//! | 正印 / 偏印 | 正印格 / 偏印格 |
//! | 食神 / 伤官 | 食神格 / 伤官格 |
//! | 正财 / 偏财 | 正财格 / 偏财格 |
//! | 比肩 / 劫财 | 建禄格 / 羊刃格 |
//!
//! Anything that cannot be read as a pair of stems falls back to 普通格局.

use crate::ganzhi::Stem;
use crate::pillars::BaziChart;
use crate::relations::{ten_god, TenGod};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Pattern {
    ZhengGuan,
    QiSha,
    ZhengYin,
    PianYin,
    ShiShen,
    ShangGuan,
    ZhengCai,
    PianCai,
    JianLu,
    YangRen,
    /// 普通格局
    Ordinary,
}

impl Pattern {
    pub const fn name(self) -> &'static str {
        match self {
            Self::ZhengGuan => "正官格",
            Self::QiSha => "七杀格",
            Self::ZhengYin => "正印格",
            Self::PianYin => "偏印格",
            Self::ShiShen => "食神格",
            Self::ShangGuan => "伤官格",
            Self::ZhengCai => "正财格",
            Self::PianCai => "偏财格",
            Self::JianLu => "建禄格",
            Self::YangRen => "羊刃格",
            Self::Ordinary => "普通格局",
        }
    }

    pub const fn from_ten_god(god: TenGod) -> Self {
        match god {
            TenGod::ZhengGuan => Self::ZhengGuan,
            TenGod::QiSha => Self::QiSha,
            TenGod::ZhengYin => Self::ZhengYin,
            TenGod::PianYin => Self::PianYin,
            TenGod::ShiShen => Self::ShiShen,
            TenGod::ShangGuan => Self::ShangGuan,
            TenGod::ZhengCai => Self::ZhengCai,
            TenGod::PianCai => Self::PianCai,
            TenGod::BiJian => Self::JianLu,
            TenGod::JieCai => Self::YangRen,
        }
    }

    /// Pattern of a Day Master and a Month stem.
    #[inline]
    pub const fn of_stems(day_master: Stem, month_stem: Stem) -> Self {
        Self::from_ten_god(ten_god(day_master, month_stem))
    }

    /// Pattern from stem labels such as `"庚"` and `"戊"`; unreadable labels
    /// give [`Pattern::Ordinary`].
    pub fn of_labels(day_master: &str, month_stem: &str) -> Self {
        match (day_master.parse::<Stem>(), month_stem.parse::<Stem>()) {
            (Ok(dm), Ok(ms)) => Self::of_stems(dm, ms),
            _ => Self::Ordinary,
        }
    }
}

impl Display for Pattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Pattern of a chart.
#[inline]
pub fn classify(chart: &BaziChart) -> Pattern {
    Pattern::of_stems(chart.day_master(), chart.month.stem)
}
