// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Four-character event tags for scored years.
//!
//! The library is indexed by age bracket and a five-step coarse level read
//! straight from the score; the entry within a cell is picked
//! deterministically from the year and the birth year, so the same chart
//! always shows the same tag for a year.
//!
//! | Score | Coarse level |
//! |-------|--------------|
//! | < 30 | 大凶 |
//! | 30–44 | 小凶 |
//! | 45–59 | 平 |
//! | 60–74 | 小吉 |
//! | ≥ 75 | 大吉 |
//!
//! The cuts do not line up with the seven fortune bands.

/// Age brackets, by inclusive upper bound.
const BRACKET_UPPER: [i32; 6] = [22, 26, 30, 35, 40, 50];

/// Bracket labels, aligned with [`LIBRARY`].
pub const BRACKETS: [&str; 7] = ["18-22", "23-26", "27-30", "31-35", "36-40", "41-50", "51+"];

/// `LIBRARY[bracket][coarse level]`, coarse levels ordered 大凶 小凶 平 小吉 大吉.
const LIBRARY: [[[&str; 5]; 5]; 7] = [
    [
        ["考试失利", "专业错选", "休学危机", "校园孤立", "前途迷茫"],
        ["成绩下滑", "实习碰壁", "导师冲突", "社交退缩", "自我怀疑"],
        ["按部就班", "平稳过渡", "默默努力", "随波逐流", "等待机会"],
        ["小有进步", "贵人出现", "方向初现", "信心恢复", "技能突破"],
        ["金榜题名", "保研成功", "offer在手", "天赋觉醒", "伯乐赏识"],
    ],
    [
        ["职场霸凌", "频繁跳槽", "入错行业", "被迫离职", "经济困窘"],
        ["职场孤立", "薪资停滞", "上司打压", "方向迷茫", "加班过劳"],
        ["稳定过渡", "积累经验", "默默成长", "等待时机", "蛰伏期"],
        ["小有成绩", "获得认可", "薪资上涨", "技能精进", "站稳脚跟"],
        ["晋升加薪", "猎头青睐", "独当一面", "行业新星", "事业起飞"],
    ],
    [
        ["婚恋破裂", "转型失败", "房贷压力", "亲情撕裂", "健康亮灯"],
        ["婚恋焦虑", "转型阵痛", "经济紧张", "家庭矛盾", "精力透支"],
        ["按部就班", "稳步推进", "平衡生活", "积蓄力量", "静待花开"],
        ["感情稳定", "事业上升", "财务改善", "家庭和睦", "身心平衡"],
        ["喜结良缘", "事业腾飞", "财富积累", "儿女双全", "人生赢家"],
    ],
    [
        ["中年失业", "婚姻危机", "健康警报", "投资失败", "信任崩塌"],
        ["职业瓶颈", "婚姻倦怠", "亚健康态", "财务压力", "人际疏离"],
        ["维持现状", "平稳度日", "休养生息", "内心整理", "默默坚持"],
        ["突破瓶颈", "感情回暖", "健康好转", "收入增加", "贵人相助"],
        ["事业巅峰", "婚姻美满", "身心俱佳", "财务自由", "功成名就"],
    ],
    [
        ["事业滑坡", "婚变危机", "大病初愈", "破财损失", "众叛亲离"],
        ["发展受阻", "感情平淡", "身体疲惫", "经济波动", "孤独感重"],
        ["稳中求进", "平淡是真", "调养身心", "量入为出", "知足常乐"],
        ["稳步上升", "感情升温", "精力充沛", "收益稳定", "人脉扩展"],
        ["行业翘楚", "伉俪情深", "逆龄生长", "财源广进", "德高望重"],
    ],
    [
        ["被迫退位", "空巢危机", "重病缠身", "财富缩水", "晚景凄凉"],
        ["边缘化态", "亲子隔阂", "慢性病扰", "财务缩减", "人情淡薄"],
        ["安稳度日", "家庭平和", "注重保养", "财务平衡", "知足安乐"],
        ["经验变现", "儿女成才", "身体康健", "被动收入", "桃李天下"],
        ["功成身退", "儿孙满堂", "老当益壮", "财富传承", "德艺双馨"],
    ],
    [
        ["晚年孤独", "久病床前", "积蓄耗尽", "家庭离散", "郁郁寡欢"],
        ["健康下降", "儿女不孝", "经济拮据", "社交减少", "意义感失"],
        ["平淡晚年", "儿女尚可", "生活无忧", "偶有来往", "安度余生"],
        ["身体硬朗", "儿孙孝顺", "生活富足", "老友相聚", "心态平和"],
        ["寿比南山", "儿孙绕膝", "安享晚年", "桃李满园", "圆满人生"],
    ],
];

/// Bracket index for an age; ages below 18 share the first bracket.
pub fn bracket_of_age(age: i32) -> usize {
    BRACKET_UPPER
        .iter()
        .position(|&upper| age <= upper)
        .unwrap_or(BRACKET_UPPER.len())
}

/// Upper bounds (exclusive) of the first four coarse levels.
const COARSE_CUTS: [i32; 4] = [30, 45, 60, 75];

/// Coarse five-step index of a score.
fn coarse(score: i32) -> usize {
    COARSE_CUTS
        .iter()
        .position(|&cut| score < cut)
        .unwrap_or(COARSE_CUTS.len())
}

/// Tag for `year` of someone born in `birth_year` whose year scored
/// `score`; `None` before birth.
pub fn event_tag(year: i32, birth_year: i32, score: i32) -> Option<&'static str> {
    let age = year - birth_year;
    if age < 0 {
        return None;
    }
    let cell = &LIBRARY[bracket_of_age(age)][coarse(score)];
    let seed = (year as i64) * 7 + (birth_year as i64) * 13;
    Some(cell[seed.rem_euclid(cell.len() as i64) as usize])
}

/// Negative tags (大凶 and 小凶 cells) for an age.
pub fn pain_points(age: i32) -> Vec<&'static str> {
    let cells = &LIBRARY[bracket_of_age(age)];
    cells[0].iter().chain(cells[1].iter()).copied().collect()
}

/// Positive tags (小吉 and 大吉 cells) for an age.
pub fn highlights(age: i32) -> Vec<&'static str> {
    let cells = &LIBRARY[bracket_of_age(age)];
    cells[3].iter().chain(cells[4].iter()).copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brackets() {
        assert_eq!(BRACKETS[bracket_of_age(5)], "18-22");
        assert_eq!(BRACKETS[bracket_of_age(22)], "18-22");
        assert_eq!(BRACKETS[bracket_of_age(23)], "23-26");
        assert_eq!(BRACKETS[bracket_of_age(50)], "41-50");
        assert_eq!(BRACKETS[bracket_of_age(51)], "51+");
    }

    #[test]
    fn test_tag_selection_is_deterministic() {
        // 2026·7 + 2000·13 = 40182 → index 2; age 26 → 23-26; 50 → 平 → 默默成长.
        assert_eq!(event_tag(2026, 2000, 50), Some("默默成长"));
        assert_eq!(event_tag(2026, 2000, 50), event_tag(2026, 2000, 50));
        assert_eq!(event_tag(1999, 2000, 75), None);
    }

    #[test]
    fn test_cells_follow_score_cuts_not_bands() {
        // 57 is a 小吉 band but still a 平 tag; 72-74 are 大吉 bands but 小吉 tags.
        assert_eq!(event_tag(2026, 2000, 57), Some("默默成长"));
        assert_eq!(event_tag(2026, 2000, 60), Some("薪资上涨"));
        assert_eq!(event_tag(2026, 2000, 74), Some("薪资上涨"));
        assert_eq!(event_tag(2026, 2000, 75), Some("独当一面"));
        assert_eq!(event_tag(2026, 2000, 29), Some("入错行业"));
        assert_eq!(event_tag(2026, 2000, 30), Some("上司打压"));
        assert_eq!(coarse(44), 1);
        assert_eq!(coarse(45), 2);
    }

    #[test]
    fn test_pain_points_and_highlights() {
        assert_eq!(pain_points(30).len(), 10);
        assert!(highlights(60).contains(&"圆满人生"));
    }
}
