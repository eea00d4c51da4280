use ganzhi::{calculate, BaziConfig, BirthInput, Gender};

fn main() -> ganzhi::Result<()> {
    let config = BaziConfig::default();
    let input = BirthInput::new("2000-12-18", "07:20", Gender::Male).with_place("江西省赣州市");
    let ctx = calculate(&input, &config, 2026)?;

    println!("真太阳时: {}", ctx.basic.true_solar_time);
    println!("农历: {}", ctx.basic.lunar_date);
    println!("{}", ctx.summary());
    println!("五行: {}", ctx.elements);
    for decade in &ctx.decades.decades {
        println!("大运 {decade}");
    }
    for (year, annual) in ctx.timeline(&config) {
        println!("{year} {} {} {} {}", annual.pillar, annual.score, annual.level, annual.tags.join("/"));
    }
    Ok(())
}
