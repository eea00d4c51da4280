// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Place name → geographic longitude.
//!
//! The calculation only needs a longitude; anything that can produce one
//! implements [`LongitudeLookup`].  [`CityTable`] is the built-in in-memory
//! table of Chinese cities.  Matching ignores administrative suffixes
//! (省, 市, 区, 县, …), so `江西省赣州市`, `赣州市` and `赣州` all resolve to
//! 赣州; when several entries occur inside a longer name the longest wins.

/// Source of longitudes for free-form place names.
pub trait LongitudeLookup {
    /// Longitude in degrees east, or `None` when the place is unknown.
    fn longitude(&self, place: &str) -> Option<f64>;
}

impl<F> LongitudeLookup for F
where
    F: Fn(&str) -> Option<f64>,
{
    fn longitude(&self, place: &str) -> Option<f64> {
        self(place)
    }
}

/// Administrative suffixes stripped before matching, longest first.
const SUFFIXES: [&str; 8] = ["特别行政区", "自治区", "自治州", "地区", "省", "市", "区", "县"];

/// Built-in longitudes (degrees east).
const CITIES: &[(&str, f64)] = &[
    ("北京", 116.41),
    ("天津", 117.20),
    ("上海", 121.47),
    ("重庆", 106.55),
    ("石家庄", 114.51),
    ("太原", 112.55),
    ("呼和浩特", 111.75),
    ("沈阳", 123.43),
    ("大连", 121.61),
    ("长春", 125.32),
    ("哈尔滨", 126.53),
    ("南京", 118.80),
    ("苏州", 120.59),
    ("无锡", 120.31),
    ("杭州", 120.16),
    ("宁波", 121.55),
    ("温州", 120.70),
    ("合肥", 117.23),
    ("福州", 119.30),
    ("厦门", 118.09),
    ("南昌", 115.86),
    ("赣州", 114.93),
    ("九江", 116.00),
    ("济南", 117.12),
    ("青岛", 120.38),
    ("郑州", 113.63),
    ("洛阳", 112.45),
    ("武汉", 114.31),
    ("长沙", 112.94),
    ("广州", 113.26),
    ("深圳", 114.06),
    ("珠海", 113.58),
    ("汕头", 116.68),
    ("南宁", 108.37),
    ("桂林", 110.29),
    ("海口", 110.20),
    ("三亚", 109.51),
    ("成都", 104.07),
    ("贵阳", 106.63),
    ("昆明", 102.83),
    ("拉萨", 91.11),
    ("西安", 108.94),
    ("兰州", 103.83),
    ("西宁", 101.78),
    ("银川", 106.23),
    ("乌鲁木齐", 87.62),
    ("喀什", 75.99),
    ("香港", 114.17),
    ("澳门", 113.54),
    ("台北", 121.56),
    ("高雄", 120.31),
];

/// Strip whitespace and one trailing administrative suffix.
fn normalize(place: &str) -> &str {
    let trimmed = place.trim();
    SUFFIXES
        .iter()
        .find_map(|suffix| trimmed.strip_suffix(suffix))
        .filter(|rest| !rest.is_empty())
        .unwrap_or(trimmed)
}

/// In-memory table of place names and longitudes.
#[derive(Debug, Clone)]
pub struct CityTable {
    entries: Vec<(String, f64)>,
}

impl Default for CityTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl CityTable {
    /// The built-in table of Chinese provincial capitals and major cities.
    pub fn builtin() -> Self {
        Self {
            entries: CITIES
                .iter()
                .map(|&(name, lon)| (name.to_string(), lon))
                .collect(),
        }
    }

    /// An empty table.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add or replace an entry.
    pub fn with_city(mut self, name: &str, longitude: f64) -> Self {
        let name = normalize(name).to_string();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = longitude,
            None => self.entries.push((name, longitude)),
        }
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl LongitudeLookup for CityTable {
    fn longitude(&self, place: &str) -> Option<f64> {
        let key = normalize(place);
        if key.is_empty() {
            return None;
        }
        if let Some(&(_, lon)) = self.entries.iter().find(|(name, _)| name == key) {
            return Some(lon);
        }
        // Names embedded in a longer address, e.g. 江西省赣州市章贡区.
        self.entries
            .iter()
            .filter(|(name, _)| key.contains(name.as_str()))
            .max_by_key(|(name, _)| name.chars().count())
            .map(|&(_, lon)| lon)
    }
}

/// Longitude for an optional place name, falling back to `default`.
///
/// An unknown place is not an error; it is logged at `warn` level and the
/// default meridian is used instead.
pub fn resolve_longitude<L: LongitudeLookup + ?Sized>(
    lookup: &L,
    place: Option<&str>,
    default: f64,
) -> f64 {
    match place.map(str::trim).filter(|p| !p.is_empty()) {
        None => default,
        Some(name) => lookup.longitude(name).unwrap_or_else(|| {
            log::warn!("unknown birth place {name:?}, using longitude {default}");
            default
        }),
    }
}
