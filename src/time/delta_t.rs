// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! # ΔT (Delta T): UT↔TT correction
//!
//! Piecewise polynomial expressions of Espenak & Meeus (2006, *Five
//! Millennium Canon of Solar Eclipses*) for **ΔT = TT − UT**.  The birth
//! range this crate accepts (1800–2199) is covered by the fitted segments;
//! anything outside falls back to the long-term parabola.
//!
//! ΔT matters here only through the solar longitude: near a solar-term
//! boundary a one-minute error in TT moves the month pillar boundary by the
//! same minute.
//!
//! ## Valid Time Range
//! Uncertainty is below ±1 s from 1900 to 2005 and grows to a few tens of
//! seconds by 2150.

use qtty::{Days, Seconds};

/// JD of 2000-01-01T12:00 and the mean Julian year, used for decimal years.
const JD_2000: f64 = 2_451_545.0;
const JULIAN_YEAR_DAYS: f64 = 365.25;

// ------------------------------------------------------------------------------------
// Segments
// ------------------------------------------------------------------------------------

/// **1800–1860**
#[inline]
fn delta_t_1800(y: f64) -> f64 {
    let t = y - 1800.0;
    13.72 - 0.332_447 * t + 0.006_861_2 * t.powi(2) + 0.004_111_6 * t.powi(3)
        - 0.000_374_36 * t.powi(4)
        + 0.000_012_127_2 * t.powi(5)
        - 0.000_000_169_9 * t.powi(6)
        + 0.000_000_000_875 * t.powi(7)
}

/// **1860–1900**
#[inline]
fn delta_t_1860(y: f64) -> f64 {
    let t = y - 1860.0;
    7.62 + 0.573_7 * t - 0.251_754 * t.powi(2) + 0.016_806_68 * t.powi(3)
        - 0.000_447_362_4 * t.powi(4)
        + t.powi(5) / 233_174.0
}

/// **1900–1920**
#[inline]
fn delta_t_1900(y: f64) -> f64 {
    let t = y - 1900.0;
    -2.79 + 1.494_119 * t - 0.059_893_9 * t.powi(2) + 0.006_196_6 * t.powi(3)
        - 0.000_197 * t.powi(4)
}

/// **1920–1941**
#[inline]
fn delta_t_1920(y: f64) -> f64 {
    let t = y - 1920.0;
    21.20 + 0.844_93 * t - 0.076_100 * t.powi(2) + 0.002_093_6 * t.powi(3)
}

/// **1941–1961**
#[inline]
fn delta_t_1941(y: f64) -> f64 {
    let t = y - 1950.0;
    29.07 + 0.407 * t - t.powi(2) / 233.0 + t.powi(3) / 2_547.0
}

/// **1961–1986**
#[inline]
fn delta_t_1961(y: f64) -> f64 {
    let t = y - 1975.0;
    45.45 + 1.067 * t - t.powi(2) / 260.0 - t.powi(3) / 718.0
}

/// **1986–2005**
#[inline]
fn delta_t_1986(y: f64) -> f64 {
    let t = y - 2000.0;
    63.86 + 0.334_5 * t - 0.060_374 * t.powi(2)
        + 0.001_727_5 * t.powi(3)
        + 0.000_651_814 * t.powi(4)
        + 0.000_023_735_99 * t.powi(5)
}

/// **2005–2050**
#[inline]
fn delta_t_2005(y: f64) -> f64 {
    let t = y - 2000.0;
    62.92 + 0.322_17 * t + 0.005_589 * t.powi(2)
}

/// **2050–2150**
#[inline]
fn delta_t_2050(y: f64) -> f64 {
    let u = (y - 1820.0) / 100.0;
    -20.0 + 32.0 * u * u - 0.562_8 * (2150.0 - y)
}

/// Long-term parabola outside the fitted segments.
#[inline]
fn delta_t_long_term(y: f64) -> f64 {
    let u = (y - 1820.0) / 100.0;
    -20.0 + 32.0 * u * u
}

/// Decimal year for a Julian Day on the UT axis.
#[inline]
fn decimal_year(jd_ut: Days) -> f64 {
    2000.0 + (jd_ut.value() - JD_2000) / JULIAN_YEAR_DAYS
}

/// Returns **ΔT** for a Julian Day on the **UT** axis.
pub fn delta_t(jd_ut: Days) -> Seconds {
    let y = decimal_year(jd_ut);
    let seconds = match y {
        y if y < 1800.0 => delta_t_long_term(y),
        y if y < 1860.0 => delta_t_1800(y),
        y if y < 1900.0 => delta_t_1860(y),
        y if y < 1920.0 => delta_t_1900(y),
        y if y < 1941.0 => delta_t_1920(y),
        y if y < 1961.0 => delta_t_1941(y),
        y if y < 1986.0 => delta_t_1961(y),
        y if y < 2005.0 => delta_t_1986(y),
        y if y < 2050.0 => delta_t_2005(y),
        y if y < 2150.0 => delta_t_2050(y),
        _ => delta_t_long_term(y),
    };
    Seconds::new(seconds)
}
