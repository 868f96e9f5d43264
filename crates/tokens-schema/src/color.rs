//! Color parsing
//!
//! Accepted notations:
//!
//! - hex: `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`
//! - functional: `rgb()`, `rgba()`, `hsl()`, `hsla()` with comma or
//!   space separated arguments and an optional `/ alpha`
//! - DTCG object: `{ "colorSpace": "srgb", "components": [r, g, b], "alpha": a }`

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Error, Result};

static FUNCTIONAL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(rgba?|hsla?)\(\s*([^()]*?)\s*\)$").unwrap());

/// An sRGB color with channels in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    /// Create a color, clamping every channel into range.
    pub fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self {
            r: r.clamp(0.0, 1.0),
            g: g.clamp(0.0, 1.0),
            b: b.clamp(0.0, 1.0),
            a: a.clamp(0.0, 1.0),
        }
    }

    /// Parse a token `$value` into a color.
    pub fn from_value(value: &Value) -> Result<Self> {
        let parsed = match value {
            Value::String(text) => Self::parse(text),
            Value::Object(_) => from_components(value),
            _ => None,
        };
        parsed.ok_or_else(|| Error::InvalidColor {
            value: value.to_string(),
        })
    }

    /// Parse a textual color notation.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if let Some(hex) = text.strip_prefix('#') {
            return from_hex(hex);
        }

        let caps = FUNCTIONAL_PATTERN.captures(text)?;
        let function = caps.get(1)?.as_str().to_ascii_lowercase();
        let args = split_args(caps.get(2)?.as_str())?;

        if function.starts_with("rgb") {
            from_rgb_args(&args)
        } else {
            from_hsl_args(&args)
        }
    }

    /// Format as `#rrggbb` or `#rrggbbaa` when not fully opaque.
    pub fn to_hex(&self) -> String {
        let byte = |c: f64| (c * 255.0).round() as u8;
        if self.a >= 1.0 {
            format!("#{:02x}{:02x}{:02x}", byte(self.r), byte(self.g), byte(self.b))
        } else {
            format!(
                "#{:02x}{:02x}{:02x}{:02x}",
                byte(self.r),
                byte(self.g),
                byte(self.b),
                byte(self.a)
            )
        }
    }
}

fn from_hex(hex: &str) -> Option<Rgba> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let expanded: String = match hex.len() {
        3 | 4 => hex.chars().flat_map(|c| [c, c]).collect(),
        6 | 8 => hex.to_string(),
        _ => return None,
    };

    let channel = |i: usize| -> Option<f64> {
        let pair = expanded.get(i * 2..i * 2 + 2)?;
        u8::from_str_radix(pair, 16).ok().map(|v| f64::from(v) / 255.0)
    };

    let alpha = if expanded.len() == 8 { channel(3)? } else { 1.0 };
    Some(Rgba::new(channel(0)?, channel(1)?, channel(2)?, alpha))
}

/// Split `r, g, b` / `r g b / a` argument lists into at most four parts.
fn split_args(args: &str) -> Option<Vec<&str>> {
    let parts: Vec<&str> = args
        .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
        .filter(|p| !p.is_empty())
        .collect();
    matches!(parts.len(), 3 | 4).then_some(parts)
}

fn parse_number(text: &str) -> Option<f64> {
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// A `0..=255` channel or a percentage.
fn rgb_channel(text: &str) -> Option<f64> {
    match text.strip_suffix('%') {
        Some(pct) => parse_number(pct).map(|v| v / 100.0),
        None => parse_number(text).map(|v| v / 255.0),
    }
}

/// A `0..=1` alpha or a percentage.
fn alpha_channel(text: Option<&&str>) -> Option<f64> {
    let Some(text) = text else {
        return Some(1.0);
    };
    match text.strip_suffix('%') {
        Some(pct) => parse_number(pct).map(|v| v / 100.0),
        None => parse_number(text),
    }
}

fn from_rgb_args(args: &[&str]) -> Option<Rgba> {
    let [r, g, b, rest @ ..] = args else {
        return None;
    };
    Some(Rgba::new(
        rgb_channel(r)?,
        rgb_channel(g)?,
        rgb_channel(b)?,
        alpha_channel(rest.first())?,
    ))
}

fn from_hsl_args(args: &[&str]) -> Option<Rgba> {
    let [h, s, l, rest @ ..] = args else {
        return None;
    };
    let hue = parse_number(h.strip_suffix("deg").unwrap_or(*h))?.rem_euclid(360.0);
    let sat = parse_number(s.strip_suffix('%')?)? / 100.0;
    let light = parse_number(l.strip_suffix('%')?)? / 100.0;
    let (sat, light) = (sat.clamp(0.0, 1.0), light.clamp(0.0, 1.0));

    let chroma = (1.0 - (2.0 * light - 1.0).abs()) * sat;
    let sector = hue / 60.0;
    let x = chroma * (1.0 - (sector % 2.0 - 1.0).abs());
    let (r1, g1, b1) = match sector as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = light - chroma / 2.0;

    Some(Rgba::new(r1 + m, g1 + m, b1 + m, alpha_channel(rest.first())?))
}

fn from_components(value: &Value) -> Option<Rgba> {
    let space = value.get("colorSpace").and_then(Value::as_str).unwrap_or("srgb");
    if !space.eq_ignore_ascii_case("srgb") {
        return None;
    }

    let components = value.get("components")?.as_array()?;
    let [r, g, b] = components.as_slice() else {
        return None;
    };
    let alpha = match value.get("alpha") {
        Some(a) => a.as_f64()?,
        None => 1.0,
    };

    Some(Rgba::new(r.as_f64()?, g.as_f64()?, b.as_f64()?, alpha))
}
