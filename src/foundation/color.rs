use crate::foundation::core::Rgba8;
use serde::{Deserialize, Serialize};

/// Canonical `#rrggbb` (lowercase) color identifier.
///
/// Every accepted spelling of a color that renders identically maps to the same key, so keys can
/// be compared directly across frames and against the configured name pools.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ColorKey(String);

impl ColorKey {
    /// Parse `#rgb`, `#rrggbb` or `rgb(r, g, b)` (case-insensitive, surrounding whitespace ok).
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim().to_ascii_lowercase();
        if let Some(body) = s.strip_prefix("rgb(").and_then(|b| b.strip_suffix(')')) {
            return parse_rgb_fn(body);
        }

        let hex = s
            .strip_prefix('#')
            .ok_or_else(|| format!("color \"{s}\" must start with '#' or 'rgb('"))?;
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(format!("color \"{s}\" has non-hex digits"));
        }
        match hex.len() {
            6 => Ok(Self(format!("#{hex}"))),
            3 => {
                let mut out = String::with_capacity(7);
                out.push('#');
                for c in hex.chars() {
                    out.push(c);
                    out.push(c);
                }
                Ok(Self(out))
            }
            _ => Err(format!("hex color \"{s}\" must be #rgb or #rrggbb")),
        }
    }

    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self(format!("#{r:02x}{g:02x}{b:02x}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_rgba8(&self) -> Rgba8 {
        // Construction guarantees `#rrggbb`.
        let byte = |i: usize| u8::from_str_radix(&self.0[i..i + 2], 16).unwrap_or(0);
        Rgba8::opaque(byte(1), byte(3), byte(5))
    }
}

impl std::fmt::Display for ColorKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for ColorKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<'de> Deserialize<'de> for ColorKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

fn parse_rgb_fn(body: &str) -> Result<ColorKey, String> {
    let parts = body
        .split(',')
        .map(|p| {
            p.trim()
                .parse::<u8>()
                .map_err(|_| format!("invalid rgb() component \"{}\"", p.trim()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    match parts.as_slice() {
        [r, g, b] => Ok(ColorKey::from_rgb(*r, *g, *b)),
        _ => Err("rgb() must have exactly 3 components".to_owned()),
    }
}
