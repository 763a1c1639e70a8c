use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::foundation::color::ColorKey;

/// Placeholder name given to lines whose color has no configured pool.
pub const FALLBACK_LINE_NAME: &str = "Line";

/// Swatch shape drawn next to a legend row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LegendShape {
    #[default]
    Square,
    Circle,
    Diamond,
    #[serde(alias = "rounded_square", alias = "roundedsquare")]
    RoundedSquare,
}

/// Ordered display names (and swatch shape) for one color.
///
/// The n-th line of this color to be observed takes `names[n]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamePoolEntry {
    pub names: Vec<String>,
    pub shape: LegendShape,
}

impl NamePoolEntry {
    pub fn new(names: impl IntoIterator<Item = impl Into<String>>, shape: LegendShape) -> Self {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            shape,
        }
    }

    pub fn fallback() -> Self {
        Self::new([FALLBACK_LINE_NAME], LegendShape::Square)
    }
}

/// Color -> name pool table. Immutable for the duration of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamePool {
    entries: HashMap<ColorKey, NamePoolEntry>,
    fallback: NamePoolEntry,
}

impl Default for NamePool {
    fn default() -> Self {
        Self::new()
    }
}

impl NamePool {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            fallback: NamePoolEntry::fallback(),
        }
    }

    pub fn with_entry(mut self, color: ColorKey, entry: NamePoolEntry) -> Self {
        self.insert(color, entry);
        self
    }

    pub fn insert(&mut self, color: ColorKey, entry: NamePoolEntry) {
        self.entries.insert(color, entry);
    }

    /// Configured entry for `color`, or the generic `"Line"`/square fallback.
    pub fn lookup(&self, color: &ColorKey) -> &NamePoolEntry {
        self.entries.get(color).unwrap_or(&self.fallback)
    }

    pub fn is_configured(&self, color: &ColorKey) -> bool {
        self.entries.contains_key(color)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ColorKey, &NamePoolEntry)> {
        self.entries.iter()
    }
}

impl Serialize for NamePool {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let sorted: BTreeMap<&str, &NamePoolEntry> = self
            .entries
            .iter()
            .map(|(k, v)| (k.as_str(), v))
            .collect();
        sorted.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for NamePool {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Names(Vec<String>),
            Name(String),
            Obj {
                #[serde(default)]
                names: Option<Vec<String>>,
                #[serde(default)]
                shape: LegendShape,
            },
        }

        let raw = BTreeMap::<String, Repr>::deserialize(deserializer)?;
        let mut pool = NamePool::new();
        for (color_raw, repr) in raw {
            let color = ColorKey::parse(&color_raw).map_err(serde::de::Error::custom)?;
            let entry = match repr {
                Repr::Names(names) => NamePoolEntry::new(names, LegendShape::Square),
                Repr::Name(name) => NamePoolEntry::new([name], LegendShape::Square),
                Repr::Obj { names, shape } => {
                    NamePoolEntry::new(names.unwrap_or_else(|| vec![color_raw.clone()]), shape)
                }
            };
            pool.insert(color, entry);
        }
        Ok(pool)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/legend/pool.rs"]
mod tests;
