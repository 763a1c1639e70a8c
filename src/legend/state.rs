use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::foundation::color::ColorKey;
use crate::legend::pool::{LegendShape, NamePool};

/// One stroked line found in a single frame's thumbnail.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct LineDescriptor {
    /// 1-based position in the thumbnail's document order.
    pub local_index: usize,
    pub color: ColorKey,
}

impl LineDescriptor {
    pub fn new(local_index: usize, color: ColorKey) -> Self {
        Self { local_index, color }
    }
}

/// A renderable legend row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct LegendRow {
    pub color: ColorKey,
    pub name: String,
    pub shape: LegendShape,
}

/// Cumulative legend state, advanced once per frame in save order.
///
/// Rows are only ever appended. A `(color, name)` pair assigned at frame `i` is shown unchanged at
/// every later frame, whether or not that color is still visible.
#[derive(Debug, Clone)]
pub struct LegendState {
    pool: NamePool,
    rows: Vec<LegendRow>,
    assigned: HashSet<(ColorKey, String)>,
    used: HashMap<ColorKey, usize>,
    frames_seen: u64,
}

impl LegendState {
    pub fn new(pool: NamePool) -> Self {
        Self {
            pool,
            rows: Vec::new(),
            assigned: HashSet::new(),
            used: HashMap::new(),
            frames_seen: 0,
        }
    }

    /// Fold one frame's line descriptors into the legend and return the full legend after it.
    pub fn advance(&mut self, frame: &[LineDescriptor]) -> &[LegendRow] {
        self.frames_seen += 1;

        for (color, count_in_frame) in count_by_color(frame) {
            let entry = self.pool.lookup(&color);
            let already_used = self.used.get(&color).copied().unwrap_or(0);
            let reach = count_in_frame.min(entry.names.len());

            for name in entry.names.iter().take(reach).skip(already_used) {
                let key = (color.clone(), name.clone());
                if self.assigned.contains(&key) {
                    continue;
                }
                self.rows.push(LegendRow {
                    color: color.clone(),
                    name: name.clone(),
                    shape: entry.shape,
                });
                self.assigned.insert(key);
            }

            self.used.insert(color, already_used.max(reach));
        }

        &self.rows
    }

    /// Current legend in insertion order.
    pub fn rows(&self) -> &[LegendRow] {
        &self.rows
    }

    pub fn snapshot(&self) -> Vec<LegendRow> {
        self.rows.clone()
    }

    /// Names consumed so far from `color`'s pool.
    pub fn names_used(&self, color: &ColorKey) -> usize {
        self.used.get(color).copied().unwrap_or(0)
    }

    pub fn frames_seen(&self) -> u64 {
        self.frames_seen
    }

    pub fn pool(&self) -> &NamePool {
        &self.pool
    }
}

/// Per-color descriptor counts, ordered by each color's first appearance in the frame.
fn count_by_color(frame: &[LineDescriptor]) -> Vec<(ColorKey, usize)> {
    let mut order = Vec::<(ColorKey, usize)>::new();
    let mut slot = HashMap::<&ColorKey, usize>::new();
    for d in frame {
        if let Some(&i) = slot.get(&d.color) {
            order[i].1 += 1;
            continue;
        }
        slot.insert(&d.color, order.len());
        order.push((d.color.clone(), 1));
    }
    order
}

#[cfg(test)]
#[path = "../../tests/unit/legend/state.rs"]
mod tests;
