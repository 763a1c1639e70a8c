use std::sync::Arc;

use usvg::fontdb::{Database, Family, Query, Stretch, Style, Weight};

/// Sans faces tried, in order, when none of the families a thumbnail asks for is installed.
const SANS_CHAIN: &[&str] = &[
    "Arial",
    "Helvetica",
    "Liberation Sans",
    "DejaVu Sans",
    "Noto Sans",
];

/// Shared font database for thumbnail and overlay SVG parsing.
///
/// Loading system fonts is slow, so the database is built once per session and shared by every
/// worker through an `Arc`.
#[derive(Clone)]
pub struct SvgFonts {
    db: Arc<Database>,
}

impl std::fmt::Debug for SvgFonts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SvgFonts({} faces)", self.face_count())
    }
}

impl SvgFonts {
    /// Every face the platform exposes.
    pub fn system() -> Self {
        let mut db = Database::new();
        db.load_system_fonts();
        if db.is_empty() {
            tracing::warn!("no system fonts found; overlay text will not be drawn");
        } else {
            tracing::debug!(faces = db.len(), "loaded system fonts");
        }
        Self { db: Arc::new(db) }
    }

    /// A database with no faces. Text renders as nothing.
    pub fn empty() -> Self {
        Self {
            db: Arc::new(Database::new()),
        }
    }

    pub fn face_count(&self) -> usize {
        self.db.len()
    }

    pub fn options(&self) -> usvg::Options<'static> {
        usvg::Options {
            fontdb: self.db.clone(),
            font_resolver: usvg::FontResolver {
                select_font: Box::new(|font, db| {
                    let families = candidate_families(font.families());
                    let style = match font.style() {
                        usvg::FontStyle::Normal => Style::Normal,
                        usvg::FontStyle::Italic => Style::Italic,
                        usvg::FontStyle::Oblique => Style::Oblique,
                    };
                    db.query(&Query {
                        families: &families,
                        weight: Weight(font.weight()),
                        stretch: Stretch::Normal,
                        style,
                    })
                    // Any loaded face.
                    .or_else(|| db.faces().next().map(|face| face.id))
                }),
                select_fallback: usvg::FontResolver::default_fallback_selector(),
            },
            ..Default::default()
        }
    }
}

/// Query order for one text run: its own families, then [`SANS_CHAIN`], then generic sans.
fn candidate_families(requested: &[usvg::FontFamily]) -> Vec<Family<'_>> {
    let own = requested.iter().map(|family| match family {
        usvg::FontFamily::Named(name) => Family::Name(name.as_str()),
        usvg::FontFamily::Serif => Family::Serif,
        usvg::FontFamily::SansSerif => Family::SansSerif,
        usvg::FontFamily::Monospace => Family::Monospace,
        usvg::FontFamily::Cursive => Family::Cursive,
        usvg::FontFamily::Fantasy => Family::Fantasy,
    });
    own.chain(SANS_CHAIN.iter().map(|&name| Family::Name(name)))
        .chain(std::iter::once(Family::SansSerif))
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/render/fonts.rs"]
mod tests;
