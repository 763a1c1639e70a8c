use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::Mutex;

use crate::foundation::error::{LapseError, LapseResult};
use crate::geometry::GeometrySummary;
use crate::legend::{LegendRow, LegendShape};
use crate::render::fonts::SvgFonts;
use crate::render::frame::FrameRGBA;

/// Frame side the base metrics below are tuned for.
const BASE_RES: f32 = 2000.0;

const MARGIN: f32 = 20.0;
const PADDING: f32 = 15.0;
const ROW_HEIGHT: f32 = 36.0;
const SWATCH: f32 = 30.0;
const FONT_SIZE: f32 = 28.0;
const PANEL_RADIUS: f32 = 20.0;
const PANEL_FILL: &str = "rgb(20,20,20)";
const PANEL_OPACITY: f32 = 200.0 / 255.0;
const FONT_FAMILY: &str = "Arial, Helvetica, sans-serif";

/// What to draw on top of each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayOpts {
    pub legend: bool,
    pub length: bool,
    pub stations: bool,
}

/// Draws the legend panel and the stat box onto rasterized frames.
#[derive(Debug)]
pub struct OverlayRenderer {
    fonts: SvgFonts,
    opts: OverlayOpts,
    text_widths: Mutex<HashMap<(String, u32), f32>>,
}

impl OverlayRenderer {
    pub fn new(fonts: SvgFonts, opts: OverlayOpts) -> Self {
        Self {
            fonts,
            opts,
            text_widths: Mutex::new(HashMap::new()),
        }
    }

    pub fn opts(&self) -> OverlayOpts {
        self.opts
    }

    /// Draw the overlay in place. The frame is untouched if this returns an error.
    pub fn draw(
        &self,
        frame: &mut FrameRGBA,
        legend: &[LegendRow],
        summary: &GeometrySummary,
    ) -> LapseResult<()> {
        let Some(svg) = self.overlay_svg(frame.width, frame.height, legend, summary) else {
            return Ok(());
        };
        let tree = usvg::Tree::from_str(&svg, &self.fonts.options())
            .map_err(|e| LapseError::render(format!("parse overlay svg: {e}")))?;

        let mut pixmap =
            resvg::tiny_skia::PixmapMut::from_bytes(&mut frame.data, frame.width, frame.height)
                .ok_or_else(|| LapseError::render("frame buffer does not match its dimensions"))?;
        resvg::render(&tree, resvg::tiny_skia::Transform::identity(), &mut pixmap);
        Ok(())
    }

    /// Overlay markup for a `width x height` frame, or `None` when there is nothing to draw.
    pub fn overlay_svg(
        &self,
        width: u32,
        height: u32,
        legend: &[LegendRow],
        summary: &GeometrySummary,
    ) -> Option<String> {
        let scale = (width.min(height) as f32) / BASE_RES;
        let mut body = String::new();

        if self.opts.legend && !legend.is_empty() {
            self.push_legend(&mut body, width as f32, scale, legend);
        }

        let mut stats = Vec::new();
        if self.opts.length {
            stats.push(format!("Length: {}", summary.length_label()));
        }
        if self.opts.stations {
            stats.push(format!("Stations: {}", summary.station_count));
        }
        if !stats.is_empty() {
            self.push_stat_box(&mut body, height as f32, scale, &stats);
        }

        if body.is_empty() {
            return None;
        }
        Some(format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">{body}</svg>"#
        ))
    }

    fn push_legend(&self, out: &mut String, width: f32, scale: f32, legend: &[LegendRow]) {
        let pad = PADDING * scale;
        let row_h = ROW_HEIGHT * scale;
        let swatch = SWATCH * scale;
        let font = FONT_SIZE * scale;

        let name_w = legend
            .iter()
            .map(|r| self.text_width(&r.name, font))
            .fold(0.0f32, f32::max);
        let text_x = 20.0 * scale + swatch;
        let box_w = text_x + name_w + 30.0 * scale;
        let box_h = row_h * legend.len() as f32 + 2.0 * pad;
        let x0 = width - box_w - MARGIN * scale;
        let y0 = MARGIN * scale;

        push_panel(out, x0, y0, box_w, box_h, PANEL_RADIUS * scale);

        for (i, row) in legend.iter().enumerate() {
            let y = y0 + pad + (i as f32) * row_h;
            let sx = x0 + 10.0 * scale;
            push_swatch(out, row, sx, y, swatch);
            push_text(out, x0 + text_x, y + swatch / 2.0, font, &row.name);
        }
    }

    fn push_stat_box(&self, out: &mut String, height: f32, scale: f32, lines: &[String]) {
        let pad = PADDING * scale;
        let row_h = ROW_HEIGHT * scale;
        let font = FONT_SIZE * scale;

        let text_w = lines
            .iter()
            .map(|l| self.text_width(l, font))
            .fold(0.0f32, f32::max);
        let box_w = text_w + 2.0 * pad;
        let box_h = row_h * lines.len() as f32 + 2.0 * pad;
        let x0 = MARGIN * scale;
        let y0 = height - box_h - MARGIN * scale;

        push_panel(out, x0, y0, box_w, box_h, PANEL_RADIUS * scale);
        for (i, line) in lines.iter().enumerate() {
            let y = y0 + pad + (i as f32) * row_h;
            push_text(out, x0 + pad, y + row_h / 2.0, font, line);
        }
    }

    /// Rendered width of `text`, measured by laying it out with the session fonts.
    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        let key = (text.to_owned(), font_size.to_bits());
        if let Ok(cache) = self.text_widths.lock()
            && let Some(w) = cache.get(&key)
        {
            return *w;
        }

        let w = self
            .measure(text, font_size)
            .unwrap_or_else(|| estimate_text_width(text, font_size));
        if let Ok(mut cache) = self.text_widths.lock() {
            cache.insert(key, w);
        }
        w
    }

    fn measure(&self, text: &str, font_size: f32) -> Option<f32> {
        if self.fonts.face_count() == 0 || text.is_empty() {
            return None;
        }
        let mut svg = String::from(r#"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10">"#);
        push_text(&mut svg, 0.0, font_size, font_size, text);
        svg.push_str("</svg>");

        let tree = usvg::Tree::from_str(&svg, &self.fonts.options()).ok()?;
        let root = tree.root();
        if !root.has_children() {
            return None;
        }
        let w = root.abs_bounding_box().width();
        (w.is_finite() && w > 0.0).then_some(w)
    }
}

/// Width guess for when no font is available to measure with.
fn estimate_text_width(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * 0.6
}

fn push_panel(out: &mut String, x: f32, y: f32, w: f32, h: f32, r: f32) {
    let _ = write!(
        out,
        r#"<rect x="{x}" y="{y}" width="{w}" height="{h}" rx="{r}" fill="{PANEL_FILL}" fill-opacity="{PANEL_OPACITY}"/>"#
    );
}

fn push_swatch(out: &mut String, row: &LegendRow, x: f32, y: f32, size: f32) {
    let color = row.color.as_str();
    let _ = match row.shape {
        LegendShape::Square => write!(
            out,
            r#"<rect x="{x}" y="{y}" width="{size}" height="{size}" fill="{color}"/>"#
        ),
        LegendShape::RoundedSquare => write!(
            out,
            r#"<rect x="{x}" y="{y}" width="{size}" height="{size}" rx="{r}" fill="{color}"/>"#,
            r = size * 0.2
        ),
        LegendShape::Circle => write!(
            out,
            r#"<circle cx="{cx}" cy="{cy}" r="{r}" fill="{color}"/>"#,
            cx = x + size / 2.0,
            cy = y + size / 2.0,
            r = size / 2.0
        ),
        LegendShape::Diamond => {
            let (cx, cy, h) = (x + size / 2.0, y + size / 2.0, size / 2.0);
            write!(
                out,
                r#"<polygon points="{cx},{top} {right},{cy} {cx},{bottom} {left},{cy}" fill="{color}"/>"#,
                top = cy - h,
                right = cx + h,
                bottom = cy + h,
                left = cx - h
            )
        }
    };
}

/// White text vertically centered on `center_y`.
fn push_text(out: &mut String, x: f32, center_y: f32, font_size: f32, text: &str) {
    let baseline = center_y + font_size * 0.35;
    let _ = write!(
        out,
        r##"<text x="{x}" y="{baseline}" font-family="{FONT_FAMILY}" font-size="{font_size}" fill="#ffffff">{}</text>"##,
        escape_xml(text)
    );
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/overlay.rs"]
mod tests;
