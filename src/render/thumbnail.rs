use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::foundation::color::ColorKey;
use crate::foundation::core::{Canvas, Rgba8};
use crate::foundation::error::{LapseError, LapseResult};
use crate::legend::LineDescriptor;
use crate::render::fonts::SvgFonts;
use crate::render::frame::FrameRGBA;

/// Force every stroke in `svg` to `line_width` by injecting a stylesheet right after the root
/// `<svg ...>` start tag. Markup without an open root tag is returned unchanged.
pub fn override_stroke_width(svg: &str, line_width: f32) -> String {
    let Some(insert_at) = root_tag_end(svg) else {
        return svg.to_owned();
    };
    let style = format!("<style>*{{stroke-width:{line_width}px}}</style>");
    let mut out = String::with_capacity(svg.len() + style.len());
    out.push_str(&svg[..insert_at]);
    out.push_str(&style);
    out.push_str(&svg[insert_at..]);
    out
}

/// Byte offset just past the `>` closing the root `<svg` start tag.
fn root_tag_end(svg: &str) -> Option<usize> {
    let bytes = svg.as_bytes();
    let mut search = 0;
    let start = loop {
        let at = search + svg[search..].find("<svg")?;
        let next = bytes.get(at + 4).copied();
        if matches!(next, Some(b' ' | b'\t' | b'\r' | b'\n' | b'>' | b'/')) {
            break at;
        }
        search = at + 4;
    };

    let mut quote: Option<u8> = None;
    for (i, &b) in bytes.iter().enumerate().skip(start + 4) {
        match (quote, b) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, b'"' | b'\'') => quote = Some(b),
            (None, b'>') => {
                // Self-closing root: nothing to style.
                if bytes[i - 1] == b'/' {
                    return None;
                }
                return Some(i + 1);
            }
            (None, _) => {}
        }
    }
    None
}

pub fn parse_tree(svg: &str, fonts: &SvgFonts) -> LapseResult<usvg::Tree> {
    usvg::Tree::from_str(svg, &fonts.options())
        .map_err(|e| LapseError::render(format!("parse svg thumbnail: {e}")))
}

/// One descriptor per element of the source markup that declares a stroke color, in document
/// order. Children inheriting a group's stroke are not counted again.
///
/// `none`, paint-server references and unparseable colors declare no line.
pub fn line_descriptors(svg: &str) -> LapseResult<Vec<LineDescriptor>> {
    let mut reader = Reader::from_str(svg);
    reader.config_mut().trim_text(true);

    let mut out = Vec::new();
    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                if let Some(color) = declared_stroke(e)? {
                    out.push(LineDescriptor::new(out.len() + 1, color));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(LapseError::render(format!(
                    "scan svg thumbnail at byte {}: {e}",
                    reader.error_position()
                )));
            }
            _ => {}
        }
    }
    Ok(out)
}

/// Stroke color set on `elem` itself, by attribute or inline style. Inline style wins.
fn declared_stroke(elem: &BytesStart) -> LapseResult<Option<ColorKey>> {
    let mut attr_value = None;
    let mut style_value = None;
    for attr in elem.attributes() {
        let attr = attr.map_err(|e| LapseError::render(format!("svg attribute: {e}")))?;
        let value = attr
            .unescape_value()
            .map_err(|e| LapseError::render(format!("svg attribute value: {e}")))?;
        match attr.key.as_ref() {
            b"stroke" => attr_value = Some(value.into_owned()),
            b"style" => style_value = style_property(&value, "stroke").map(str::to_owned),
            _ => {}
        }
    }
    Ok(style_value
        .or(attr_value)
        .and_then(|v| ColorKey::parse(&v).ok()))
}

/// Value of `name` in a CSS declaration list such as `fill:none;stroke:#f00`.
fn style_property<'a>(style: &'a str, name: &str) -> Option<&'a str> {
    style.split(';').rev().find_map(|decl| {
        let (key, value) = decl.split_once(':')?;
        (key.trim() == name).then(|| value.trim())
    })
}

/// Rasterize `tree` over a solid `background`, stretched to fill `canvas` on both axes.
pub fn rasterize(tree: &usvg::Tree, canvas: Canvas, background: Rgba8) -> LapseResult<FrameRGBA> {
    let mut pixmap = resvg::tiny_skia::Pixmap::new(canvas.width, canvas.height)
        .ok_or_else(|| LapseError::render("failed to allocate thumbnail pixmap"))?;
    pixmap.fill(resvg::tiny_skia::Color::from_rgba8(
        background.r,
        background.g,
        background.b,
        background.a,
    ));

    let size = tree.size();
    if !(size.width().is_finite() && size.height().is_finite())
        || size.width() <= 0.0
        || size.height() <= 0.0
    {
        return Err(LapseError::render("svg thumbnail has invalid width/height"));
    }
    let sx = (canvas.width as f32) / size.width();
    let sy = (canvas.height as f32) / size.height();
    let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);

    resvg::render(tree, xform, &mut pixmap.as_mut());
    Ok(FrameRGBA::from_pixmap(pixmap))
}

/// Everything extracted from one save's thumbnail.
#[derive(Debug, Clone)]
pub struct RenderedThumbnail {
    pub frame: FrameRGBA,
    pub lines: Vec<LineDescriptor>,
}

/// Parse, describe and rasterize a thumbnail with the configured line width.
pub fn render_thumbnail(
    svg: &str,
    fonts: &SvgFonts,
    line_width: f32,
    canvas: Canvas,
    background: Rgba8,
) -> LapseResult<RenderedThumbnail> {
    let markup = override_stroke_width(svg, line_width);
    let tree = parse_tree(&markup, fonts)?;
    let lines = line_descriptors(svg)?;
    let frame = rasterize(&tree, canvas, background)?;
    Ok(RenderedThumbnail { frame, lines })
}

#[cfg(test)]
#[path = "../../tests/unit/render/thumbnail.rs"]
mod tests;
