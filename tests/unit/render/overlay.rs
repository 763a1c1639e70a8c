use super::*;
use crate::foundation::color::ColorKey;
use crate::geometry::LengthUnit;

fn row(color: &str, name: &str, shape: LegendShape) -> LegendRow {
    LegendRow {
        color: ColorKey::parse(color).unwrap(),
        name: name.to_owned(),
        shape,
    }
}

fn summary() -> GeometrySummary {
    GeometrySummary {
        network_length: 12.345,
        unit: LengthUnit::Km,
        station_count: 7,
    }
}

fn renderer(legend: bool, length: bool, stations: bool) -> OverlayRenderer {
    OverlayRenderer::new(
        SvgFonts::empty(),
        OverlayOpts {
            legend,
            length,
            stations,
        },
    )
}

fn white_frame(side: u32) -> FrameRGBA {
    FrameRGBA {
        width: side,
        height: side,
        data: vec![255; (side as usize) * (side as usize) * 4],
        premultiplied: true,
    }
}

#[test]
fn nothing_enabled_means_no_markup() {
    let rows = [row("#ff0000", "Red", LegendShape::Square)];
    assert!(
        renderer(false, false, false)
            .overlay_svg(100, 100, &rows, &summary())
            .is_none()
    );
    assert!(
        renderer(true, false, false)
            .overlay_svg(100, 100, &[], &summary())
            .is_none()
    );
}

#[test]
fn stat_lines_follow_the_toggles() {
    let svg = renderer(false, true, true)
        .overlay_svg(100, 100, &[], &summary())
        .unwrap();
    assert!(svg.contains("Length: 12.3 km"));
    assert!(svg.contains("Stations: 7"));

    let svg = renderer(false, false, true)
        .overlay_svg(100, 100, &[], &summary())
        .unwrap();
    assert!(!svg.contains("Length:"));
    assert!(svg.contains("Stations: 7"));
}

#[test]
fn legend_markup_escapes_names_and_draws_each_shape() {
    let rows = [
        row("#ff0000", "A & <B>", LegendShape::Square),
        row("#00ff00", "Ring", LegendShape::Circle),
        row("#0000ff", "Kite", LegendShape::Diamond),
        row("#ffff00", "Soft", LegendShape::RoundedSquare),
    ];
    let svg = renderer(true, false, false)
        .overlay_svg(2000, 2000, &rows, &summary())
        .unwrap();

    assert!(svg.contains("A &amp; &lt;B&gt;"));
    assert!(!svg.contains("<B>"));
    assert!(svg.contains(r##"<circle"##) && svg.contains(r##"fill="#00ff00""##));
    assert!(svg.contains(r##"<polygon"##) && svg.contains(r##"fill="#0000ff""##));
    assert!(svg.contains(r##"rx="6" fill="#ffff00""##));

    // Rows stay in legend order.
    let a = svg.find("A &amp;").unwrap();
    let ring = svg.find("Ring").unwrap();
    let kite = svg.find("Kite").unwrap();
    assert!(a < ring && ring < kite);
}

#[test]
fn markup_parses_as_svg() {
    let rows = [row("#ff0000", "Red", LegendShape::Diamond)];
    let svg = renderer(true, true, true)
        .overlay_svg(300, 200, &rows, &summary())
        .unwrap();
    let tree = usvg::Tree::from_str(&svg, &SvgFonts::empty().options()).unwrap();
    assert_eq!(tree.size().width(), 300.0);
    assert_eq!(tree.size().height(), 200.0);
}

#[test]
fn draw_paints_legend_and_stat_box() {
    let mut frame = white_frame(200);
    let rows = [row("#ff0000", "Red", LegendShape::Square)];
    renderer(true, true, true)
        .draw(&mut frame, &rows, &summary())
        .unwrap();

    // Swatch of the single legend row, top right.
    assert_eq!(frame.pixel(187, 4), Some([255, 0, 0, 255]));
    // Dark panel behind the stats, bottom left.
    let stat = frame.pixel(3, 195).unwrap();
    assert!(stat[0] < 128, "stat box not drawn: {stat:?}");
    // Untouched middle.
    assert_eq!(frame.pixel(100, 100), Some([255, 255, 255, 255]));
}

#[test]
fn draw_without_anything_enabled_leaves_frame_alone() {
    let mut frame = white_frame(32);
    let before = frame.clone();
    renderer(false, false, false)
        .draw(&mut frame, &[], &summary())
        .unwrap();
    assert_eq!(frame, before);
}

#[test]
fn text_width_is_cached_and_estimated_without_fonts() {
    let r = renderer(true, false, false);
    let w = r.text_width("abcd", 10.0);
    assert!((w - 24.0).abs() < 1e-4);
    assert_eq!(r.text_widths.lock().unwrap().len(), 1);
    let _ = r.text_width("abcd", 10.0);
    assert_eq!(r.text_widths.lock().unwrap().len(), 1);
}
