use super::*;
use crate::legend::pool::{FALLBACK_LINE_NAME, NamePoolEntry};

fn key(s: &str) -> ColorKey {
    ColorKey::parse(s).unwrap()
}

fn frame(colors: &[&str]) -> Vec<LineDescriptor> {
    colors
        .iter()
        .enumerate()
        .map(|(i, c)| LineDescriptor::new(i + 1, key(c)))
        .collect()
}

fn names(rows: &[LegendRow]) -> Vec<(String, String)> {
    rows.iter()
        .map(|r| (r.color.to_string(), r.name.clone()))
        .collect()
}

fn red_green_pool() -> NamePool {
    NamePool::new()
        .with_entry(
            key("#ff0000"),
            NamePoolEntry::new(["A", "B"], LegendShape::Square),
        )
        .with_entry(
            key("#00ff00"),
            NamePoolEntry::new(["G1", "G2", "G3"], LegendShape::Circle),
        )
}

#[test]
fn second_same_color_line_takes_next_name() {
    let mut legend = LegendState::new(red_green_pool());

    let after_1 = names(legend.advance(&frame(&["#ff0000"])));
    assert_eq!(after_1, vec![("#ff0000".into(), "A".into())]);

    let after_2 = names(legend.advance(&frame(&["#ff0000", "#FF0000"])));
    assert_eq!(
        after_2,
        vec![
            ("#ff0000".into(), "A".into()),
            ("#ff0000".into(), "B".into())
        ]
    );
    assert_eq!(legend.names_used(&key("#ff0000")), 2);
}

#[test]
fn legend_grows_monotonically_as_prefix() {
    let frames = [
        frame(&["#00ff00"]),
        frame(&[]),
        frame(&["#ff0000", "#00ff00"]),
        frame(&["#ff0000"]),
        frame(&["#00ff00", "#00ff00", "#ff0000", "#00ff00"]),
        frame(&["#abcdef"]),
        frame(&[]),
    ];

    let mut legend = LegendState::new(red_green_pool());
    let mut prev: Vec<LegendRow> = Vec::new();
    for f in &frames {
        let now = legend.advance(f).to_vec();
        assert!(now.len() >= prev.len());
        assert_eq!(&now[..prev.len()], prev.as_slice());
        prev = now;
    }
    assert_eq!(legend.frames_seen(), frames.len() as u64);
    assert_eq!(
        names(&prev),
        vec![
            ("#00ff00".into(), "G1".into()),
            ("#ff0000".into(), "A".into()),
            ("#00ff00".into(), "G2".into()),
            ("#00ff00".into(), "G3".into()),
            ("#abcdef".into(), FALLBACK_LINE_NAME.into()),
        ]
    );
}

#[test]
fn saturated_pool_never_exceeds_its_size() {
    let mut legend = LegendState::new(red_green_pool());
    legend.advance(&frame(&["#ff0000", "#ff0000", "#ff0000", "#ff0000"]));
    legend.advance(&frame(&["#ff0000"]));
    legend.advance(&frame(&["#ff0000"; 9]));

    let reds = legend
        .rows()
        .iter()
        .filter(|r| r.color == key("#ff0000"))
        .count();
    assert_eq!(reds, 2);
    assert_eq!(legend.names_used(&key("#ff0000")), 2);
}

#[test]
fn disappearing_colors_keep_their_rows() {
    let mut legend = LegendState::new(red_green_pool());
    legend.advance(&frame(&["#ff0000", "#00ff00"]));
    let before = legend.snapshot();
    let after = legend.advance(&frame(&[])).to_vec();
    assert_eq!(before, after);
    let after = legend.advance(&frame(&["#00ff00"])).to_vec();
    assert_eq!(before, after);
}

#[test]
fn unknown_color_gets_a_single_line_row() {
    let mut legend = LegendState::new(NamePool::new());
    let rows = legend
        .advance(&frame(&["#123456", "#123456", "#654321"]))
        .to_vec();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].name, FALLBACK_LINE_NAME);
    assert_eq!(rows[0].shape, LegendShape::Square);
    assert_eq!(rows[0].color, key("#123456"));
    assert_eq!(rows[1].color, key("#654321"));
}

#[test]
fn later_frame_resumes_from_usage_counter() {
    let pool = NamePool::new().with_entry(
        key("#0000ff"),
        NamePoolEntry::new(["X", "Y", "Z"], LegendShape::Diamond),
    );
    let mut legend = LegendState::new(pool);
    legend.advance(&frame(&["#0000ff"]));
    legend.advance(&frame(&["#0000ff"]));
    assert_eq!(legend.rows().len(), 1);

    let rows = legend
        .advance(&frame(&["#0000ff", "#0000ff", "#0000ff"]))
        .to_vec();
    assert_eq!(
        rows.iter().map(|r| r.name.as_str()).collect::<Vec<_>>(),
        vec!["X", "Y", "Z"]
    );
    assert!(rows.iter().all(|r| r.shape == LegendShape::Diamond));
}

#[test]
fn repeated_pool_names_are_not_duplicated() {
    let pool = NamePool::new().with_entry(
        key("#ff0000"),
        NamePoolEntry::new(["A", "A", "B"], LegendShape::Square),
    );
    let mut legend = LegendState::new(pool);
    let rows = legend.advance(&frame(&["#ff0000", "#ff0000"])).to_vec();
    assert_eq!(names(&rows), vec![("#ff0000".into(), "A".into())]);
    assert_eq!(legend.names_used(&key("#ff0000")), 2);

    let rows = legend.advance(&frame(&["#ff0000"; 3])).to_vec();
    assert_eq!(
        names(&rows),
        vec![
            ("#ff0000".into(), "A".into()),
            ("#ff0000".into(), "B".into())
        ]
    );
}

#[test]
fn logical_frame_order_changes_assignment() {
    let forward = [frame(&["#00ff00"]), frame(&["#ff0000", "#00ff00"])];
    let reversed = [frame(&["#ff0000", "#00ff00"]), frame(&["#00ff00"])];

    let mut a = LegendState::new(red_green_pool());
    let first_a = a.advance(&forward[0]).to_vec();
    a.advance(&forward[1]);

    let mut b = LegendState::new(red_green_pool());
    let first_b = b.advance(&reversed[0]).to_vec();
    b.advance(&reversed[1]);

    assert_ne!(first_a, first_b);
    assert_ne!(a.rows(), b.rows());
    assert_eq!(a.rows()[0].color, key("#00ff00"));
    assert_eq!(b.rows()[0].color, key("#ff0000"));
}

#[test]
fn row_order_is_first_appearance_not_lexical() {
    let mut legend = LegendState::new(red_green_pool());
    legend.advance(&frame(&["#ff0000", "#00ff00"]));
    assert_eq!(legend.rows()[0].name, "A");
    assert_eq!(legend.rows()[1].name, "G1");
}
