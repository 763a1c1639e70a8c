use serde_json::json;

use super::*;
use crate::geometry::network::LaneType;

fn line(id: &str, pts: &[(f64, f64)]) -> Track {
    Track::new(id, pts.iter().map(|&(lon, lat)| Coord::new(lon, lat)).collect())
}

const NO_STATIONS: &[()] = &[];

#[test]
fn parallel_pair_sharing_rail_counts_one_halved_track() {
    let pts = [(0.0, 0.0), (1.0, 0.0)];
    let tracks = vec![line("a", &pts), line("b", &pts)];
    let groups = vec![TrackGroup::new(LaneType::Parallel, ["a", "b"])];

    let s = summarize(&tracks, &groups, NO_STATIONS, LengthUnit::Km);
    // One degree of longitude on the equator is a * pi / 180 = 111.3194908 km. The shared
    // segment is counted once and credited at 1/2.
    assert!((s.network_length - 111.319_490_8 / 2.0).abs() < 1e-6);

    let single = summarize(&tracks[..1], &groups, NO_STATIONS, LengthUnit::Km);
    assert_eq!(single.network_length, s.network_length);
}

#[test]
fn divisors_follow_lane_type() {
    let unit_len = |_: Coord, _: Coord| 8.0;
    let tracks = vec![
        line("s", &[(0.0, 0.0), (0.0, 1.0)]),
        line("p", &[(1.0, 0.0), (1.0, 1.0)]),
        line("q", &[(2.0, 0.0), (2.0, 1.0)]),
        line("loose", &[(3.0, 0.0), (3.0, 1.0)]),
    ];
    let groups = vec![
        TrackGroup::new(LaneType::Single, ["s"]),
        TrackGroup::new(LaneType::Parallel, ["p"]),
        TrackGroup::new(LaneType::Quad, ["q"]),
    ];
    let s = summarize_with(&tracks, &groups, NO_STATIONS, LengthUnit::Km, unit_len);
    assert_eq!(s.network_length, 8.0 + 4.0 + 2.0 + 8.0);
}

#[test]
fn track_in_several_groups_takes_largest_divisor() {
    let tracks = vec![line("t", &[(0.0, 0.0), (0.0, 1.0)])];
    let groups = vec![
        TrackGroup::new(LaneType::Parallel, ["t"]),
        TrackGroup::new(LaneType::Quad, ["t"]),
        TrackGroup::new(LaneType::Single, ["t"]),
    ];
    let s = summarize_with(&tracks, &groups, NO_STATIONS, LengthUnit::Km, |_, _| 8.0);
    assert_eq!(s.network_length, 2.0);
}

#[test]
fn reversed_and_duplicate_segments_are_counted_once() {
    let tracks = vec![
        line("a", &[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]),
        line("b", &[(2.0, 0.0), (1.0, 0.0)]),
        line("c", &[(-0.0, 0.0), (1.0, 0.0)]),
    ];
    let s = summarize_with(&tracks, &[], NO_STATIONS, LengthUnit::Km, |_, _| 1.0);
    assert_eq!(s.network_length, 2.0);
}

#[test]
fn overlapping_duplicate_track_does_not_change_length() {
    let base = vec![
        line("a", &[(4.90, 52.37), (4.91, 52.36), (4.95, 52.35)]),
        line("b", &[(4.80, 52.30), (4.85, 52.31)]),
    ];
    let groups = vec![TrackGroup::new(LaneType::Parallel, ["a", "a2"])];
    let before = summarize(&base, &groups, NO_STATIONS, LengthUnit::Km);
    let again = summarize(&base, &groups, NO_STATIONS, LengthUnit::Km);
    assert_eq!(before, again);

    let mut with_dup = base.clone();
    with_dup.push(line("a2", &[(4.90, 52.37), (4.91, 52.36), (4.95, 52.35)]));
    let after = summarize(&with_dup, &groups, NO_STATIONS, LengthUnit::Km);
    assert_eq!(before.network_length, after.network_length);
}

#[test]
fn miles_are_km_times_conversion_factor() {
    let tracks = vec![line("a", &[(-0.1276, 51.5072), (2.3522, 48.8566)])];
    let km = summarize(&tracks, &[], NO_STATIONS, LengthUnit::Km);
    let mi = summarize(&tracks, &[], NO_STATIONS, LengthUnit::Mi);
    assert!((mi.network_length - km.network_length * KM_TO_MI).abs() < 1e-9);
    assert_eq!(mi.unit, LengthUnit::Mi);
    assert_eq!(mi.length_label(), format!("{:.1} mi", mi.network_length));
}

#[test]
fn degenerate_tracks_contribute_nothing() {
    let tracks = vec![
        line("empty", &[]),
        line("point", &[(1.0, 1.0)]),
        line("nan", &[(f64::NAN, 1.0), (1.0, 1.0)]),
    ];
    let s = summarize_with(&tracks, &[], NO_STATIONS, LengthUnit::Km, |_, _| 1.0);
    assert_eq!(s.network_length, 0.0);
}

#[test]
fn station_count_is_entry_count() {
    let stations = vec![json!({"id": 1}), json!({"id": 2}), json!({})];
    let s = summarize(&[], &[], &stations, LengthUnit::Km);
    assert_eq!(s.station_count, 3);
    assert_eq!(s.network_length, 0.0);
}

#[test]
fn unit_parsing() {
    assert_eq!("KM".parse::<LengthUnit>().unwrap(), LengthUnit::Km);
    assert_eq!("miles".parse::<LengthUnit>().unwrap(), LengthUnit::Mi);
    assert!("furlongs".parse::<LengthUnit>().is_err());
    let u: LengthUnit = serde_json::from_value(json!("mi")).unwrap();
    assert_eq!(u, LengthUnit::Mi);
}

#[test]
fn network_json_accepts_numeric_ids_and_unknown_lane_types() {
    let track: Track =
        serde_json::from_value(json!({"id": 7, "coords": [[1.0, 2.0, 30.0], [3.0, 4.0]]}))
            .unwrap();
    assert_eq!(track.id, TrackId::new("7"));
    assert_eq!(track.coords[0], Coord::new(1.0, 2.0));

    let g: TrackGroup =
        serde_json::from_value(json!({"laneType": "hexa", "trackIds": ["7", 8]})).unwrap();
    assert_eq!(g.lane_type, LaneType::Single);
    assert_eq!(g.track_ids, vec![TrackId::new("7"), TrackId::new("8")]);

    let g: TrackGroup = serde_json::from_value(json!({"type": "quad", "tracks": [1]})).unwrap();
    assert_eq!(g.lane_type.divisor(), 4);

    let g: TrackGroup = serde_json::from_value(json!({"laneType": "parallel"})).unwrap();
    assert_eq!(g.lane_type, LaneType::Parallel);
    let g: TrackGroup = serde_json::from_value(json!({"trackIds": []})).unwrap();
    assert_eq!(g.lane_type, LaneType::default());
    assert_eq!(LaneType::default(), LaneType::Single);
}
