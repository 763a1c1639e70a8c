use serde_json::json;

use super::*;
use crate::legend::LegendShape;

fn base() -> Config {
    Config {
        save_folder: PathBuf::from("saves"),
        ..Config::default()
    }
}

#[test]
fn defaults_cover_every_optional_field() {
    let c = Config::from_json_str(r#"{"save_folder": "saves/pjil"}"#).unwrap();
    assert_eq!(c.output_name, "output");
    assert_eq!(c.fps, 1.0);
    assert_eq!(c.target_res, 2000);
    assert_eq!(c.threads, 4);
    assert!(c.add_legend);
    assert!(c.export_gif);
    assert!(!c.export_last_png);
    assert!(c.show_stations);
    assert_eq!(c.line_width, 2.5);
    assert_eq!(c.background_color.as_str(), "#1e1e1e");
    assert_eq!(c.unit, LengthUnit::Km);
    assert!(c.color_to_name.is_empty());
    c.validate().unwrap();
}

#[test]
fn parses_full_config() {
    let v = json!({
        "save_folder": "saves/COL",
        "output_folder": "out",
        "output_name": "evolution",
        "fps": 4,
        "target_res": 800,
        "threads": 8,
        "add_legend": false,
        "background_color": "#FFF",
        "export_gif": false,
        "export_last_png": true,
        "line_width": 3,
        "unit": "mi",
        "color_to_name": {
            "#00ADD0": ["DT", "MP", "R"],
            "#ff6319": {"names": ["F"], "shape": "diamond"}
        }
    });
    let c = Config::from_json_str(&v.to_string()).unwrap();
    c.validate().unwrap();
    assert_eq!(c.gif_path(), PathBuf::from("out").join("evolution.gif"));
    assert_eq!(
        c.last_png_path(),
        PathBuf::from("out").join("evolution_LAST.png")
    );
    assert_eq!(c.background_rgba(), Rgba8::opaque(255, 255, 255));
    assert_eq!(c.unit, LengthUnit::Mi);
    assert_eq!(c.canvas(), Canvas::square(800));
    assert_eq!(c.fps().unwrap().frame_delay_ms(), 250);
    assert_eq!(c.effective_chunk_size(), 16);

    let f = ColorKey::parse("#ff6319").unwrap();
    assert_eq!(c.color_to_name.lookup(&f).shape, LegendShape::Diamond);
    assert!(c.exports_anything());
}

#[test]
fn fractional_fps_is_accepted() {
    let c = Config::from_json_str(r#"{"save_folder": "x", "fps": 0.5}"#).unwrap();
    c.validate().unwrap();
    assert_eq!(c.fps, 0.5);
    let fps = c.fps().unwrap();
    assert_eq!(fps.frame_delay_ms_ratio(), (2000, 1));
    assert_eq!(fps.frame_delay_ms(), 2000);
}

#[test]
fn validation_rejects_bad_values() {
    assert!(Config::default().validate().is_err());
    assert!(Config { fps: 0.0, ..base() }.validate().is_err());
    assert!(Config { fps: -2.0, ..base() }.validate().is_err());
    assert!(
        Config {
            fps: f64::INFINITY,
            ..base()
        }
        .validate()
        .is_err()
    );
    assert!(Config { target_res: 0, ..base() }.validate().is_err());
    assert!(
        Config {
            target_res: MAX_TARGET_RES + 1,
            ..base()
        }
        .validate()
        .is_err()
    );
    assert!(Config { threads: 0, ..base() }.validate().is_err());
    assert!(Config { line_width: 0.0, ..base() }.validate().is_err());
    assert!(
        Config {
            line_width: f32::NAN,
            ..base()
        }
        .validate()
        .is_err()
    );
    assert!(
        Config {
            output_name: " ".into(),
            ..base()
        }
        .validate()
        .is_err()
    );
    assert!(
        Config {
            output_name: "a/b".into(),
            ..base()
        }
        .validate()
        .is_err()
    );

    let empty_names = Config::from_json_str(
        &json!({"save_folder": "s", "color_to_name": {"#ff0000": []}}).to_string(),
    )
    .unwrap();
    assert!(empty_names.validate().is_err());
}

#[test]
fn malformed_json_and_colors_are_serde_errors() {
    assert!(matches!(
        Config::from_json_str("{"),
        Err(LapseError::Serde(_))
    ));
    assert!(matches!(
        Config::from_json_str(r#"{"background_color": "dark"}"#),
        Err(LapseError::Serde(_))
    ));
    assert!(matches!(
        Config::from_json_str(r#"{"unit": "parsec"}"#),
        Err(LapseError::Serde(_))
    ));
}

#[test]
fn missing_config_file_is_reported() {
    let err = Config::from_json_file(Path::new("target/no/such/config.json")).unwrap_err();
    assert!(err.to_string().contains("read config"));
}
