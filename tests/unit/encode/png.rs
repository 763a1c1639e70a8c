use super::*;
use crate::foundation::core::Fps;

fn out_path(name: &str) -> PathBuf {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("target")
        .join("unit_png");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    let _ = std::fs::remove_file(&path);
    path
}

fn solid(rgba: [u8; 4]) -> FrameRGBA {
    FrameRGBA {
        width: 4,
        height: 3,
        data: rgba.repeat(12),
        premultiplied: true,
    }
}

fn cfg() -> SinkConfig {
    SinkConfig {
        width: 4,
        height: 3,
        fps: Fps::new(1, 1).unwrap(),
    }
}

#[test]
fn writes_only_the_last_frame() {
    let path = out_path("last.png");
    let mut sink = LastFramePngSink::new(&path, Rgba8::opaque(0, 0, 0));
    sink.begin(cfg()).unwrap();
    sink.push_frame(FrameIndex(0), &solid([255, 0, 0, 255])).unwrap();
    sink.push_frame(FrameIndex(4), &solid([0, 200, 0, 255])).unwrap();
    assert!(!path.exists());
    sink.end().unwrap();

    let img = image::open(&path).unwrap();
    assert_eq!(img.color(), image::ColorType::Rgb8);
    let rgb = img.to_rgb8();
    assert_eq!(rgb.dimensions(), (4, 3));
    assert_eq!(rgb.get_pixel(2, 1).0, [0, 200, 0]);
}

#[test]
fn no_frames_means_no_file() {
    let path = out_path("empty.png");
    let mut sink = LastFramePngSink::new(&path, Rgba8::opaque(0, 0, 0));
    sink.begin(cfg()).unwrap();
    sink.end().unwrap();
    assert!(!path.exists());
}

#[test]
fn translucent_last_frame_is_flattened() {
    let path = out_path("flat.png");
    let mut sink = LastFramePngSink::new(&path, Rgba8::opaque(10, 20, 30));
    sink.begin(cfg()).unwrap();
    sink.push_frame(FrameIndex(0), &solid([0, 0, 0, 0])).unwrap();
    sink.end().unwrap();
    assert_eq!(
        image::open(&path).unwrap().to_rgb8().get_pixel(0, 0).0,
        [10, 20, 30]
    );
}
