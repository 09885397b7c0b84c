// Tests for control-input validation and the capability signal.

use ar_core::config::{parse_hex_color, ConfigError, Shape, ViewConfig};
use ar_core::constants::{DEFAULT_COLOR, DEFAULT_COLOR_HEX, SIZE_MAX, SIZE_MIN, SIZE_STEP};
use ar_core::state::{ArSupport, Camera};

#[test]
fn hex_color_six_digit() {
    let c = parse_hex_color("#00ff00").unwrap();
    assert_eq!(c, [0.0, 1.0, 0.0]);

    let c = parse_hex_color("#1f2937").unwrap();
    assert!((c[0] - 31.0 / 255.0).abs() < 1e-6);
    assert!((c[1] - 41.0 / 255.0).abs() < 1e-6);
    assert!((c[2] - 55.0 / 255.0).abs() < 1e-6);
}

#[test]
fn hex_color_shorthand() {
    // #0f0 expands to #00ff00
    assert_eq!(parse_hex_color("#0f0").unwrap(), [0.0, 1.0, 0.0]);
    assert_eq!(parse_hex_color("#fff").unwrap(), [1.0, 1.0, 1.0]);
}

#[test]
fn hex_color_rejects_malformed_input() {
    for bad in ["00ff00", "#12345", "#gghhii", "", "#", "#ff"] {
        assert!(
            matches!(parse_hex_color(bad), Err(ConfigError::InvalidColor(_))),
            "expected InvalidColor for {:?}",
            bad
        );
    }
}

#[test]
fn shape_parses_known_names_only() {
    assert_eq!("box".parse::<Shape>().unwrap(), Shape::Box);
    assert_eq!("sphere".parse::<Shape>().unwrap(), Shape::Sphere);
    assert_eq!("cylinder".parse::<Shape>().unwrap(), Shape::Cylinder);
    assert!(matches!(
        "cone".parse::<Shape>(),
        Err(ConfigError::UnknownShape(_))
    ));
}

#[test]
fn from_inputs_clamps_size_to_slider_range() {
    let cfg = ViewConfig::from_inputs("#ff6b6b", 9.0, "box").unwrap();
    assert_eq!(cfg.size, SIZE_MAX);
    let cfg = ViewConfig::from_inputs("#ff6b6b", 0.1, "box").unwrap();
    assert_eq!(cfg.size, SIZE_MIN);
}

#[test]
fn from_inputs_rejects_nonpositive_sizes() {
    assert!(matches!(
        ViewConfig::from_inputs("#ff6b6b", 0.0, "box"),
        Err(ConfigError::InvalidSize(_))
    ));
    assert!(matches!(
        ViewConfig::from_inputs("#ff6b6b", -1.0, "box"),
        Err(ConfigError::InvalidSize(_))
    ));
    assert!(matches!(
        ViewConfig::from_inputs("#ff6b6b", f32::NAN, "box"),
        Err(ConfigError::InvalidSize(_))
    ));
}

#[test]
fn ui_constants_stay_consistent() {
    // The default hex swatch and the precomputed default color must agree;
    // the host page's picker and the config both start from them.
    let parsed = parse_hex_color(DEFAULT_COLOR_HEX).unwrap();
    for (a, b) in parsed.iter().zip(&DEFAULT_COLOR) {
        assert!((a - b).abs() < 1e-6);
    }
    // The slider range is a whole number of steps.
    let steps = (SIZE_MAX - SIZE_MIN) / SIZE_STEP;
    assert!((steps - steps.round()).abs() < 1e-4);
}

#[test]
fn viewer_camera_matches_scene_tuning() {
    let cam = Camera::for_viewer(16.0 / 9.0);
    assert!((cam.fovy_radians - 70.0f32.to_radians()).abs() < 1e-6);
    assert_eq!(cam.znear, 0.01);
    assert_eq!(cam.zfar, 20.0);

    let proj = cam.projection_matrix();
    assert!(proj.to_cols_array().iter().all(|v| v.is_finite()));
    // look_at with the default frame is a rigid transform.
    let view = cam.view_matrix();
    assert!((view.determinant() - 1.0).abs() < 1e-4);
}

#[test]
fn unsupported_capability_never_reports_supported() {
    let support = ArSupport::from_query(false);
    assert_eq!(support, ArSupport::Unsupported);
    assert!(!support.is_supported());
    // Unknown (query never resolved) also counts as not supported.
    assert!(!ArSupport::Unknown.is_supported());
    assert!(ArSupport::from_query(true).is_supported());
}
