//! Tests for the hex color codec.

use render_common::{Color, RenderError};

// ============================================================================
// Parsing
// ============================================================================

#[test]
fn test_parse_six_digit_is_opaque() {
    let color = Color::from_hex("#336699").unwrap();
    assert_eq!(color.to_rgba8(), [0x33, 0x66, 0x99, 0xff]);
    assert_eq!(color.alpha(), 1.0);
}

#[test]
fn test_parse_eight_digit_reads_alpha_last() {
    let color = Color::from_hex("#11223380").unwrap();
    assert_eq!(color.to_rgba8(), [0x11, 0x22, 0x33, 0x80]);
    assert!((color.alpha() - 128.0 / 255.0).abs() < 1e-12);
}

#[test]
fn test_parse_is_case_insensitive() {
    assert_eq!(Color::from_hex("#ABCDEF"), Color::from_hex("#abcdef"));
}

#[test]
fn test_parse_rejects_malformed_input() {
    for bad in [
        "", "#", "336699", "#33669", "#3366990", "#336699001", "#GGGGGG", "#12 456", "##123456",
        "#1234567g",
    ] {
        assert!(Color::from_hex(bad).is_none(), "expected {:?} to be rejected", bad);
    }
}

#[test]
fn test_from_str_reports_input() {
    let err = "#nothex".parse::<Color>().unwrap_err();
    assert!(matches!(err, RenderError::InvalidColor(ref s) if s == "#nothex"));
}

// ============================================================================
// Serialization
// ============================================================================

#[test]
fn test_six_digit_round_trip_is_lowercase() {
    for hex in ["#000000", "#FFFFFF", "#02111D", "#037BB5", "#FF00FF"] {
        let color = Color::from_hex(hex).unwrap();
        assert_eq!(color.to_hex(), hex.to_lowercase());
    }
}

#[test]
fn test_eight_digit_round_trip_keeps_channels() {
    for hex in ["#00000000", "#ff000080", "#12345678", "#abcdef01"] {
        let color = Color::from_hex(hex).unwrap();
        let again = Color::from_hex(&color.to_hex()).unwrap();
        let (r1, g1, b1, a1) = color.components();
        let (r2, g2, b2, a2) = again.components();
        for (x, y) in [(r1, r2), (g1, g2), (b1, b2), (a1, a2)] {
            assert!((x - y).abs() <= 1.0 / 255.0);
        }
    }
}

#[test]
fn test_opaque_alpha_is_omitted() {
    assert_eq!(Color::rgb(1.0, 0.0, 0.0).to_hex(), "#ff0000");
    assert_eq!(Color::new(1.0, 0.0, 0.0, 0.5).to_hex(), "#ff000080");
}

#[test]
fn test_serialize_rounds_to_nearest() {
    // 0.5 * 255 = 127.5 rounds up
    assert_eq!(Color::rgb(0.5, 0.5, 0.5).to_hex(), "#808080");
    assert_eq!(Color::rgb(0.001, 0.999, 0.0).to_hex(), "#00ff00");
}

#[test]
fn test_display_matches_to_hex() {
    let color = Color::from_hex("#02111d").unwrap();
    assert_eq!(format!("{}", color), "#02111d");
}

#[test]
fn test_serde_uses_hex_strings() {
    let color = Color::from_hex("#037bb5").unwrap();
    let json = serde_json::to_string(&color).unwrap();
    assert_eq!(json, "\"#037bb5\"");

    let back: Color = serde_json::from_str(&json).unwrap();
    assert_eq!(back, color);

    assert!(serde_json::from_str::<Color>("\"blue\"").is_err());
}

// ============================================================================
// Construction helpers
// ============================================================================

#[test]
fn test_tuple_conversions() {
    let opaque: Color = (0.0, 1.0, 0.0).into();
    assert_eq!(opaque, Color::GREEN);

    let translucent: Color = (1.0, 1.0, 1.0, 0.25).into();
    assert_eq!(translucent.alpha(), 0.25);
}

#[test]
fn test_lerp_endpoints_and_midpoint() {
    let black = Color::BLACK;
    let white = Color::WHITE;
    assert_eq!(black.lerp(&white, 0.0), black);
    assert_eq!(black.lerp(&white, 1.0), white);

    let mid = black.lerp(&white, 0.5);
    assert_eq!(mid.components(), (0.5, 0.5, 0.5, 1.0));
}

#[test]
fn test_lerp_blends_alpha() {
    let mid = Color::CLEAR.lerp(&Color::BLACK, 0.5);
    assert_eq!(mid.alpha(), 0.5);
}
