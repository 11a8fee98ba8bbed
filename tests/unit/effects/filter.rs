use super::*;

#[test]
fn filter_string_puts_blur_before_preset() {
    let preset = "contrast(1.05) saturate(1.25) hue-rotate(-8deg)";
    assert_eq!(
        build_filter_string(preset, true, true, 6.0),
        "blur(6px) contrast(1.05) saturate(1.25) hue-rotate(-8deg)"
    );
    assert_eq!(build_filter_string(preset, true, false, 6.0), preset);
    assert_eq!(build_filter_string(preset, false, true, 6.0), preset);
}

#[test]
fn filter_string_none_cases() {
    assert_eq!(build_filter_string("none", false, true, 6.0), "none");
    assert_eq!(build_filter_string("none", true, false, 6.0), "none");
    assert_eq!(build_filter_string("", false, false, 6.0), "none");
    assert_eq!(build_filter_string("none", true, true, 6.0), "blur(6px)");
    assert_eq!(build_filter_string("none", true, true, 2.5), "blur(2.5px)");
}

#[test]
fn parses_presets_in_order() {
    let stages = parse_filter("blur(6px) grayscale(1) contrast(1.05)").unwrap();
    assert_eq!(stages.len(), 3);
    assert_eq!(stages[0], FilterStage::Blur { sigma: 6.0 });
    assert_eq!(stages[1], FilterStage::Matrix(color_matrix::grayscale(1.0)));
    assert_eq!(stages[2], FilterStage::Matrix(color_matrix::contrast(1.05)));
    assert!(parse_filter("none").unwrap().is_empty());
    assert!(parse_filter("  ").unwrap().is_empty());
}

#[test]
fn parses_percentages_and_angle_units() {
    assert_eq!(
        parse_filter("saturate(150%)").unwrap(),
        vec![FilterStage::Matrix(color_matrix::saturate(1.5))]
    );
    assert_eq!(
        parse_filter("hue-rotate(0.5turn)").unwrap(),
        vec![FilterStage::Matrix(color_matrix::hue_rotate(180.0))]
    );
    assert_eq!(
        parse_filter("brightness()").unwrap(),
        vec![FilterStage::Matrix(color_matrix::brightness(1.0))]
    );
}

#[test]
fn rejects_malformed_filters() {
    assert!(parse_filter("sharpen(2)").is_err());
    assert!(parse_filter("blur(6)").is_err());
    assert!(parse_filter("contrast(1.1").is_err());
    assert!(parse_filter("contrast(-1)").is_err());
    assert!(parse_filter("hue-rotate(12)").is_err());
    assert!(parse_filter("garbage").is_err());
}

#[test]
fn apply_runs_matrix_stages() {
    let stages = parse_filter("grayscale(1)").unwrap();
    let mut buf = vec![255, 0, 0, 255];
    apply_filter(&stages, &mut buf, 1, 1).unwrap();
    assert_eq!(buf, vec![54, 54, 54, 255]);
}
