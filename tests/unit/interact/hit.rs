use super::*;
use crate::foundation::core::{Color, Vec2};
use crate::scene::text::TextId;

fn item(seq: u32, text: &str, at: Point, rotation_deg: f64) -> TextItem {
    TextItem {
        id: TextId { stamp_ms: 0, seq },
        text: text.to_string(),
        position: at,
        style: TextStyle {
            color: Color::BLACK,
            size: 20.0,
            rotation_deg,
            font_family: "Arial".to_string(),
            weight: 800,
            italic: false,
            underline: false,
            strike: false,
        },
    }
}

// "abcdefghij" at size 20 with em 0.5 is 100 wide, 24 tall.
const TEN: &str = "abcdefghij";

#[test]
fn text_box_measures_and_falls_back() {
    let mut m = FixedAdvance::default();
    let b = text_box(&mut m, &item(0, TEN, Point::ZERO, 0.0));
    assert_eq!(b, TextBox { width: 100.0, height: 24.0 });

    let empty = text_box(&mut m, &item(0, "", Point::ZERO, 0.0));
    assert_eq!(empty.width, 16.0);
}

#[test]
fn hit_respects_padding_unrotated() {
    let mut m = FixedAdvance::default();
    let texts = vec![item(0, TEN, Point::new(500.0, 500.0), 0.0)];
    assert!(hit_test(&texts, Point::new(555.0, 500.0), &mut m, 10.0).is_some());
    assert!(hit_test(&texts, Point::new(561.0, 500.0), &mut m, 10.0).is_none());
    assert!(hit_test(&texts, Point::new(500.0, 521.0), &mut m, 10.0).is_some());
    assert!(hit_test(&texts, Point::new(500.0, 523.0), &mut m, 10.0).is_none());
}

#[test]
fn padded_box_edges_hit_on_all_four_sides() {
    let mut m = FixedAdvance::default();
    let texts = vec![item(0, TEN, Point::new(500.0, 500.0), 0.0)];
    for edge in [
        Point::new(440.0, 500.0),
        Point::new(560.0, 500.0),
        Point::new(500.0, 478.0),
        Point::new(500.0, 522.0),
        Point::new(560.0, 522.0),
    ] {
        assert!(
            hit_test(&texts, edge, &mut m, 10.0).is_some(),
            "edge point {edge:?} should hit"
        );
    }
}

#[test]
fn hit_is_rotation_correct() {
    let mut m = FixedAdvance::default();
    let anchor = Point::new(400.0, 400.0);
    for rot in [0.0f64, 45.0, 90.0, 180.0, 270.0] {
        let texts = vec![item(0, TEN, anchor, rot)];
        let (s, c) = rot.to_radians().sin_cos();
        // 55 units along the item's own x axis: inside (half width 50 + padding 10).
        let along = anchor + Vec2::new(55.0 * c, 55.0 * s);
        assert!(
            hit_test(&texts, along, &mut m, 10.0).is_some(),
            "rotation {rot}: point along text axis should hit"
        );
        // 55 units along the item's own y axis: outside (half height 12 + padding 10).
        let across = anchor + Vec2::new(-55.0 * s, 55.0 * c);
        assert!(
            hit_test(&texts, across, &mut m, 10.0).is_none(),
            "rotation {rot}: point across text axis should miss"
        );
    }
}

#[test]
fn later_items_win_overlaps() {
    let mut m = FixedAdvance::default();
    let at = Point::new(300.0, 300.0);
    let texts = vec![item(0, TEN, at, 0.0), item(1, TEN, at, 0.0)];
    assert_eq!(hit_test(&texts, at, &mut m, 10.0), Some(texts[1].id));
}

#[test]
fn miss_returns_none() {
    let mut m = FixedAdvance::default();
    let texts = vec![item(0, TEN, Point::new(100.0, 100.0), 0.0)];
    assert_eq!(hit_test(&texts, Point::new(900.0, 900.0), &mut m, 10.0), None);
}
