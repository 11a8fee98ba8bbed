use std::sync::Arc;

use super::*;
use crate::assets::PreparedImage;
use crate::foundation::core::Color;
use crate::interact::hit::FixedAdvance;
use crate::scene::text::TextStyle;

fn scene() -> Scene {
    Scene::new(TextStyle {
        color: Color::BLACK,
        size: 20.0,
        rotation_deg: 0.0,
        font_family: "Arial".to_string(),
        weight: 800,
        italic: false,
        underline: false,
        strike: false,
    })
}

fn with_photo(mut scene: Scene) -> Scene {
    let t = scene.begin_photo_load();
    let img = PreparedImage {
        width: 2,
        height: 2,
        rgba8_premul: Arc::new(vec![255; 16]),
    };
    assert!(scene.finish_photo_load(t, Ok(img)).is_applied());
    scene
}

#[test]
fn screen_mapping_scales_into_canvas_units() {
    let canvas = Canvas::new(1080).unwrap();
    let rect = ScreenRect {
        left: 10.0,
        top: 20.0,
        width: 540.0,
        height: 540.0,
    };
    let p = screen_to_canvas(&rect, Point::new(280.0, 290.0), canvas);
    assert_eq!(p, Point::new(540.0, 540.0));
    let id = screen_to_canvas(&ScreenRect::identity(canvas), Point::new(3.0, 4.0), canvas);
    assert_eq!(id, Point::new(3.0, 4.0));
}

#[test]
fn text_drag_moves_by_pointer_delta() {
    let mut s = scene();
    let id = s.add_text("Hello", Point::new(540.0, 540.0));
    s.select_text(None);
    let mut m = FixedAdvance::default();

    let target = pointer_down(&mut s, Point::new(545.0, 542.0), &mut m, 10.0);
    assert_eq!(target, Some(DragTarget::Text(id)));
    assert_eq!(s.active_text_id(), Some(id));

    assert!(pointer_move(&mut s, Point::new(595.0, 522.0)));
    assert_eq!(s.text(id).unwrap().position, Point::new(590.0, 520.0));

    assert!(pointer_up(&mut s));
    assert_eq!(*s.drag(), DragState::Idle);
    assert!(!pointer_move(&mut s, Point::new(0.0, 0.0)));
}

#[test]
fn photo_drag_clears_selection_and_moves_offset() {
    let mut s = with_photo(scene());
    s.add_text("Hello", Point::new(540.0, 540.0));
    let mut m = FixedAdvance::default();

    let target = pointer_down(&mut s, Point::new(100.0, 100.0), &mut m, 10.0);
    assert_eq!(target, Some(DragTarget::Photo));
    assert_eq!(s.active_text_id(), None);

    pointer_move(&mut s, Point::new(130.0, 60.0));
    assert_eq!(s.photo_transform.offset, Vec2::new(30.0, -40.0));
    pointer_move(&mut s, Point::new(90.0, 100.0));
    assert_eq!(s.photo_transform.offset, Vec2::new(-10.0, 0.0));
}

#[test]
fn pointer_down_without_photo_or_text_stays_idle() {
    let mut s = scene();
    let mut m = FixedAdvance::default();
    assert_eq!(pointer_down(&mut s, Point::new(10.0, 10.0), &mut m, 10.0), None);
    assert!(!s.drag().is_dragging());
    assert!(!pointer_up(&mut s));
}

#[test]
fn deleting_dragged_text_ends_drag() {
    let mut s = scene();
    s.add_text("Hello", Point::new(540.0, 540.0));
    let mut m = FixedAdvance::default();
    pointer_down(&mut s, Point::new(540.0, 540.0), &mut m, 10.0);
    assert!(s.delete_active_text().is_some());
    assert_eq!(*s.drag(), DragState::Idle);
}
