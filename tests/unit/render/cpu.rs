use super::*;
use crate::scene::photo::PhotoMask;

fn catalog(mask: PhotoMask) -> Catalog {
    let mut c = Catalog::builtin();
    c.canvas.size = 64;
    c.canvas.photo_mask = mask;
    c
}

fn solid(w: u32, h: u32, px: [u8; 4]) -> PreparedImage {
    PreparedImage {
        width: w,
        height: h,
        rgba8_premul: Arc::new(px.repeat((w * h) as usize)),
    }
}

fn scene_with_photo(c: &Catalog, photo: PreparedImage) -> Scene {
    let mut scene = Scene::new(c.text_defaults.clone());
    let t = scene.begin_photo_load();
    assert!(scene.finish_photo_load(t, Ok(photo)).is_applied());
    scene
}

fn render(scene: &Scene, c: &Catalog, mode: RenderMode) -> FrameRGBA {
    CpuRenderer::new()
        .render(scene, c, &mut TextEngine::new(), mode)
        .unwrap()
}

fn close(a: [u8; 4], b: [u8; 4], tol: i16) -> bool {
    a.iter()
        .zip(b.iter())
        .all(|(x, y)| (i16::from(*x) - i16::from(*y)).abs() <= tol)
}

#[test]
fn placeholder_fills_canvas_without_photo() {
    let c = catalog(PhotoMask::Circle { radius: 20.0 });
    let scene = Scene::new(c.text_defaults.clone());
    let frame = render(&scene, &c, RenderMode::Export);
    assert_eq!((frame.width, frame.height), (64, 64));
    assert!(frame.premultiplied);
    assert!(frame.data.chunks_exact(4).all(|p| p == [255, 255, 255, 255]));
}

#[test]
fn full_canvas_photo_covers_every_pixel() {
    let c = catalog(PhotoMask::FullCanvas);
    let mut scene = scene_with_photo(&c, solid(128, 96, [255, 0, 0, 255]));
    scene.photo_transform.rotation_deg = 30.0;
    scene.photo_transform.offset = Vec2::new(7.0, -5.0);
    let frame = render(&scene, &c, RenderMode::Export);
    for (x, y) in [(0, 0), (63, 0), (0, 63), (63, 63), (32, 32)] {
        let px = frame.pixel(x, y).unwrap();
        assert!(close(px, [255, 0, 0, 255], 3), "pixel ({x},{y}) = {px:?}");
    }
}

#[test]
fn circle_mask_clips_photo() {
    let c = catalog(PhotoMask::Circle { radius: 20.0 });
    let scene = scene_with_photo(&c, solid(64, 64, [255, 0, 0, 255]));
    let frame = render(&scene, &c, RenderMode::Export);
    assert!(close(frame.pixel(32, 32).unwrap(), [255, 0, 0, 255], 2));
    assert_eq!(frame.pixel(0, 0).unwrap()[3], 0);
    assert_eq!(frame.pixel(32, 2).unwrap()[3], 0);
}

#[test]
fn frame_draws_over_photo_only_when_ready() {
    let c = catalog(PhotoMask::FullCanvas);
    let mut scene = scene_with_photo(&c, solid(64, 64, [255, 0, 0, 255]));
    let mut bytes = [0u8, 0, 255, 255].repeat(8);
    bytes.extend([0u8, 0, 0, 0].repeat(8));
    let frame_img = PreparedImage {
        width: 4,
        height: 4,
        rgba8_premul: Arc::new(bytes),
    };

    let t = scene.begin_frame_load("frame1");
    let loading = render(&scene, &c, RenderMode::Export);
    assert!(close(loading.pixel(32, 8).unwrap(), [255, 0, 0, 255], 2));

    assert!(scene.finish_frame_load(t, Ok(frame_img)).is_applied());
    let out = render(&scene, &c, RenderMode::Export);
    assert!(close(out.pixel(32, 8).unwrap(), [0, 0, 255, 255], 2));
    assert!(close(out.pixel(32, 56).unwrap(), [255, 0, 0, 255], 2));
}

#[test]
fn mono_preset_desaturates_photo() {
    let c = catalog(PhotoMask::FullCanvas);
    let mut scene = scene_with_photo(&c, solid(64, 64, [255, 0, 0, 255]));
    scene.filter_id = "mono".to_string();
    let px = render(&scene, &c, RenderMode::Export).pixel(32, 32).unwrap();
    assert_eq!(px[0], px[1]);
    assert_eq!(px[1], px[2]);
    assert!(px[0] < 100);
}

#[test]
fn selection_outline_only_in_interactive_mode() {
    let c = catalog(PhotoMask::FullCanvas);
    let mut scene = scene_with_photo(&c, solid(64, 64, [0, 0, 0, 255]));
    scene.add_text("x", Point::new(32.0, 32.0));
    let export = render(&scene, &c, RenderMode::Export);
    let interactive = render(&scene, &c, RenderMode::Interactive);
    assert!(export.data.chunks_exact(4).all(|p| p == [0, 0, 0, 255]));
    assert_ne!(export.data, interactive.data);

    scene.select_text(None);
    let unselected = render(&scene, &c, RenderMode::Interactive);
    assert_eq!(export.data, unselected.data);
}

#[test]
fn underline_uses_fallback_box_without_fonts() {
    let c = catalog(PhotoMask::FullCanvas);
    let mut scene = scene_with_photo(&c, solid(64, 64, [0, 0, 0, 255]));
    scene.add_text("x", Point::new(32.0, 32.0));
    assert!(scene.edit_text(&crate::scene::TextEdit::Size(10.0)));
    assert!(scene.edit_text(&crate::scene::TextEdit::Underline(true)));
    assert!(scene.edit_text(&crate::scene::TextEdit::Color(Color::rgb(255, 0, 0))));
    // Box is 8 x 12; the underline sits at y = 6 + 2 below the anchor.
    let frame = render(&scene, &c, RenderMode::Export);
    assert!(close(frame.pixel(32, 40).unwrap(), [255, 0, 0, 255], 8));
    assert!(close(frame.pixel(32, 20).unwrap(), [0, 0, 0, 255], 0));
}

#[test]
fn text_under_frame_is_covered_by_frame() {
    let c = catalog(PhotoMask::FullCanvas);
    let mut scene = scene_with_photo(&c, solid(64, 64, [0, 0, 0, 255]));
    scene.add_text("x", Point::new(32.0, 32.0));
    scene.edit_text(&crate::scene::TextEdit::Size(10.0));
    scene.edit_text(&crate::scene::TextEdit::Strike(true));
    scene.edit_text(&crate::scene::TextEdit::Color(Color::rgb(255, 0, 0)));
    let t = scene.begin_frame_load("frame1");
    let _ = scene.finish_frame_load(t, Ok(solid(2, 2, [0, 255, 0, 255])));

    let over = render(&scene, &c, RenderMode::Export);
    assert!(close(over.pixel(32, 32).unwrap(), [255, 0, 0, 255], 8));

    scene.text_over_frame = false;
    let under = render(&scene, &c, RenderMode::Export);
    assert!(close(under.pixel(32, 32).unwrap(), [0, 255, 0, 255], 0));
}

fn half_frame(px: [u8; 4]) -> PreparedImage {
    let mut bytes = px.repeat(8);
    bytes.extend([0u8, 0, 0, 0].repeat(8));
    PreparedImage {
        width: 4,
        height: 4,
        rgba8_premul: Arc::new(bytes),
    }
}

#[test]
fn replaced_images_never_render_stale_paint() {
    let c = catalog(PhotoMask::FullCanvas);
    let mut scene = Scene::new(c.text_defaults.clone());
    let mut renderer = CpuRenderer::new();
    let mut engine = TextEngine::new();
    let colors = [
        [255, 0, 0, 255],
        [0, 255, 0, 255],
        [0, 0, 255, 255],
        [255, 255, 0, 255],
        [0, 255, 255, 255],
    ];

    for round in 0..4 {
        for (i, &color) in colors.iter().enumerate() {
            let t = scene.begin_photo_load();
            assert!(scene.finish_photo_load(t, Ok(solid(16, 16, color))).is_applied());
            let frame_color = colors[(i + 2) % colors.len()];
            let t = scene.begin_frame_load("frame1");
            assert!(scene.finish_frame_load(t, Ok(half_frame(frame_color))).is_applied());

            // Skip renders so earlier buffers are dropped between cache lookups.
            if (i + round) % 2 == 1 {
                continue;
            }
            let out = renderer
                .render(&scene, &c, &mut engine, RenderMode::Export)
                .unwrap();
            let photo_px = out.pixel(32, 56).unwrap();
            let frame_px = out.pixel(32, 8).unwrap();
            assert!(close(photo_px, color, 2), "round {round} photo {i}: {photo_px:?}");
            assert!(close(frame_px, frame_color, 2), "round {round} frame {i}: {frame_px:?}");
        }
    }
}

fn dark_pixels(frame: &FrameRGBA, x: std::ops::Range<u32>, y: std::ops::Range<u32>) -> usize {
    y.flat_map(|y| x.clone().map(move |x| (x, y)))
        .filter(|&(x, y)| frame.pixel(x, y).is_some_and(|p| p[0] < 128 && p[3] == 255))
        .count()
}

#[test]
fn bundled_font_draws_glyphs_around_anchor() {
    let mut c = catalog(PhotoMask::FullCanvas);
    c.canvas.size = 128;
    let mut scene = scene_with_photo(&c, solid(8, 8, [255, 255, 255, 255]));
    scene.add_text("Hi", Point::new(80.0, 40.0));
    assert!(scene.edit_text(&crate::scene::TextEdit::Size(24.0)));

    let mut engine = TextEngine::with_bundled_font().unwrap();
    let frame = CpuRenderer::new()
        .render(&scene, &c, &mut engine, RenderMode::Export)
        .unwrap();

    assert!(dark_pixels(&frame, 56..104, 24..56) > 20);
    assert_eq!(dark_pixels(&frame, 0..40, 0..128), 0);
    assert_eq!(dark_pixels(&frame, 0..128, 72..128), 0);
}
