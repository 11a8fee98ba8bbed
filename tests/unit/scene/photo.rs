use super::*;

fn canvas() -> Canvas {
    Canvas::new(1080).unwrap()
}

/// Every sampled viewport point maps back inside the image.
fn assert_covers(mask: PhotoMask, w: u32, h: u32, t: &PhotoTransform) {
    let c = canvas();
    let inv = photo_affine(c, mask, w, h, t).inverse();
    let mut samples = Vec::new();
    match mask {
        PhotoMask::Circle { radius } => {
            for i in 0..360 {
                let a = f64::from(i).to_radians();
                samples.push(c.center() + Vec2::new(a.cos(), a.sin()) * radius);
            }
        }
        PhotoMask::FullCanvas => {
            let r = c.rect();
            samples.extend([
                Point::new(r.x0, r.y0),
                Point::new(r.x1, r.y0),
                Point::new(r.x1, r.y1),
                Point::new(r.x0, r.y1),
            ]);
        }
    }
    let eps = 1e-6;
    for p in samples {
        let q = inv * p;
        assert!(
            q.x >= -eps && q.x <= f64::from(w) + eps && q.y >= -eps && q.y <= f64::from(h) + eps,
            "viewport point {p:?} maps outside image at {q:?} for {t:?}"
        );
    }
}

#[test]
fn base_scale_fills_shorter_side() {
    assert_eq!(base_scale(canvas(), 2160, 1080), 1.0);
    assert_eq!(base_scale(canvas(), 540, 1080), 2.0);
    assert_eq!(base_scale(canvas(), 100, 200), 10.8);
}

#[test]
fn identity_transform_uses_base_scale() {
    let t = PhotoTransform::default();
    assert!(t.is_identity());
    let s = effective_scale(canvas(), PhotoMask::FullCanvas, 2000, 1000, &t);
    assert!((s - 1.08).abs() < 1e-12);
}

#[test]
fn user_zoom_multiplies_base() {
    let t = PhotoTransform {
        scale: 1.5,
        ..PhotoTransform::default()
    };
    let s = effective_scale(canvas(), PhotoMask::default(), 1080, 1080, &t);
    assert!((s - 1.5).abs() < 1e-12);
}

#[test]
fn zoom_below_cover_is_raised_to_floor() {
    let t = PhotoTransform {
        scale: 0.25,
        ..PhotoTransform::default()
    };
    let s = effective_scale(canvas(), PhotoMask::FullCanvas, 1080, 1080, &t);
    assert!((s - 1.0).abs() < 1e-12);
    assert_covers(PhotoMask::FullCanvas, 1080, 1080, &t);
}

#[test]
fn rotation_and_offset_never_uncover_the_viewport() {
    let masks = [PhotoMask::FullCanvas, PhotoMask::Circle { radius: 360.0 }];
    let dims = [(1080, 1080), (4000, 3000), (800, 1600)];
    for mask in masks {
        for (w, h) in dims {
            for rot in [-180.0, -90.0, -30.0, 0.0, 17.0, 45.0, 90.0, 135.0, 180.0] {
                for zoom in [1.0, 1.5, 3.0] {
                    for offset in [
                        Vec2::ZERO,
                        Vec2::new(300.0, -120.0),
                        Vec2::new(-900.0, 700.0),
                    ] {
                        let t = PhotoTransform {
                            scale: zoom,
                            rotation_deg: rot,
                            offset,
                        };
                        assert_covers(mask, w, h, &t);
                    }
                }
            }
        }
    }
}

#[test]
fn circle_floor_is_smaller_than_full_canvas_floor() {
    let t = PhotoTransform {
        scale: 1.0,
        rotation_deg: 45.0,
        offset: Vec2::ZERO,
    };
    let circle = cover_floor(canvas(), PhotoMask::Circle { radius: 360.0 }, 1080, 1080, &t);
    let full = cover_floor(canvas(), PhotoMask::FullCanvas, 1080, 1080, &t);
    assert!(circle < full);
    assert!((full - std::f64::consts::SQRT_2).abs() < 1e-9);
}

#[test]
fn affine_centers_the_image_on_offset_anchor() {
    let t = PhotoTransform {
        scale: 1.0,
        rotation_deg: 30.0,
        offset: Vec2::new(50.0, -20.0),
    };
    let a = photo_affine(canvas(), PhotoMask::default(), 2000, 1000, &t);
    let center = a * Point::new(1000.0, 500.0);
    assert!((center.x - 590.0).abs() < 1e-9);
    assert!((center.y - 520.0).abs() < 1e-9);
}
