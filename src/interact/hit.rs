use crate::foundation::core::{Point, Rect};
use crate::foundation::math::rotate_vec;
use crate::scene::text::{TextId, TextItem, TextStyle};

/// Horizontal text measurement, in canvas units.
pub trait TextMeasure {
    fn text_width(&mut self, text: &str, style: &TextStyle) -> f64;
}

/// Every character advances by `em * size`. Stands in for real shaping where fonts don't matter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedAdvance {
    pub em: f64,
}

impl Default for FixedAdvance {
    fn default() -> Self {
        Self { em: 0.5 }
    }
}

impl TextMeasure for FixedAdvance {
    fn text_width(&mut self, text: &str, style: &TextStyle) -> f64 {
        text.chars().count() as f64 * style.size * self.em
    }
}

/// Unrotated box of a text item, centered on its anchor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextBox {
    pub width: f64,
    pub height: f64,
}

impl TextBox {
    pub fn local_rect(&self, padding: f64) -> Rect {
        Rect::new(
            -self.width / 2.0 - padding,
            -self.height / 2.0 - padding,
            self.width / 2.0 + padding,
            self.height / 2.0 + padding,
        )
    }
}

/// Measured width (or `0.8 * size` when measurement yields nothing) by `1.2 * size`.
pub fn text_box<M: TextMeasure + ?Sized>(measure: &mut M, item: &TextItem) -> TextBox {
    let measured = measure.text_width(&item.text, &item.style);
    let width = if measured.is_finite() && measured > 0.0 {
        measured
    } else {
        item.style.size * 0.8
    };
    TextBox {
        width,
        height: item.style.size * 1.2,
    }
}

/// Topmost text item under `point`. Later items sit above earlier ones.
pub fn hit_test<M: TextMeasure + ?Sized>(
    texts: &[TextItem],
    point: Point,
    measure: &mut M,
    padding: f64,
) -> Option<TextId> {
    texts.iter().rev().find_map(|item| {
        let local = rotate_vec(
            point - item.position,
            -item.style.rotation_deg.to_radians(),
        );
        let rect = text_box(measure, item).local_rect(padding);
        contains_inclusive(rect, Point::new(local.x, local.y)).then_some(item.id)
    })
}

/// Closed-interval containment; `Rect::contains` excludes the right and bottom edges.
fn contains_inclusive(rect: Rect, p: Point) -> bool {
    p.x >= rect.x0 && p.x <= rect.x1 && p.y >= rect.y0 && p.y <= rect.y1
}

#[cfg(test)]
#[path = "../../tests/unit/interact/hit.rs"]
mod tests;
