pub mod menu;

use ratatui::style::Color;
use ratatui::widgets::canvas::{Canvas, Painter, Shape as CanvasShape};
use ratatui::widgets::canvas::Context;
use ratatui::Frame;

use crate::app::App;
use crate::config::Rgba;
use crate::render::{DrawOp, Scene, Shape};

/// Sampling step over the canvas-dot grid. Braille dots are the finest
/// resolution available, so half-dot steps avoid holes in filled shapes.
const SAMPLE_STEP: f64 = 0.5;

/// Draw the whole frame: the widget canvas, then the menu overlay.
pub fn draw(f: &mut Frame, app: &App) {
    let area = f.area();
    let widget_area = app.widget_rect(area);
    let size = app.config.size as f64;
    let scene = app.scene();

    let canvas = Canvas::default()
        .x_bounds([0.0, size])
        .y_bounds([0.0, size])
        .paint(|ctx: &mut Context| {
            ctx.draw(&SceneShape {
                scene: &scene,
                size,
            });
        });
    f.render_widget(canvas, widget_area);

    if app.menu.open {
        menu::draw(f, app);
    }
}

/// Adapts a projected [`Scene`] to ratatui's canvas shape protocol.
struct SceneShape<'a> {
    scene: &'a Scene,
    size: f64,
}

impl CanvasShape for SceneShape<'_> {
    fn draw(&self, painter: &mut Painter) {
        for op in &self.scene.ops {
            rasterize(op, self.size, painter);
        }
    }
}

/// Scan the widget square and paint every dot whose inverse-transformed
/// position falls inside the op's shape. Points pushed outside the
/// bounds by a large scale simply clip, matching the fixed window of
/// the overlay.
fn rasterize(op: &DrawOp, size: f64, painter: &mut Painter) {
    let color = composite(op.color, op.opacity);
    let (sin_r, cos_r) = op.rotation_deg.to_radians().sin_cos();
    let scale = op.scale.max(0.01);
    let half = size / 2.0;

    let mut y = -half;
    while y <= half {
        let mut x = -half;
        while x <= half {
            // Undo rotation then scale to test against the unit shape
            let ux = (x * cos_r + y * sin_r) / scale;
            let uy = (-x * sin_r + y * cos_r) / scale;
            if contains(op.shape, ux, uy) {
                if let Some((px, py)) = painter.get_point(x + half, y + half) {
                    painter.paint(px, py, color);
                }
            }
            x += SAMPLE_STEP;
        }
        y += SAMPLE_STEP;
    }
}

/// Point-in-shape test in the widget's own coordinates (y up, origin at
/// center, 12 o'clock along +y).
fn contains(shape: Shape, x: f64, y: f64) -> bool {
    match shape {
        Shape::Disc { radius } => x * x + y * y <= radius * radius,
        Shape::Ellipse { rx, ry } => {
            let nx = x / rx;
            let ny = y / ry;
            nx * nx + ny * ny <= 1.0
        }
        Shape::Pie { radius, sweep_deg } => {
            if x * x + y * y > radius * radius {
                return false;
            }
            if sweep_deg >= 360.0 {
                return true;
            }
            if sweep_deg <= 0.0 {
                return false;
            }
            // Clockwise angular distance from 12 o'clock
            let angle = y.atan2(x).to_degrees();
            (90.0 - angle).rem_euclid(360.0) <= sweep_deg
        }
    }
}

/// Terminal cells have no alpha channel; fold the op opacity and the
/// color's own alpha into the RGB channels instead.
fn composite(color: Rgba, opacity: f64) -> Color {
    let level = opacity.clamp(0.0, 1.0) * (color.a as f64 / 255.0);
    Color::Rgb(
        (color.r as f64 * level).round() as u8,
        (color.g as f64 * level).round() as u8,
        (color.b as f64 * level).round() as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disc_membership() {
        let disc = Shape::Disc { radius: 10.0 };
        assert!(contains(disc, 0.0, 0.0));
        assert!(contains(disc, 7.0, 7.0));
        assert!(!contains(disc, 8.0, 8.0));
    }

    #[test]
    fn pie_sweeps_clockwise_from_noon() {
        let quarter = Shape::Pie {
            radius: 10.0,
            sweep_deg: 90.0,
        };
        // Clockwise from 12 o'clock covers the +x/+y quadrant
        assert!(contains(quarter, 0.1, 5.0));
        assert!(contains(quarter, 5.0, 0.1));
        assert!(!contains(quarter, -5.0, 5.0));
        assert!(!contains(quarter, 0.1, -5.0));

        let three_quarters = Shape::Pie {
            radius: 10.0,
            sweep_deg: 270.0,
        };
        assert!(contains(three_quarters, 5.0, -5.0));
        assert!(contains(three_quarters, -5.0, -5.0));
        assert!(!contains(three_quarters, -5.0, 5.0));
    }

    #[test]
    fn pie_extremes() {
        let full = Shape::Pie {
            radius: 10.0,
            sweep_deg: 360.0,
        };
        let empty = Shape::Pie {
            radius: 10.0,
            sweep_deg: 0.0,
        };
        for (x, y) in [(0.0, 5.0), (5.0, 0.0), (-3.0, -3.0)] {
            assert!(contains(full, x, y));
            assert!(!contains(empty, x, y));
        }
    }

    #[test]
    fn ellipse_respects_both_axes() {
        let wide = Shape::Ellipse { rx: 10.0, ry: 5.0 };
        assert!(contains(wide, 9.0, 0.0));
        assert!(!contains(wide, 0.0, 9.0));
    }

    #[test]
    fn composite_folds_opacity_and_alpha() {
        let opaque = Rgba::rgb(200, 100, 50);
        assert_eq!(composite(opaque, 1.0), Color::Rgb(200, 100, 50));
        assert_eq!(composite(opaque, 0.5), Color::Rgb(100, 50, 25));

        let translucent = Rgba {
            r: 200,
            g: 100,
            b: 50,
            a: 127,
        };
        let Color::Rgb(r, ..) = composite(translucent, 1.0) else {
            panic!("expected rgb color");
        };
        assert!((99..=100).contains(&r));
    }
}
