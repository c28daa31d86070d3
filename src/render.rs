use crate::animation::{lerp, AnimParams};
use crate::config::{Palette, Rgba};
use crate::timer::Phase;

/// Margin between the widget bounds and the circle, in canvas dots.
const MARGIN: f64 = 5.0;

/// Everything the projector needs to build a frame.
#[derive(Debug, Clone, Copy)]
pub struct WidgetView {
    pub phase: Phase,
    /// Timed-phase progress, 1.0 → 0.0
    pub progress: f64,
    /// Celebration progress, 0.0 → 1.0; only read in Completing
    pub completion_progress: f64,
    pub params: AnimParams,
    pub palette: Palette,
    /// Widget diameter in canvas dots
    pub size: f64,
}

/// Shapes are centered on the widget origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Disc {
        radius: f64,
    },
    /// Filled slice from 12 o'clock sweeping clockwise by `sweep_deg`.
    Pie {
        radius: f64,
        sweep_deg: f64,
    },
    Ellipse {
        rx: f64,
        ry: f64,
    },
}

/// One drawing instruction: a shape plus the transform the backend must
/// apply, pivoted at the widget center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawOp {
    pub shape: Shape,
    pub color: Rgba,
    pub opacity: f64,
    pub scale: f64,
    pub rotation_deg: f64,
}

#[derive(Debug, Default, PartialEq)]
pub struct Scene {
    pub ops: Vec<DrawOp>,
}

/// Map the current phase, progress and animation parameters into a
/// concrete instruction set. Pure; the backend decides how to rasterize.
pub fn project(view: &WidgetView) -> Scene {
    let radius = (view.size / 2.0 - MARGIN).max(1.0);
    let op = |shape, color| DrawOp {
        shape,
        color,
        opacity: view.params.opacity,
        scale: view.params.scale,
        rotation_deg: view.params.rotation_deg,
    };

    let mut ops = Vec::with_capacity(2);
    match view.phase {
        Phase::Waiting => {
            ops.push(op(Shape::Disc { radius }, view.palette.waiting));
        }
        Phase::Working | Phase::Resting => {
            let fill = if view.phase == Phase::Working {
                view.palette.working
            } else {
                view.palette.resting
            };
            ops.push(op(Shape::Disc { radius }, view.palette.background));
            ops.push(op(
                Shape::Pie {
                    radius,
                    sweep_deg: 360.0 * view.progress.clamp(0.0, 1.0),
                },
                fill,
            ));
        }
        Phase::Completing => {
            let color = lerp_rgb(
                view.palette.working,
                view.palette.resting,
                view.completion_progress,
            );
            // Morph shifts up to 30% of the diameter between the axes,
            // keeping the shape centered
            let offset = radius * 2.0 * 0.3 * view.params.morph;
            ops.push(op(
                Shape::Ellipse {
                    rx: (radius + offset / 2.0).max(0.5),
                    ry: (radius - offset / 2.0).max(0.5),
                },
                color,
            ));
        }
    }
    Scene { ops }
}

/// Linear RGB interpolation between two colors. The result is opaque;
/// alpha is composited separately via the op's opacity.
pub fn lerp_rgb(from: Rgba, to: Rgba, t: f64) -> Rgba {
    let channel = |a: u8, b: u8| lerp(a as f64, b as f64, t).round() as u8;
    Rgba {
        r: channel(from.r, to.r),
        g: channel(from.g, to.g),
        b: channel(from.b, to.b),
        a: 255,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn view(phase: Phase) -> WidgetView {
        WidgetView {
            phase,
            progress: 1.0,
            completion_progress: 0.0,
            params: AnimParams::IDENTITY,
            palette: Config::default().palette(),
            size: 60.0,
        }
    }

    #[test]
    fn waiting_is_a_single_disc() {
        let scene = project(&view(Phase::Waiting));
        assert_eq!(scene.ops.len(), 1);
        let op = &scene.ops[0];
        assert!(matches!(op.shape, Shape::Disc { radius } if radius == 25.0));
        assert_eq!(op.color, view(Phase::Waiting).palette.waiting);
    }

    #[test]
    fn working_draws_background_then_pie() {
        let mut v = view(Phase::Working);
        v.progress = 0.25;
        let scene = project(&v);
        assert_eq!(scene.ops.len(), 2);
        assert!(matches!(scene.ops[0].shape, Shape::Disc { .. }));
        assert_eq!(scene.ops[0].color, v.palette.background);
        match scene.ops[1].shape {
            Shape::Pie { sweep_deg, .. } => assert!((sweep_deg - 90.0).abs() < 1e-9),
            other => panic!("expected pie, got {other:?}"),
        }
        assert_eq!(scene.ops[1].color, v.palette.working);
    }

    #[test]
    fn resting_uses_resting_color() {
        let scene = project(&view(Phase::Resting));
        assert_eq!(scene.ops[1].color, view(Phase::Resting).palette.resting);
    }

    #[test]
    fn completing_color_interpolates_between_endpoints() {
        let palette = Config::default().palette();

        let mut v = view(Phase::Completing);
        v.completion_progress = 0.0;
        let start = project(&v);
        assert_eq!(
            start.ops[0].color,
            Rgba::rgb(palette.working.r, palette.working.g, palette.working.b)
        );

        v.completion_progress = 1.0;
        let end = project(&v);
        assert_eq!(
            end.ops[0].color,
            Rgba::rgb(palette.resting.r, palette.resting.g, palette.resting.b)
        );
    }

    #[test]
    fn morph_trades_one_axis_for_the_other() {
        let mut v = view(Phase::Completing);
        v.params.morph = 0.8;
        let scene = project(&v);
        match scene.ops[0].shape {
            Shape::Ellipse { rx, ry } => {
                assert!(rx > ry);
                // Axes trade off symmetrically around the base radius
                assert!((rx + ry - 50.0).abs() < 1e-9);
            }
            other => panic!("expected ellipse, got {other:?}"),
        }

        v.params.morph = -0.8;
        match project(&v).ops[0].shape {
            Shape::Ellipse { rx, ry } => assert!(ry > rx),
            other => panic!("expected ellipse, got {other:?}"),
        }
    }

    #[test]
    fn ops_carry_animation_params() {
        let mut v = view(Phase::Waiting);
        v.params = AnimParams {
            scale: 1.1,
            opacity: 0.7,
            rotation_deg: 45.0,
            morph: 0.0,
        };
        let op = &project(&v).ops[0];
        assert_eq!(op.scale, 1.1);
        assert_eq!(op.opacity, 0.7);
        assert_eq!(op.rotation_deg, 45.0);
    }

    #[test]
    fn lerp_rgb_midpoint() {
        let mid = lerp_rgb(Rgba::rgb(0, 0, 0), Rgba::rgb(255, 255, 255), 0.5);
        assert_eq!(mid, Rgba::rgb(128, 128, 128));
    }
}
