//! Drag Overlay
//!
//! A detached, lifted copy of the module being dragged. It is drawn with the
//! document's own renderer and never receives pointer events, so it cannot
//! become a drop target itself.

use std::time::{Duration, Instant};

use serde::Serialize;

use crate::config::EditorConfig;
use crate::drag::Point;
use crate::modules::{Module, ModuleId};
use crate::render::ModuleRenderer;

pub const OVERLAY_SHADOW: &str = "0 12px 32px rgba(0, 0, 0, 0.25)";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OverlayPhase {
    Lifted,
    /// Settling back into the document after a drop.
    Dropping { started: Instant, from: Point, to: Point },
}

/// Everything a view needs to draw the overlay for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayFrame<O> {
    pub module_id: ModuleId,
    pub content: O,
    pub position: Point,
    pub width: u32,
    pub scale: f32,
    pub opacity: f32,
    pub shadow: &'static str,
    pub pointer_events: bool,
}

#[derive(Debug, Clone)]
struct Lifted {
    module: Module,
    position: Point,
    phase: OverlayPhase,
}

#[derive(Debug, Clone)]
pub struct DragOverlay {
    width: u32,
    scale: f32,
    drop_duration: Duration,
    lifted: Option<Lifted>,
}

impl Default for DragOverlay {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}

impl DragOverlay {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            width: config.content_width,
            scale: config.overlay_scale,
            drop_duration: config.drop_animation(),
            lifted: None,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.lifted.is_some()
    }

    pub fn module_id(&self) -> Option<&str> {
        self.lifted.as_ref().map(|l| l.module.id.as_str())
    }

    pub fn phase(&self) -> Option<OverlayPhase> {
        self.lifted.as_ref().map(|l| l.phase)
    }

    pub fn lift(&mut self, module: Module, position: Point) {
        self.lifted = Some(Lifted {
            module,
            position,
            phase: OverlayPhase::Lifted,
        });
    }

    pub fn follow(&mut self, position: Point) {
        if let Some(lifted) = self.lifted.as_mut() {
            if lifted.phase == OverlayPhase::Lifted {
                lifted.position = position;
            }
        }
    }

    /// Start the settle animation toward `to`, the module's slot in the document.
    pub fn settle(&mut self, to: Point, now: Instant) {
        if let Some(lifted) = self.lifted.as_mut() {
            lifted.phase = OverlayPhase::Dropping {
                started: now,
                from: lifted.position,
                to,
            };
        }
    }

    /// Hide immediately, as on cancel.
    pub fn hide(&mut self) {
        self.lifted = None;
    }

    /// Retire the overlay once its settle animation has run.
    pub fn tick(&mut self, now: Instant) {
        if let Some(Lifted {
            phase: OverlayPhase::Dropping { started, .. },
            ..
        }) = self.lifted
        {
            if now.saturating_duration_since(started) >= self.drop_duration {
                self.lifted = None;
            }
        }
    }

    pub fn render<R: ModuleRenderer>(&self, renderer: &R, now: Instant) -> Option<OverlayFrame<R::Output>> {
        let lifted = self.lifted.as_ref()?;
        let content = renderer.render(&lifted.module)?;
        let (position, scale, opacity) = match lifted.phase {
            OverlayPhase::Lifted => (lifted.position, self.scale, 1.0),
            OverlayPhase::Dropping { started, from, to } => {
                let t = self.progress(started, now);
                (
                    Point::new(lerp(from.x, to.x, t), lerp(from.y, to.y, t)),
                    lerp(self.scale, 1.0, t),
                    lerp(1.0, 0.0, t),
                )
            }
        };
        Some(OverlayFrame {
            module_id: lifted.module.id.clone(),
            content,
            position,
            width: self.width,
            scale,
            opacity,
            shadow: OVERLAY_SHADOW,
            pointer_events: false,
        })
    }

    fn progress(&self, started: Instant, now: Instant) -> f32 {
        if self.drop_duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(started).as_secs_f32();
        (elapsed / self.drop_duration.as_secs_f32()).clamp(0.0, 1.0)
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::ModuleKind;
    use crate::render::MarkupRenderer;

    fn quote() -> Module {
        Module::with_content("q", ModuleKind::Quote.default_content())
    }

    #[test]
    fn test_hidden_until_lifted() {
        let overlay = DragOverlay::default();
        assert!(overlay.render(&MarkupRenderer, Instant::now()).is_none());
    }

    #[test]
    fn test_lifted_frame_matches_in_place_render() {
        let mut overlay = DragOverlay::default();
        overlay.lift(quote(), Point::new(10.0, 20.0));
        overlay.follow(Point::new(15.0, 40.0));
        let frame = overlay.render(&MarkupRenderer, Instant::now()).unwrap();
        assert_eq!(Some(frame.content), MarkupRenderer.render(&quote()));
        assert_eq!(frame.position, Point::new(15.0, 40.0));
        assert_eq!(frame.width, 600);
        assert!(frame.scale > 1.0);
        assert!(!frame.pointer_events);
    }

    #[test]
    fn test_settle_animates_then_retires() {
        let mut overlay = DragOverlay::default();
        overlay.lift(quote(), Point::new(0.0, 100.0));
        let start = Instant::now();
        overlay.settle(Point::new(0.0, 0.0), start);

        let mid = overlay
            .render(&MarkupRenderer, start + Duration::from_millis(100))
            .unwrap();
        assert!((mid.position.y - 50.0).abs() < 0.5);
        assert!(mid.opacity < 1.0);

        overlay.tick(start + Duration::from_millis(199));
        assert!(overlay.is_visible());
        overlay.tick(start + Duration::from_millis(200));
        assert!(!overlay.is_visible());
    }

    #[test]
    fn test_follow_ignored_while_settling() {
        let mut overlay = DragOverlay::default();
        overlay.lift(quote(), Point::new(0.0, 0.0));
        let start = Instant::now();
        overlay.settle(Point::new(0.0, 0.0), start);
        overlay.follow(Point::new(500.0, 500.0));
        let frame = overlay.render(&MarkupRenderer, start).unwrap();
        assert_eq!(frame.position, Point::new(0.0, 0.0));
    }
}
