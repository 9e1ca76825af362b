/// Horizontal travel, in pixels, after which a press becomes a drag.
pub const DRAG_THRESHOLD_PX: f64 = 4.0;

/// How a pointer press ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerRelease {
    /// Released without passing the drag threshold; activation may fire.
    Tap,
    /// The press panned the strip; activation is suppressed.
    Drag,
    /// No matching press was in progress.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct DragState {
    pointer_id: u64,
    start_x: f64,
    origin: f64,
    moved: bool,
}

/// Pan state for the strip of focusable samples. Panning never changes the
/// active sample.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScrollStrip {
    offset: f64,
    content_width: f64,
    viewport_width: f64,
    drag: Option<DragState>,
}

impl ScrollStrip {
    pub fn new(content_width: f64, viewport_width: f64) -> Self {
        let mut strip = Self::default();
        strip.resize(content_width, viewport_width);
        strip
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn max_offset(&self) -> f64 {
        (self.content_width - self.viewport_width).max(0.0)
    }

    pub fn is_scrollable(&self) -> bool {
        self.max_offset() > 0.0
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some_and(|drag| drag.moved)
    }

    /// Keeps the current offset where it still fits.
    pub fn resize(&mut self, content_width: f64, viewport_width: f64) {
        self.content_width = sanitize(content_width);
        self.viewport_width = sanitize(viewport_width);
        self.offset = self.clamp(self.offset);
    }

    pub fn scroll_to(&mut self, offset: f64) {
        self.offset = self.clamp(offset);
    }

    /// Only primary-button presses start a drag.
    pub fn pointer_down(&mut self, pointer_id: u64, x: f64, primary: bool) {
        if !primary {
            return;
        }
        self.drag = Some(DragState {
            pointer_id,
            start_x: x,
            origin: self.offset,
            moved: false,
        });
    }

    /// Returns true while the press is panning the strip.
    pub fn pointer_move(&mut self, pointer_id: u64, x: f64) -> bool {
        let Some(mut drag) = self.drag.filter(|drag| drag.pointer_id == pointer_id) else {
            return false;
        };

        let delta = x - drag.start_x;
        if !drag.moved && delta.abs() > DRAG_THRESHOLD_PX {
            drag.moved = true;
        }
        if drag.moved {
            self.offset = self.clamp(drag.origin - delta);
        }
        self.drag = Some(drag);
        drag.moved
    }

    pub fn pointer_up(&mut self, pointer_id: u64) -> PointerRelease {
        match self.drag {
            Some(drag) if drag.pointer_id == pointer_id => {
                self.drag = None;
                if drag.moved {
                    PointerRelease::Drag
                } else {
                    PointerRelease::Tap
                }
            }
            _ => PointerRelease::Ignored,
        }
    }

    pub fn pointer_cancel(&mut self) {
        self.drag = None;
    }

    /// Applies the dominant wheel axis. Returns false when the content fits
    /// the viewport and the event should fall through to the page.
    pub fn wheel(&mut self, delta_x: f64, delta_y: f64) -> bool {
        if !self.is_scrollable() {
            return false;
        }
        let delta = if delta_x.abs() > delta_y.abs() {
            delta_x
        } else {
            delta_y
        };
        if delta == 0.0 || !delta.is_finite() {
            return false;
        }
        self.offset = self.clamp(self.offset + delta);
        true
    }

    fn clamp(&self, offset: f64) -> f64 {
        if offset.is_finite() {
            offset.clamp(0.0, self.max_offset())
        } else {
            0.0
        }
    }
}

fn sanitize(width: f64) -> f64 {
    if width.is_finite() { width.max(0.0) } else { 0.0 }
}
