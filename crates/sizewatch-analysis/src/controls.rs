use sizewatch_config::WindowMode;
use tracing::debug;

use crate::history::{HistoryEngine, Sample, Series, parse_window_or_default};
use crate::scroll::{PointerRelease, ScrollStrip};

/// Receives state changes from [`HistoryControls`]. Both hooks default to
/// no-ops so observers implement only what they render.
pub trait ControlsObserver {
    fn sample_focused(&mut self, _index: usize, _sample: &Sample) {}

    fn window_changed(&mut self, _window_mode: WindowMode, _series: &Series) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    Next,
    Previous,
    First,
    Last,
    Activate,
}

impl std::str::FromStr for NavKey {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "ArrowRight" | "ArrowDown" | "next" => Ok(Self::Next),
            "ArrowLeft" | "ArrowUp" | "previous" => Ok(Self::Previous),
            "Home" | "first" => Ok(Self::First),
            "End" | "last" => Ok(Self::Last),
            "Enter" | " " | "Spacebar" | "activate" => Ok(Self::Activate),
            other => Err(format!(
                "invalid navigation key '{other}', expected one of: next, previous, first, last, activate"
            )),
        }
    }
}

/// Window and focus state layered over one hydrated [`Series`].
///
/// `active` is the selected sample and drives observer notifications.
/// `cursor` is the keyboard position; it only becomes the selection on
/// [`NavKey::Activate`]. Both index into the visible samples.
pub struct HistoryControls {
    engine: HistoryEngine,
    series: Series,
    active: Option<usize>,
    cursor: Option<usize>,
    strip: ScrollStrip,
    observer: Option<Box<dyn ControlsObserver>>,
}

impl std::fmt::Debug for HistoryControls {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryControls")
            .field("window_mode", &self.series.window_mode())
            .field("active", &self.active)
            .field("cursor", &self.cursor)
            .field("strip", &self.strip)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

impl HistoryControls {
    pub fn new(engine: HistoryEngine, series: Series) -> Self {
        Self {
            engine,
            series,
            active: None,
            cursor: None,
            strip: ScrollStrip::default(),
            observer: None,
        }
    }

    pub fn with_observer(mut self, observer: Box<dyn ControlsObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn set_observer(&mut self, observer: Box<dyn ControlsObserver>) {
        self.observer = Some(observer);
    }

    pub fn series(&self) -> &Series {
        &self.series
    }

    pub fn window_mode(&self) -> WindowMode {
        self.series.window_mode()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn active_sample(&self) -> Option<&Sample> {
        self.active.and_then(|index| self.series.samples().get(index))
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn strip(&self) -> &ScrollStrip {
        &self.strip
    }

    /// Selects the sample nearest to `index` and notifies the observer.
    /// With no visible samples the selection clears and nothing fires.
    pub fn set_active(&mut self, index: usize) -> Option<usize> {
        let visible = self.series.samples().len();
        if visible == 0 {
            self.active = None;
            self.cursor = None;
            return None;
        }

        let index = index.min(visible - 1);
        self.active = Some(index);
        self.cursor = Some(index);

        let sample = &self.series.samples()[index];
        debug!(index, commit_id = %sample.commit_id, "history sample focused");
        if let Some(observer) = self.observer.as_mut() {
            observer.sample_focused(index, sample);
        }
        Some(index)
    }

    /// Like [`set_active`](Self::set_active) but ignores indexes outside
    /// the visible samples.
    pub fn focus(&mut self, index: usize) -> Option<usize> {
        if index >= self.series.samples().len() {
            return None;
        }
        self.set_active(index)
    }

    pub fn focus_commit(&mut self, commit_id: &str) -> Option<usize> {
        let index = self.series.position_of(commit_id)?;
        self.set_active(index)
    }

    /// Switches the visible window and stores it for the session. Focus
    /// follows the same commit when it is still visible, otherwise the old
    /// index is clamped into the new window. Re-resolving focus does not
    /// fire `sample_focused`.
    pub fn set_window(&mut self, window_mode: WindowMode) {
        if window_mode == self.series.window_mode() {
            return;
        }

        let active_commit = self.active_sample().map(|sample| sample.commit_id.clone());
        let cursor_commit = self
            .cursor
            .and_then(|index| self.series.samples().get(index))
            .map(|sample| sample.commit_id.clone());

        self.series.set_window(window_mode);
        self.engine.persist_window(window_mode);

        self.active = self.reresolve(active_commit.as_deref(), self.active);
        self.cursor = self.reresolve(cursor_commit.as_deref(), self.cursor);

        debug!(
            window = %window_mode,
            visible = self.series.samples().len(),
            active = ?self.active,
            "history window changed"
        );
        if let Some(observer) = self.observer.as_mut() {
            observer.window_changed(window_mode, &self.series);
        }
    }

    pub fn set_window_str(&mut self, raw: &str) -> WindowMode {
        let window_mode = parse_window_or_default(raw, self.series.default_window());
        self.set_window(window_mode);
        window_mode
    }

    /// Moves the keyboard cursor, clamped at both ends. `Activate` selects
    /// the sample under the cursor.
    pub fn handle_key(&mut self, key: NavKey) -> Option<usize> {
        let visible = self.series.samples().len();
        if visible == 0 {
            return None;
        }
        let last = visible - 1;
        let current = self.cursor.or(self.active);

        let next = match key {
            NavKey::First => 0,
            NavKey::Last => last,
            NavKey::Next => current.map_or(0, |index| (index + 1).min(last)),
            NavKey::Previous => current.map_or(0, |index| index.saturating_sub(1)),
            NavKey::Activate => return self.set_active(current.unwrap_or(0)),
        };
        self.cursor = Some(next);
        Some(next)
    }

    pub fn resize_strip(&mut self, content_width: f64, viewport_width: f64) {
        self.strip.resize(content_width, viewport_width);
    }

    pub fn pointer_down(&mut self, pointer_id: u64, x: f64, primary: bool) {
        self.strip.pointer_down(pointer_id, x, primary);
    }

    pub fn pointer_move(&mut self, pointer_id: u64, x: f64) -> bool {
        self.strip.pointer_move(pointer_id, x)
    }

    /// Ends a press. `tapped` is the sample under the pointer, if any; it is
    /// activated only when the press did not turn into a drag.
    pub fn pointer_up(&mut self, pointer_id: u64, tapped: Option<usize>) -> Option<usize> {
        match self.strip.pointer_up(pointer_id) {
            PointerRelease::Tap => tapped.and_then(|index| self.focus(index)),
            PointerRelease::Drag | PointerRelease::Ignored => None,
        }
    }

    pub fn pointer_cancel(&mut self) {
        self.strip.pointer_cancel();
    }

    pub fn wheel(&mut self, delta_x: f64, delta_y: f64) -> bool {
        self.strip.wheel(delta_x, delta_y)
    }

    fn reresolve(&self, commit_id: Option<&str>, previous: Option<usize>) -> Option<usize> {
        let visible = self.series.samples().len();
        if visible == 0 {
            return None;
        }
        commit_id
            .and_then(|commit_id| self.series.position_of(commit_id))
            .or_else(|| previous.map(|index| index.min(visible - 1)))
    }
}
