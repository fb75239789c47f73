//! Per-icon interaction: double-click detection, inline rename, and the intents an icon raises.

use desktop_app_contract::ContextMenuKind;

use crate::{config::InputSettings, geometry::Point};

#[derive(Debug, Clone, PartialEq)]
/// Intents an icon raises toward the grid that hosts it.
pub enum IconIntent {
    /// Select the icon; `toggle` flips membership instead of replacing the selection.
    Select {
        /// Icon id.
        id: String,
        /// Whether shift was held.
        toggle: bool,
    },
    /// Open the icon's window.
    Open(String),
    /// Show a context menu for the icon.
    ContextMenu {
        /// Icon id.
        id: String,
        /// Menu flavor derived from the icon kind.
        kind: ContextMenuKind,
    },
    /// Pointer travelled far enough to start dragging the icon.
    DragStart(String),
    /// Drag in progress.
    Drag(Point),
    /// Drag released.
    DragEnd(Point),
    /// Inline rename produced a new title.
    RenameComplete {
        /// Icon id.
        id: String,
        /// Trimmed, non-empty title.
        title: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Result of registering a press with a [`ClickTracker`].
pub enum ClickOutcome {
    /// Plain selecting press.
    Single,
    /// Second press of a double click.
    Double,
}

#[derive(Debug, Clone, PartialEq)]
struct PressRecord {
    id: String,
    at_ms: f64,
    point: Point,
}

#[derive(Debug, Clone, Default)]
/// Detects double clicks from successive presses.
///
/// Two presses on the same icon form a double click when both the elapsed time and the pointer
/// distance are strictly below the configured thresholds.
pub struct ClickTracker {
    last: Option<PressRecord>,
}

impl ClickTracker {
    /// Registers a press and classifies it.
    pub fn press(
        &mut self,
        id: &str,
        at_ms: f64,
        point: Point,
        settings: &InputSettings,
    ) -> ClickOutcome {
        let is_double = self.last.as_ref().is_some_and(|last| {
            let elapsed = at_ms - last.at_ms;
            last.id == id
                && elapsed >= 0.0
                && elapsed < settings.double_click_ms as f64
                && last.point.distance(point) < settings.double_click_distance
        });
        if is_double {
            // A third quick press starts a new pair instead of opening again.
            self.last = None;
            return ClickOutcome::Double;
        }
        self.last = point.is_finite().then(|| PressRecord {
            id: id.to_string(),
            at_ms,
            point,
        });
        ClickOutcome::Single
    }

    /// Forgets the previous press.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Keys the inline rename input reacts to.
pub enum RenameKey {
    /// Commit the draft.
    Enter,
    /// Abandon the draft.
    Escape,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// What a rename input event resolved to.
pub enum RenameOutcome {
    /// Still editing.
    Pending,
    /// Commit this trimmed title.
    Commit(String),
    /// Editing ended without a change.
    Cancel,
    /// The event arrived after editing ended and was dropped.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RenamePhase {
    Editing,
    // Escape ended the edit; the blur that follows must not commit.
    Cancelled,
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Inline rename of one icon title.
pub struct RenameSession {
    id: String,
    original: String,
    draft: String,
    phase: RenamePhase,
}

impl RenameSession {
    /// Starts editing with the draft pre-filled with the current title.
    pub fn begin(id: impl Into<String>, current_title: impl Into<String>) -> Self {
        let original = current_title.into();
        Self {
            id: id.into(),
            draft: original.clone(),
            original,
            phase: RenamePhase::Editing,
        }
    }

    /// Icon being renamed.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Current input text. The whole draft is selected when editing begins.
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// `true` until the session commits or cancels.
    pub fn is_editing(&self) -> bool {
        self.phase == RenamePhase::Editing
    }

    /// Replaces the draft text.
    pub fn input(&mut self, text: impl Into<String>) {
        if self.is_editing() {
            self.draft = text.into();
        }
    }

    /// Handles a key press in the input.
    pub fn key(&mut self, key: RenameKey) -> RenameOutcome {
        if !self.is_editing() {
            return RenameOutcome::Ignored;
        }
        match key {
            RenameKey::Enter => self.finish(),
            RenameKey::Escape => {
                self.phase = RenamePhase::Cancelled;
                RenameOutcome::Cancel
            }
        }
    }

    /// Handles the input losing focus.
    pub fn blur(&mut self) -> RenameOutcome {
        match self.phase {
            RenamePhase::Editing => self.finish(),
            RenamePhase::Cancelled | RenamePhase::Done => RenameOutcome::Ignored,
        }
    }

    fn finish(&mut self) -> RenameOutcome {
        self.phase = RenamePhase::Done;
        let title = self.draft.trim();
        if title.is_empty() || title == self.original {
            RenameOutcome::Cancel
        } else {
            RenameOutcome::Commit(title.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn settings() -> InputSettings {
        InputSettings::default()
    }

    fn second_press(elapsed_ms: f64, dx: f64) -> ClickOutcome {
        let mut tracker = ClickTracker::default();
        tracker.press("calc", 1_000.0, Point::new(40.0, 40.0), &settings());
        tracker.press(
            "calc",
            1_000.0 + elapsed_ms,
            Point::new(40.0 + dx, 40.0),
            &settings(),
        )
    }

    #[test]
    fn double_click_window_is_strict() {
        assert_eq!(second_press(499.0, 0.0), ClickOutcome::Double);
        assert_eq!(second_press(500.0, 0.0), ClickOutcome::Single);
        assert_eq!(second_press(501.0, 0.0), ClickOutcome::Single);
        assert_eq!(second_press(100.0, 11.0), ClickOutcome::Single);
        assert_eq!(second_press(100.0, 10.0), ClickOutcome::Single);
        assert_eq!(second_press(100.0, 9.5), ClickOutcome::Double);
    }

    #[test]
    fn presses_on_different_icons_never_pair() {
        let mut tracker = ClickTracker::default();
        tracker.press("a", 0.0, Point::new(0.0, 0.0), &settings());
        assert_eq!(
            tracker.press("b", 50.0, Point::new(0.0, 0.0), &settings()),
            ClickOutcome::Single
        );
    }

    #[test]
    fn third_quick_press_starts_a_new_pair() {
        let mut tracker = ClickTracker::default();
        let at = Point::new(5.0, 5.0);
        assert_eq!(tracker.press("a", 0.0, at, &settings()), ClickOutcome::Single);
        assert_eq!(tracker.press("a", 100.0, at, &settings()), ClickOutcome::Double);
        assert_eq!(tracker.press("a", 200.0, at, &settings()), ClickOutcome::Single);
    }

    #[test]
    fn enter_commits_trimmed_title() {
        let mut session = RenameSession::begin("notes", "Notes.txt");
        assert_eq!(session.draft(), "Notes.txt");
        session.input("  Ideas.txt ");
        assert_eq!(
            session.key(RenameKey::Enter),
            RenameOutcome::Commit("Ideas.txt".to_string())
        );
        assert_eq!(session.blur(), RenameOutcome::Ignored);
    }

    #[test]
    fn blur_commits_while_editing() {
        let mut session = RenameSession::begin("notes", "Notes.txt");
        session.input("Ideas.txt");
        assert_eq!(session.blur(), RenameOutcome::Commit("Ideas.txt".to_string()));
    }

    #[test]
    fn escape_cancels_and_swallows_the_following_blur() {
        let mut session = RenameSession::begin("notes", "Notes.txt");
        session.input("Ideas.txt");
        assert_eq!(session.key(RenameKey::Escape), RenameOutcome::Cancel);
        assert_eq!(session.blur(), RenameOutcome::Ignored);
        assert!(!session.is_editing());
    }

    #[test]
    fn whitespace_or_unchanged_titles_revert() {
        let mut blank = RenameSession::begin("notes", "Notes.txt");
        blank.input("   ");
        assert_eq!(blank.key(RenameKey::Enter), RenameOutcome::Cancel);

        let mut same = RenameSession::begin("notes", "Notes.txt");
        assert_eq!(same.blur(), RenameOutcome::Cancel);
    }
}
