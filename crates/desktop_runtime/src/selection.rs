//! Rubber-band selection and click selection helpers.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect};

/// Selected icon ids in stable order.
pub type SelectionSet = BTreeSet<String>;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
/// Active rubber-band rectangle in container-local pixels.
pub struct SelectionBox {
    /// Anchor x.
    pub start_x: f64,
    /// Anchor y.
    pub start_y: f64,
    /// Current pointer x.
    pub current_x: f64,
    /// Current pointer y.
    pub current_y: f64,
}

impl SelectionBox {
    /// Normalized rectangle spanned by the anchor and the current pointer.
    pub fn rect(&self) -> Rect {
        Rect::from_corners(
            Point::new(self.start_x, self.start_y),
            Point::new(self.current_x, self.current_y),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// How a finished rubber band combines with the selection that existed when it started.
pub enum SelectionMode {
    /// The band's hits become the whole selection.
    #[default]
    Replace,
    /// The band's hits are added to the prior selection.
    Union,
}

#[derive(Debug, Clone, Default)]
/// Rubber-band state machine: `start` then any number of `update`s then `end`.
pub struct SelectionEngine {
    active: Option<SelectionBox>,
    mode: SelectionMode,
    base: SelectionSet,
    current: SelectionSet,
}

impl SelectionEngine {
    /// Starts a band at `origin`. Non-finite origins are ignored.
    ///
    /// `base` is the selection at drag start; it is kept only in [`SelectionMode::Union`].
    pub fn start(&mut self, origin: Point, mode: SelectionMode, base: &SelectionSet) -> bool {
        if !origin.is_finite() {
            return false;
        }
        self.active = Some(SelectionBox {
            start_x: origin.x,
            start_y: origin.y,
            current_x: origin.x,
            current_y: origin.y,
        });
        self.mode = mode;
        self.base = match mode {
            SelectionMode::Replace => SelectionSet::new(),
            SelectionMode::Union => base.clone(),
        };
        self.current = self.base.clone();
        true
    }

    /// Moves the band corner and recomputes hits against `candidates`.
    ///
    /// The candidate list may differ between calls. Non-finite points keep the last corner.
    pub fn update<'a, I>(&mut self, pointer: Point, candidates: I) -> Option<&SelectionSet>
    where
        I: IntoIterator<Item = (&'a str, Rect)>,
    {
        let band = self.active.as_mut()?;
        if pointer.is_finite() {
            band.current_x = pointer.x;
            band.current_y = pointer.y;
        }
        let area = band.rect();
        let mut next = self.base.clone();
        next.extend(
            candidates
                .into_iter()
                .filter(|(_, rect)| area.intersects(rect))
                .map(|(id, _)| id.to_string()),
        );
        self.current = next;
        Some(&self.current)
    }

    /// Finishes the band and returns the resulting selection, or `None` when no band was active.
    pub fn end(&mut self) -> Option<SelectionSet> {
        self.active.take()?;
        self.base.clear();
        Some(std::mem::take(&mut self.current))
    }

    /// Drops an active band without producing a selection.
    pub fn cancel(&mut self) {
        self.active = None;
        self.base.clear();
        self.current.clear();
    }

    /// Current band, while one is active.
    pub fn active_box(&self) -> Option<SelectionBox> {
        self.active
    }

    /// Hits accumulated so far by the active band.
    pub fn preview(&self) -> Option<&SelectionSet> {
        self.active.map(|_| &self.current)
    }
}

/// Plain click: the clicked id becomes the only selected id.
pub fn select_only(id: &str) -> SelectionSet {
    SelectionSet::from([id.to_string()])
}

/// Shift-click: flips membership of one id.
pub fn toggle(selection: &SelectionSet, id: &str) -> SelectionSet {
    let mut next = selection.clone();
    if !next.remove(id) {
        next.insert(id.to_string());
    }
    next
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn candidates() -> Vec<(&'static str, Rect)> {
        vec![
            ("a", Rect::new(0.0, 0.0, 100.0, 100.0)),
            ("b", Rect::new(116.0, 0.0, 100.0, 100.0)),
            ("c", Rect::new(0.0, 116.0, 100.0, 100.0)),
        ]
    }

    fn band(from: Point, to: Point, mode: SelectionMode, base: &SelectionSet) -> SelectionSet {
        let mut engine = SelectionEngine::default();
        assert!(engine.start(from, mode, base));
        engine.update(to, candidates());
        engine.end().expect("band result")
    }

    #[test]
    fn band_direction_does_not_change_the_result() {
        let empty = SelectionSet::new();
        let forward = band(
            Point::new(50.0, 50.0),
            Point::new(150.0, 80.0),
            SelectionMode::Replace,
            &empty,
        );
        let backward = band(
            Point::new(150.0, 80.0),
            Point::new(50.0, 50.0),
            SelectionMode::Replace,
            &empty,
        );
        assert_eq!(forward, backward);
        assert_eq!(forward, SelectionSet::from(["a".into(), "b".into()]));
    }

    #[test]
    fn band_touching_an_edge_selects_it() {
        let selected = band(
            Point::new(100.0, 100.0),
            Point::new(108.0, 110.0),
            SelectionMode::Replace,
            &SelectionSet::new(),
        );
        assert_eq!(selected, select_only("a"));
    }

    #[test]
    fn union_keeps_the_prior_selection_and_replace_drops_it() {
        let prior = select_only("c");
        let union = band(
            Point::new(120.0, 10.0),
            Point::new(130.0, 20.0),
            SelectionMode::Union,
            &prior,
        );
        assert_eq!(union, SelectionSet::from(["b".into(), "c".into()]));

        let replace = band(
            Point::new(120.0, 10.0),
            Point::new(130.0, 20.0),
            SelectionMode::Replace,
            &prior,
        );
        assert_eq!(replace, select_only("b"));
    }

    #[test]
    fn band_over_empty_space_finalizes_to_an_empty_set() {
        let selected = band(
            Point::new(300.0, 300.0),
            Point::new(400.0, 400.0),
            SelectionMode::Replace,
            &SelectionSet::new(),
        );
        assert!(selected.is_empty());
    }

    #[test]
    fn shrinking_candidates_drop_hits_mid_drag() {
        let mut engine = SelectionEngine::default();
        engine.start(Point::new(0.0, 0.0), SelectionMode::Replace, &SelectionSet::new());
        let all = engine
            .update(Point::new(300.0, 300.0), candidates())
            .cloned()
            .expect("active");
        assert_eq!(all.len(), 3);

        let fewer = engine
            .update(Point::new(300.0, 300.0), candidates().into_iter().take(1))
            .cloned()
            .expect("active");
        assert_eq!(fewer, select_only("a"));
    }

    #[test]
    fn stray_and_non_finite_events_are_ignored() {
        let mut engine = SelectionEngine::default();
        assert!(engine.update(Point::new(10.0, 10.0), candidates()).is_none());
        assert!(engine.end().is_none());
        assert!(!engine.start(Point::new(f64::NAN, 0.0), SelectionMode::Replace, &SelectionSet::new()));

        engine.start(Point::new(0.0, 0.0), SelectionMode::Replace, &SelectionSet::new());
        engine.update(Point::new(20.0, 20.0), candidates());
        engine.update(Point::new(f64::INFINITY, 20.0), candidates());
        let band = engine.active_box().expect("active band");
        assert_eq!((band.current_x, band.current_y), (20.0, 20.0));
    }

    #[test]
    fn toggle_flips_membership() {
        let selection = select_only("a");
        let with_b = toggle(&selection, "b");
        assert_eq!(with_b, SelectionSet::from(["a".into(), "b".into()]));
        assert_eq!(toggle(&with_b, "a"), select_only("b"));
    }
}
