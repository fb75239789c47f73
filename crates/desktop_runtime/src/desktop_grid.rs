//! Desktop icon container.
//!
//! [`DesktopGrid`] owns the authoritative icon list and turns raw pointer input into icon
//! intents, rubber-band selection, and drag commits. It never talks to storage or windows; every
//! externally visible change is returned as a [`DesktopEvent`] for the runtime to route.

use std::cmp::Ordering;

use desktop_app_contract::{AppIcon, ContextMenuKind, ContextMenuRequest, IconKind, SortKey};

use crate::{
    config::{DesktopConfig, GridSettings, InputSettings},
    geometry::{Point, Rect, Size},
    grid::{self, ensure_unique_ids, GridDimensions, GridError, GridItem, GridPosition},
    icon::{ClickOutcome, ClickTracker, IconIntent, RenameKey, RenameOutcome, RenameSession},
    selection::{self, SelectionBox, SelectionEngine, SelectionMode, SelectionSet},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Pointer button of a press.
pub enum PointerButton {
    /// Primary (usually left) button.
    #[default]
    Primary,
    /// Secondary (context) button.
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
/// One pointer event in container-local pixels.
pub struct PointerInput {
    /// Pointer location.
    pub point: Point,
    /// Button involved.
    pub button: PointerButton,
    /// Whether shift was held.
    pub shift: bool,
    /// Event time in milliseconds from any fixed origin.
    pub time_ms: f64,
}

impl PointerInput {
    /// Primary-button input at `(x, y)`.
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            point: Point::new(x, y),
            ..Self::default()
        }
    }

    /// Sets the event time.
    pub fn at_time(mut self, time_ms: f64) -> Self {
        self.time_ms = time_ms;
        self
    }

    /// Marks shift as held.
    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Externally visible outcome of a grid operation.
pub enum DesktopEvent {
    /// The committed selection changed.
    SelectionChanged(SelectionSet),
    /// Icon positions or titles changed; carries the full updated list.
    IconsChanged(Vec<AppIcon>),
    /// An icon asked for its window to open.
    OpenRequested(String),
    /// The shell should show a context menu.
    ContextMenu(ContextMenuRequest),
    /// An inline rename committed.
    RenameCommitted {
        /// Icon id.
        id: String,
        /// New title.
        title: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
struct DragState {
    ids: SelectionSet,
    anchor: GridPosition,
    origin: Point,
    delta: (i64, i64),
}

#[derive(Debug, Clone, PartialEq)]
enum Gesture {
    // Pressed on an icon but below the drag threshold.
    Press { id: String, origin: Point },
    Drag(DragState),
    Band,
}

#[derive(Debug, Clone)]
/// Icon grid container state.
pub struct DesktopGrid {
    settings: GridSettings,
    input: InputSettings,
    icons: Vec<AppIcon>,
    dimensions: GridDimensions,
    selection: SelectionSet,
    band: SelectionEngine,
    gesture: Option<Gesture>,
    clicks: ClickTracker,
    rename: Option<RenameSession>,
}

impl DesktopGrid {
    /// Creates an empty grid sized for its preferred cell extents.
    pub fn new(config: &DesktopConfig) -> Self {
        let settings = config.grid.clone();
        let columns = settings.columns.max(1);
        let preferred = Size::new(
            f64::from(columns) * settings.cell_width + f64::from(columns - 1) * settings.gap,
            settings.cell_height,
        );
        Self {
            dimensions: GridDimensions::compute(preferred, columns, &settings),
            settings,
            input: config.input.clone(),
            icons: Vec::new(),
            selection: SelectionSet::new(),
            band: SelectionEngine::default(),
            gesture: None,
            clicks: ClickTracker::default(),
            rename: None,
        }
    }

    /// Current icon list with committed positions.
    pub fn icons(&self) -> &[AppIcon] {
        &self.icons
    }

    /// Icon by id.
    pub fn icon(&self, id: &str) -> Option<&AppIcon> {
        self.icons.iter().find(|icon| icon.id == id)
    }

    /// Committed selection.
    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// Live rubber-band rectangle, while one is being dragged.
    pub fn selection_box(&self) -> Option<SelectionBox> {
        self.band.active_box()
    }

    /// Ids the live rubber band would select if released now.
    pub fn band_preview(&self) -> Option<&SelectionSet> {
        self.band.preview()
    }

    /// Current cell geometry.
    pub fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    /// Active inline rename, if any.
    pub fn rename_session(&self) -> Option<&RenameSession> {
        self.rename.as_ref()
    }

    /// Pixel rectangle of an icon's cell.
    pub fn icon_rect(&self, id: &str) -> Option<Rect> {
        self.icon(id)
            .map(|icon| self.dimensions.cell_rect(position_of(icon)))
    }

    /// Unsnapped cells of the icons being dragged, for rendering drag feedback.
    pub fn drag_preview(&self) -> Vec<GridItem> {
        let Some(Gesture::Drag(drag)) = &self.gesture else {
            return Vec::new();
        };
        let columns = self.dimensions.columns;
        self.icons
            .iter()
            .filter(|icon| drag.ids.contains(&icon.id))
            .map(|icon| GridItem {
                id: icon.id.clone(),
                position: position_of(icon).offset(drag.delta.0, drag.delta.1, columns),
            })
            .collect()
    }

    /// Returns `true` while a drag, press, or rubber band is in progress.
    pub fn has_active_gesture(&self) -> bool {
        self.gesture.is_some()
    }

    /// Replaces the icon list with the caller's.
    ///
    /// Positions are clamped into the column range and overlapping icons move to the nearest
    /// free cell; when that happens the corrected list is reported through
    /// [`DesktopEvent::IconsChanged`]. Selection entries and gestures that reference icons no
    /// longer present are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::DuplicateId`] and keeps the previous list when ids repeat.
    pub fn sync_icons(&mut self, icons: Vec<AppIcon>) -> Result<Vec<DesktopEvent>, GridError> {
        let mut items = grid_items(&icons);
        ensure_unique_ids(&items)?;
        let moved = grid::resolve_overlaps(&mut items, self.dimensions.columns);

        self.icons = icons;
        apply_positions(&mut self.icons, &items);

        let mut events = Vec::new();
        if moved {
            events.push(DesktopEvent::IconsChanged(self.icons.clone()));
        }
        self.forget_missing_icons(&mut events);
        Ok(events)
    }

    /// Records a new container size. Non-finite or empty sizes keep the last good geometry.
    ///
    /// Returns `true` when the geometry was recomputed.
    pub fn resize_container(&mut self, container: Size) -> bool {
        if !container.is_usable() {
            return false;
        }
        self.dimensions = GridDimensions::compute(container, self.settings.columns, &self.settings);
        true
    }

    /// Handles a button press.
    pub fn pointer_down(&mut self, input: PointerInput) -> Vec<DesktopEvent> {
        if !input.point.is_finite() || self.gesture.is_some() {
            return Vec::new();
        }
        if input.button == PointerButton::Secondary {
            return self.context_menu(input.point);
        }

        let Some(id) = self.icon_at(input.point).map(|icon| icon.id.clone()) else {
            return self.begin_band(input);
        };

        let mut events = self.handle_intent(IconIntent::Select {
            id: id.clone(),
            toggle: input.shift,
        });
        let click = self
            .clicks
            .press(&id, input.time_ms, input.point, &self.input);
        if click == ClickOutcome::Double {
            events.extend(self.handle_intent(IconIntent::Open(id.clone())));
        }
        self.gesture = Some(Gesture::Press {
            id,
            origin: input.point,
        });
        events
    }

    /// Handles pointer movement. Movement without a press is ignored.
    pub fn pointer_move(&mut self, point: Point) -> Vec<DesktopEvent> {
        if !point.is_finite() {
            return Vec::new();
        }
        match &self.gesture {
            Some(Gesture::Press { id, origin }) => {
                if origin.distance(point) < self.settings.drag_threshold {
                    return Vec::new();
                }
                let id = id.clone();
                let mut events = self.handle_intent(IconIntent::DragStart(id));
                events.extend(self.handle_intent(IconIntent::Drag(point)));
                events
            }
            Some(Gesture::Drag(_)) => self.handle_intent(IconIntent::Drag(point)),
            Some(Gesture::Band) => {
                let candidates = self.band_candidates();
                self.band
                    .update(point, candidates.iter().map(|(id, rect)| (id.as_str(), *rect)));
                Vec::new()
            }
            None => Vec::new(),
        }
    }

    /// Handles a button release and commits whatever gesture was active.
    pub fn pointer_up(&mut self, input: PointerInput) -> Vec<DesktopEvent> {
        match self.gesture.take() {
            Some(Gesture::Press { id, .. }) => {
                // A plain click on one member of a multi-selection narrows it on release.
                if !input.shift && self.selection.len() > 1 && self.selection.contains(&id) {
                    self.set_selection(selection::select_only(&id))
                } else {
                    Vec::new()
                }
            }
            Some(drag @ Gesture::Drag(_)) => {
                self.gesture = Some(drag);
                self.handle_intent(IconIntent::DragEnd(input.point))
            }
            Some(Gesture::Band) => {
                if input.point.is_finite() {
                    let candidates = self.band_candidates();
                    self.band.update(
                        input.point,
                        candidates.iter().map(|(id, rect)| (id.as_str(), *rect)),
                    );
                }
                match self.band.end() {
                    Some(selected) => {
                        self.selection = selected.clone();
                        vec![DesktopEvent::SelectionChanged(selected)]
                    }
                    None => Vec::new(),
                }
            }
            None => Vec::new(),
        }
    }

    /// Abandons the active gesture without committing it.
    pub fn cancel_gesture(&mut self) {
        if matches!(self.gesture.take(), Some(Gesture::Band)) {
            self.band.cancel();
        }
    }

    /// Context-menu request for a point: the icon's kind when over an icon, else `desktop`.
    pub fn context_menu(&mut self, point: Point) -> Vec<DesktopEvent> {
        if !point.is_finite() {
            return Vec::new();
        }
        match self.icon_at(point).map(|icon| (icon.id.clone(), icon.kind)) {
            Some((id, kind)) => {
                let mut events = Vec::new();
                if !self.selection.contains(&id) {
                    events.extend(self.set_selection(selection::select_only(&id)));
                }
                events.push(DesktopEvent::ContextMenu(ContextMenuRequest {
                    kind: kind.into(),
                    x: point.x,
                    y: point.y,
                    target_id: Some(id),
                }));
                events
            }
            None => vec![DesktopEvent::ContextMenu(ContextMenuRequest {
                kind: ContextMenuKind::Desktop,
                x: point.x,
                y: point.y,
                target_id: None,
            })],
        }
    }

    /// Applies one icon intent. Pointer handlers route through here; shells that track icon
    /// events themselves may call it directly.
    pub fn handle_intent(&mut self, intent: IconIntent) -> Vec<DesktopEvent> {
        match intent {
            IconIntent::Select { id, toggle } => {
                if self.icon(&id).is_none() {
                    return Vec::new();
                }
                if toggle {
                    let next = selection::toggle(&self.selection, &id);
                    self.set_selection(next)
                } else if self.selection.contains(&id) {
                    // Keep the group so it can be dragged together.
                    Vec::new()
                } else {
                    self.set_selection(selection::select_only(&id))
                }
            }
            IconIntent::Open(id) => {
                if self.icon(&id).is_some() {
                    vec![DesktopEvent::OpenRequested(id)]
                } else {
                    Vec::new()
                }
            }
            IconIntent::ContextMenu { id, kind } => match self.icon_rect(&id) {
                Some(rect) => vec![DesktopEvent::ContextMenu(ContextMenuRequest {
                    kind,
                    x: rect.left,
                    y: rect.top,
                    target_id: Some(id),
                })],
                None => Vec::new(),
            },
            IconIntent::DragStart(id) => {
                self.start_drag(&id);
                Vec::new()
            }
            IconIntent::Drag(point) => {
                self.track_drag(point);
                Vec::new()
            }
            IconIntent::DragEnd(point) => self.finish_drag(point),
            IconIntent::RenameComplete { id, title } => self.commit_title(&id, title),
        }
    }

    /// Opens the inline rename input for an icon. Returns `false` for unknown ids.
    pub fn begin_rename(&mut self, id: &str) -> bool {
        let Some(icon) = self.icon(id) else {
            return false;
        };
        self.rename = Some(RenameSession::begin(id, icon.title.clone()));
        true
    }

    /// Updates the rename draft.
    pub fn rename_input(&mut self, text: &str) {
        if let Some(session) = self.rename.as_mut() {
            session.input(text);
        }
    }

    /// Forwards a key press to the rename input.
    pub fn rename_key(&mut self, key: RenameKey) -> Vec<DesktopEvent> {
        let outcome = match self.rename.as_mut() {
            Some(session) => session.key(key),
            None => return Vec::new(),
        };
        self.resolve_rename(outcome)
    }

    /// Forwards a blur to the rename input.
    pub fn rename_blur(&mut self) -> Vec<DesktopEvent> {
        let outcome = match self.rename.as_mut() {
            Some(session) => session.blur(),
            None => return Vec::new(),
        };
        self.resolve_rename(outcome)
    }

    /// Reflows user icons by `key`; system application icons keep their cells.
    pub fn sort(&mut self, key: SortKey) -> Vec<DesktopEvent> {
        self.cancel_gesture();
        self.icons = sort_icons(&self.icons, key, self.dimensions.columns);
        vec![DesktopEvent::IconsChanged(self.icons.clone())]
    }

    /// Adds an icon at the next available position, ignoring its incoming coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::DuplicateId`] when the id already exists.
    pub fn add_icon(&mut self, mut icon: AppIcon) -> Result<Vec<DesktopEvent>, GridError> {
        if self.icon(&icon.id).is_some() {
            return Err(GridError::DuplicateId(icon.id));
        }
        let position = grid::next_available_position(&grid_items(&self.icons));
        icon.x = position.col as i32;
        icon.y = position.row as i32;
        self.icons.push(icon);
        Ok(vec![DesktopEvent::IconsChanged(self.icons.clone())])
    }

    /// Deletes an icon.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::UnknownItem`] for missing ids and [`GridError::SystemIcon`] for
    /// application icons.
    pub fn remove_icon(&mut self, id: &str) -> Result<Vec<DesktopEvent>, GridError> {
        let index = self
            .icons
            .iter()
            .position(|icon| icon.id == id)
            .ok_or_else(|| GridError::UnknownItem(id.to_string()))?;
        if self.icons[index].kind == IconKind::App {
            return Err(GridError::SystemIcon(id.to_string()));
        }
        self.icons.remove(index);
        let mut events = vec![DesktopEvent::IconsChanged(self.icons.clone())];
        self.forget_missing_icons(&mut events);
        Ok(events)
    }

    fn icon_at(&self, point: Point) -> Option<&AppIcon> {
        let cell = self.dimensions.hit_cell(point)?;
        self.icons.iter().find(|icon| position_of(icon) == cell)
    }

    fn band_candidates(&self) -> Vec<(String, Rect)> {
        self.icons
            .iter()
            .map(|icon| (icon.id.clone(), self.dimensions.cell_rect(position_of(icon))))
            .collect()
    }

    fn begin_band(&mut self, input: PointerInput) -> Vec<DesktopEvent> {
        self.clicks.reset();
        let mode = if input.shift {
            SelectionMode::Union
        } else {
            SelectionMode::Replace
        };
        if !self.band.start(input.point, mode, &self.selection) {
            return Vec::new();
        }
        self.gesture = Some(Gesture::Band);
        if mode == SelectionMode::Replace && !self.selection.is_empty() {
            self.set_selection(SelectionSet::new())
        } else {
            Vec::new()
        }
    }

    fn start_drag(&mut self, id: &str) {
        let origin = match &self.gesture {
            Some(Gesture::Press { id: pressed, origin }) if pressed == id => *origin,
            _ => return,
        };
        let Some(anchor) = self.icon(id).map(position_of) else {
            self.gesture = None;
            return;
        };
        let ids = if self.selection.contains(id) {
            self.selection.clone()
        } else {
            selection::select_only(id)
        };
        self.gesture = Some(Gesture::Drag(DragState {
            ids,
            anchor,
            origin,
            delta: (0, 0),
        }));
    }

    fn track_drag(&mut self, point: Point) {
        if !point.is_finite() {
            return;
        }
        let dimensions = self.dimensions;
        if let Some(Gesture::Drag(drag)) = self.gesture.as_mut() {
            let from = dimensions.cell_at(drag.origin);
            let to = dimensions.cell_at(point);
            drag.delta = (
                i64::from(to.col) - i64::from(from.col),
                i64::from(to.row) - i64::from(from.row),
            );
        }
    }

    fn finish_drag(&mut self, point: Point) -> Vec<DesktopEvent> {
        if !matches!(self.gesture, Some(Gesture::Drag(_))) {
            return Vec::new();
        }
        self.track_drag(point);
        let Some(Gesture::Drag(drag)) = self.gesture.take() else {
            return Vec::new();
        };
        if drag.delta == (0, 0) {
            return Vec::new();
        }

        let items = grid_items(&self.icons);
        let columns = self.dimensions.columns;
        let committed = match drag.ids.iter().next() {
            Some(only) if drag.ids.len() == 1 => grid::place(
                &items,
                only,
                i64::from(drag.anchor.col) + drag.delta.0,
                i64::from(drag.anchor.row) + drag.delta.1,
                columns,
            ),
            _ => grid::move_group(&items, &drag.ids, drag.delta.0, drag.delta.1, columns),
        };
        let Ok(committed) = committed else {
            return Vec::new();
        };
        if committed == items {
            return Vec::new();
        }
        apply_positions(&mut self.icons, &committed);
        vec![DesktopEvent::IconsChanged(self.icons.clone())]
    }

    fn resolve_rename(&mut self, outcome: RenameOutcome) -> Vec<DesktopEvent> {
        match outcome {
            RenameOutcome::Pending | RenameOutcome::Ignored => Vec::new(),
            RenameOutcome::Cancel => {
                self.rename = None;
                Vec::new()
            }
            RenameOutcome::Commit(title) => {
                let Some(session) = self.rename.take() else {
                    return Vec::new();
                };
                self.handle_intent(IconIntent::RenameComplete {
                    id: session.id().to_string(),
                    title,
                })
            }
        }
    }

    fn commit_title(&mut self, id: &str, title: String) -> Vec<DesktopEvent> {
        let title = title.trim().to_string();
        let Some(icon) = self.icons.iter_mut().find(|icon| icon.id == id) else {
            return Vec::new();
        };
        if title.is_empty() || icon.title == title {
            return Vec::new();
        }
        icon.title = title.clone();
        vec![
            DesktopEvent::RenameCommitted {
                id: id.to_string(),
                title,
            },
            DesktopEvent::IconsChanged(self.icons.clone()),
        ]
    }

    fn set_selection(&mut self, next: SelectionSet) -> Vec<DesktopEvent> {
        if next == self.selection {
            return Vec::new();
        }
        self.selection = next.clone();
        vec![DesktopEvent::SelectionChanged(next)]
    }

    fn forget_missing_icons(&mut self, events: &mut Vec<DesktopEvent>) {
        let icons = &self.icons;
        let present = |id: &str| icons.iter().any(|icon| icon.id == id);

        let pruned: SelectionSet = self
            .selection
            .iter()
            .filter(|id| present(id.as_str()))
            .cloned()
            .collect();
        let gesture_lost = match &self.gesture {
            Some(Gesture::Press { id, .. }) => !present(id),
            Some(Gesture::Drag(drag)) => !drag.ids.iter().all(|id| present(id.as_str())),
            _ => false,
        };
        let rename_lost = self
            .rename
            .as_ref()
            .is_some_and(|session| !present(session.id()));

        if gesture_lost {
            self.gesture = None;
        }
        if rename_lost {
            self.rename = None;
        }
        events.extend(self.set_selection(pruned));
    }
}

fn position_of(icon: &AppIcon) -> GridPosition {
    GridPosition::clamped(i64::from(icon.x), i64::from(icon.y), u32::MAX)
}

fn grid_items(icons: &[AppIcon]) -> Vec<GridItem> {
    icons
        .iter()
        .map(|icon| GridItem {
            id: icon.id.clone(),
            position: position_of(icon),
        })
        .collect()
}

fn apply_positions(icons: &mut [AppIcon], items: &[GridItem]) {
    for (icon, item) in icons.iter_mut().zip(items) {
        icon.x = item.position.col as i32;
        icon.y = item.position.row as i32;
    }
}

/// Reflows an icon list by `key`.
///
/// Application icons keep their cells and come first in the result. The remaining icons are
/// ordered by `key` and laid out row-major across `columns`, starting at the row after the
/// lowest application icon.
pub fn sort_icons(icons: &[AppIcon], key: SortKey, columns: u32) -> Vec<AppIcon> {
    let columns = columns.max(1);
    let (system, mut user): (Vec<AppIcon>, Vec<AppIcon>) =
        icons.iter().cloned().partition(|icon| icon.kind == IconKind::App);

    let start_row = system
        .iter()
        .map(|icon| position_of(icon).row)
        .max()
        .map_or(0, |row| row.saturating_add(1));

    user.sort_by(|a, b| compare_icons(a, b, key));
    for (index, icon) in user.iter_mut().enumerate() {
        let index = index as u32;
        icon.x = (index % columns) as i32;
        icon.y = (start_row + index / columns) as i32;
    }

    let mut sorted = system;
    sorted.extend(user);
    sorted
}

fn compare_icons(a: &AppIcon, b: &AppIcon, key: SortKey) -> Ordering {
    let by_name = || {
        a.title
            .to_lowercase()
            .cmp(&b.title.to_lowercase())
            .then_with(|| a.id.cmp(&b.id))
    };
    match key {
        SortKey::Name => by_name(),
        SortKey::NameDesc => by_name().reverse(),
        // Newest first; entries without a timestamp sink to the end.
        SortKey::Date => b
            .modified_unix_ms
            .cmp(&a.modified_unix_ms)
            .then_with(by_name),
        SortKey::Size => b.size_bytes.cmp(&a.size_bytes).then_with(by_name),
        SortKey::Type => kind_rank(a.kind)
            .cmp(&kind_rank(b.kind))
            .then_with(|| a.kind.token().cmp(b.kind.token()))
            .then_with(by_name),
    }
}

fn kind_rank(kind: IconKind) -> u8 {
    match kind {
        IconKind::Folder => 0,
        IconKind::File | IconKind::App => 1,
    }
}
