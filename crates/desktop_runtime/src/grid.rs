//! Grid layout engine: cell geometry, placement, and collision resolution for desktop icons.
//!
//! Positions are logical `(col, row)` cells. Columns are fixed by configuration and rows grow
//! without bound. Every operation that commits a layout leaves at most one item per cell.

use std::collections::{BTreeSet, HashSet, VecDeque};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    config::GridSettings,
    geometry::{Point, Rect, Size},
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Grid operation failures.
pub enum GridError {
    /// Two items in the input share an id.
    #[error("duplicate grid item id `{0}`")]
    DuplicateId(String),
    /// The referenced item does not exist.
    #[error("unknown grid item `{0}`")]
    UnknownItem(String),
    /// System application icons cannot be deleted.
    #[error("`{0}` is a system icon and cannot be removed")]
    SystemIcon(String),
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
/// Logical cell coordinate.
pub struct GridPosition {
    /// Column, `0..columns`.
    pub col: u32,
    /// Row, unbounded.
    pub row: u32,
}

impl GridPosition {
    /// Creates a position.
    pub const fn new(col: u32, row: u32) -> Self {
        Self { col, row }
    }

    /// Clamps signed coordinates into the grid: negatives become 0 and columns cap at
    /// `columns - 1`.
    pub fn clamped(col: i64, row: i64, columns: u32) -> Self {
        let last_col = i64::from(columns.max(1) - 1);
        Self {
            col: col.clamp(0, last_col) as u32,
            row: row.clamp(0, i64::from(u32::MAX)) as u32,
        }
    }

    /// Shifts by a signed cell delta and clamps into the grid.
    pub fn offset(self, dcol: i64, drow: i64, columns: u32) -> Self {
        Self::clamped(
            i64::from(self.col) + dcol,
            i64::from(self.row) + drow,
            columns,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// An identified occupant of one grid cell.
pub struct GridItem {
    /// Item id, unique within a layout.
    pub id: String,
    /// Occupied cell.
    pub position: GridPosition,
}

impl GridItem {
    /// Creates an item.
    pub fn new(id: impl Into<String>, col: u32, row: u32) -> Self {
        Self {
            id: id.into(),
            position: GridPosition::new(col, row),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
/// Pixel layout derived from the container size and the column count.
pub struct GridDimensions {
    /// Cell width in pixels.
    pub cell_width: f64,
    /// Cell height in pixels.
    pub cell_height: f64,
    /// Gap between cells.
    pub gap: f64,
    /// Column count, at least 1.
    pub columns: u32,
    /// Rows fully visible in the container, at least 1.
    pub rows: u32,
}

impl GridDimensions {
    /// Computes cell geometry for a container.
    ///
    /// Never divides by zero: `columns` is raised to 1 and non-finite or negative extents count
    /// as zero, in which case cells fall back to `settings.min_cell_size`.
    pub fn compute(container: Size, columns: u32, settings: &GridSettings) -> Self {
        let columns = columns.max(1);
        let gap = settings.gap.max(0.0);
        let width = non_negative(container.width);
        let height = non_negative(container.height);

        let per_column = (width - gap * f64::from(columns - 1)) / f64::from(columns);
        let cell_width = settings
            .cell_width
            .min(per_column)
            .max(settings.min_cell_size);
        let cell_height = settings.cell_height.max(settings.min_cell_size);
        let rows = ((height + gap) / (cell_height + gap)).floor().max(1.0) as u32;

        Self {
            cell_width,
            cell_height,
            gap,
            columns,
            rows,
        }
    }

    /// Horizontal distance between the origins of adjacent columns.
    pub fn column_pitch(&self) -> f64 {
        self.cell_width + self.gap
    }

    /// Vertical distance between the origins of adjacent rows.
    pub fn row_pitch(&self) -> f64 {
        self.cell_height + self.gap
    }

    /// Pixel rectangle of a cell.
    pub fn cell_rect(&self, position: GridPosition) -> Rect {
        Rect::new(
            f64::from(position.col) * self.column_pitch(),
            f64::from(position.row) * self.row_pitch(),
            self.cell_width,
            self.cell_height,
        )
    }

    /// Cell whose pitch box contains `point`, clamped into the grid. Non-finite coordinates map
    /// to the first column/row.
    pub fn cell_at(&self, point: Point) -> GridPosition {
        let col = (point.x / self.column_pitch()).floor();
        let row = (point.y / self.row_pitch()).floor();
        GridPosition::clamped(to_cell_index(col), to_cell_index(row), self.columns)
    }

    /// Cell whose rectangle (excluding the gap) contains `point`, if any.
    pub fn hit_cell(&self, point: Point) -> Option<GridPosition> {
        if !point.is_finite() || point.x < 0.0 || point.y < 0.0 {
            return None;
        }
        let col = (point.x / self.column_pitch()).floor();
        if col >= f64::from(self.columns) {
            return None;
        }
        let position = self.cell_at(point);
        self.cell_rect(position).contains(point).then_some(position)
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

fn to_cell_index(value: f64) -> i64 {
    if value.is_finite() {
        value as i64
    } else {
        0
    }
}

/// Fails on the first repeated id.
pub fn ensure_unique_ids(items: &[GridItem]) -> Result<(), GridError> {
    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
        if !seen.insert(item.id.as_str()) {
            return Err(GridError::DuplicateId(item.id.clone()));
        }
    }
    Ok(())
}

/// Moves `moved_id` to the target cell. An item already in the target cell takes the moved
/// item's source cell; every other item keeps its position.
///
/// # Errors
///
/// Returns [`GridError::DuplicateId`] for repeated ids and [`GridError::UnknownItem`] when
/// `moved_id` is absent.
pub fn place(
    items: &[GridItem],
    moved_id: &str,
    target_col: i64,
    target_row: i64,
    columns: u32,
) -> Result<Vec<GridItem>, GridError> {
    ensure_unique_ids(items)?;
    let source = items
        .iter()
        .find(|item| item.id == moved_id)
        .map(|item| item.position)
        .ok_or_else(|| GridError::UnknownItem(moved_id.to_string()))?;
    let target = GridPosition::clamped(target_col, target_row, columns);

    let mut next = items.to_vec();
    if target == source {
        return Ok(next);
    }
    for item in &mut next {
        if item.id == moved_id {
            item.position = target;
        } else if item.position == target {
            item.position = source;
        }
    }
    Ok(next)
}

/// Shifts every item in `ids` by the same cell delta, then snaps each one to the nearest free
/// cell. Items outside `ids` never move.
///
/// # Errors
///
/// Returns [`GridError::DuplicateId`] for repeated ids.
pub fn move_group(
    items: &[GridItem],
    ids: &BTreeSet<String>,
    dcol: i64,
    drow: i64,
    columns: u32,
) -> Result<Vec<GridItem>, GridError> {
    ensure_unique_ids(items)?;
    let mut occupied: HashSet<GridPosition> = items
        .iter()
        .filter(|item| !ids.contains(&item.id))
        .map(|item| item.position)
        .collect();

    let mut next = items.to_vec();
    for item in next.iter_mut().filter(|item| ids.contains(&item.id)) {
        let desired = item.position.offset(dcol, drow, columns);
        let snapped = find_nearest_free(desired, &occupied, columns);
        occupied.insert(snapped);
        item.position = snapped;
    }
    Ok(next)
}

/// Breadth-first search outward from `target` across the 8 neighbouring cells for a cell not in
/// `occupied`. Columns are bounded by `columns`; rows are unbounded, so a cell is always found.
pub fn find_nearest_free(
    target: GridPosition,
    occupied: &HashSet<GridPosition>,
    columns: u32,
) -> GridPosition {
    const DIRECTIONS: [(i64, i64); 8] = [
        (0, 1),
        (1, 0),
        (0, -1),
        (-1, 0),
        (1, 1),
        (-1, -1),
        (1, -1),
        (-1, 1),
    ];

    let target = GridPosition::clamped(i64::from(target.col), i64::from(target.row), columns);
    let mut visited = HashSet::from([target]);
    let mut queue = VecDeque::from([target]);
    while let Some(current) = queue.pop_front() {
        if !occupied.contains(&current) {
            return current;
        }
        for (dcol, drow) in DIRECTIONS {
            let col = i64::from(current.col) + dcol;
            let row = i64::from(current.row) + drow;
            if col < 0 || row < 0 || col >= i64::from(columns.max(1)) {
                continue;
            }
            let neighbour = GridPosition::new(col as u32, row as u32);
            if visited.insert(neighbour) {
                queue.push_back(neighbour);
            }
        }
    }
    // Unreachable for finite `occupied`; rows keep growing until a free cell appears.
    target
}

/// Position for a newly added item: column 0 of the row after the lowest occupied row.
pub fn next_available_position(items: &[GridItem]) -> GridPosition {
    items
        .iter()
        .map(|item| item.position.row)
        .max()
        .map(|row| GridPosition::new(0, row.saturating_add(1)))
        .unwrap_or_default()
}

/// Clamps every item into the column range and moves later items out of any cell already
/// claimed by an earlier one. Returns `true` when something moved.
pub fn resolve_overlaps(items: &mut [GridItem], columns: u32) -> bool {
    let mut changed = false;
    let mut claimed = HashSet::with_capacity(items.len());
    for item in items.iter_mut() {
        let clamped = GridPosition::clamped(
            i64::from(item.position.col),
            i64::from(item.position.row),
            columns,
        );
        let free = find_nearest_free(clamped, &claimed, columns);
        if free != item.position {
            item.position = free;
            changed = true;
        }
        claimed.insert(free);
    }
    changed
}

/// Returns `true` when no two items share a cell.
pub fn is_overlap_free(items: &[GridItem]) -> bool {
    let mut seen = HashSet::with_capacity(items.len());
    items.iter().all(|item| seen.insert(item.position))
}
