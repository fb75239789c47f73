pub mod apps;
pub mod config;
pub mod desktop_grid;
pub mod geometry;
pub mod grid;
pub mod icon;
pub mod model;
pub mod persistence;
pub mod reducer;
pub mod runtime;
pub mod selection;
pub mod window_geometry;
pub mod window_manager;

pub use apps::{AppDescriptor, AppRegistry};
pub use config::{ConfigError, DesktopConfig, GridSettings, InputSettings, WindowSettings};
pub use desktop_grid::{sort_icons, DesktopEvent, DesktopGrid, PointerButton, PointerInput};
pub use geometry::{Point, Rect, Size};
pub use grid::{GridDimensions, GridError, GridItem, GridPosition};
pub use icon::{IconIntent, RenameKey};
pub use model::*;
pub use persistence::{load_icon_layout, merge_with_defaults, persist_icon_layout};
pub use reducer::{reduce_desktop, DesktopAction, ReducerError, RuntimeEffect};
pub use runtime::DesktopRuntime;
pub use selection::{SelectionBox, SelectionSet};
