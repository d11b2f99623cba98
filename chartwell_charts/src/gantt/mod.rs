// Copyright 2025 the Chartwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gantt charts: the task tree, row bookkeeping and the editable timeline.

mod connector;
mod controller;
mod data;
mod edit;
mod layout;
mod timeline;

pub use connector::{ARROW_MARGIN, ARROW_SIZE, ArrowOrientation, ConnectorEnd, Route, route};
pub use controller::{Row, RowsController};
pub use data::{
    AutoValues, Connector, ConnectorType, ItemId, ItemShape, LegacyConnector,
    ParseConnectorTypeError, Period, ProjectItemInfo, TaskItem, TaskTree, TreeError,
    parse_progress,
};
pub use edit::{
    AUTO_SCROLL_INSIDE_MARGIN, AUTO_SCROLL_PIXELS, AUTO_SCROLL_STEP_MS, AutoScroll, BarKind,
    CONNECTOR_HANDLE_RADIUS, DragSession, EditControls, EditError, EditHandle, EditOutcome,
    EditTarget, Gesture, PROGRESS_THUMB_SIZE, THUMB_WIDTH,
};
pub use layout::{BAR_HEIGHT_RATIO, PARENT_HEIGHT_RATIO, RowFrame};
pub use timeline::{BAR_SLOTS, CONNECTOR_MARKS, EDIT_MARKS, Timeline, TimelineBar};
