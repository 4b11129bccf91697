//! # trellis-tui
//!
//! A widget runtime core for terminal dashboards.
//!
//! trellis-tui gives every widget the same four pieces of plumbing: props
//! validated against a declared schema, styles resolved by a deterministic
//! cascade over theme tokens, a lifecycle that guarantees cleanup, and a
//! per-instance event bus. Widgets describe themselves with the
//! [`Component`](widget::Component) trait and are mounted on a
//! [`Surface`](surface::Surface) through [`Widget`](widget::Widget).
//!
//! ## Core Systems
//!
//! - **[`schema`]** — Field descriptors, component schemas, registry, validation
//! - **[`props`]** — Dynamic prop values and bags
//! - **[`style`]** — Style records, themes, declaration text, the cascade resolver
//! - **[`widget`]** — Component trait, lifecycle tracking, mounted instances
//! - **[`widgets`]** — Built-in widgets: StatusIndicator, LogViewer, AgentList
//! - **[`event`]** — Per-instance event bus and terminal input types
//! - **[`timer`]** — Virtual-clock scheduler for refresh intervals
//! - **[`surface`]** — Surface trait and the headless element arena
//! - **[`render`]** — Strip painting, frame diffing, crossterm driver
//! - **[`app`]** — Application struct tying everything together
//! - **[`testing`]** — Headless pilot and snapshot helpers
//! - **[`geometry`]** — Region primitive

// Foundation
pub mod error;
pub mod geometry;
pub mod props;

// Core systems
pub mod schema;
pub mod style;

// Widget system
pub mod widget;
pub mod widgets;

// Events and time
pub mod event;
pub mod timer;

// Rendering
pub mod render;
pub mod surface;

// Application
pub mod app;
pub mod testing;

pub use app::{App, AppConfig};
pub use error::{ConfigError, SchemaError, ValidationError, WidgetError};
pub use event::{EventBus, Key, KeyEvent, ListenerId, MouseEvent, WidgetEvent};
pub use props::{Callback, PropValue, Props};
pub use schema::{
    validate, ComponentSchema, FieldDescriptor, FieldKind, SchemaRegistry, ValidationIssue,
    ValidationResult,
};
pub use style::{
    apply_in_order, resolve_style, Axes, Axis, Border, BorderKind, Padding, PartTable,
    ResolvedStyle, StyleLayer, StyleRecord, TextAlign, Theme,
};
pub use surface::{ElementId, HeadlessSurface, Surface, SurfaceHandle};
pub use timer::{Scheduler, TimerHandle};
pub use widget::{Component, Env, LifecycleState, Mutation, Widget};
pub use widgets::{AgentList, LogViewer, StatusIndicator};
