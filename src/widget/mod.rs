//! Widget runtime: component descriptors, lifecycle, mounted instances.

pub mod component;
pub mod instance;
pub mod lifecycle;

pub use component::{
    Component, KeyBinding, MouseBinding, MouseHit, PartSpec, RenderDegradation, View, NO_DATA,
};
pub use instance::{Env, Mutation, Widget};
pub use lifecycle::{LifecycleState, LifecycleTracker, Transition, HISTORY_LIMIT};
