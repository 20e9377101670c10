//! Sketchplane Core Library
//!
//! Platform-agnostic interaction engine for the sketchplane drawing
//! surface: drawing implements, construction state machines, the scene
//! plane, the task queue and the input dispatcher.

pub mod construct;
pub mod engine;
pub mod event;
pub mod implements;
pub mod queue;
pub mod surface;
pub mod tools;

pub use construct::{
    Construction, ConstructionChange, HIT_TOLERANCE, PlaneConstruction, PointConstruction,
    PointState, RectangleConstruction, RectangleHit, RectangleState, SceneError,
};
pub use engine::Engine;
pub use event::{EventKind, Flow, InputEvent, InputTarget};
pub use implements::{
    Implement, ImplementKind, POINT_RADIUS, PointData, PointImplement, RectData,
    RectangleImplement,
};
pub use queue::{ListenerToken, TaskQueue};
pub use surface::{GroupId, GroupRecord, MemorySurface, NodeAttrs, NodeId, NodeRecord, Surface};
pub use tools::ToolRegistry;
