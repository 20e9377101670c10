//! Tool registry: maps toolbar identifiers to construction factories.

use crate::construct::{Construction, PointConstruction, RectangleConstruction, SceneError};
use crate::engine::Engine;
use crate::surface::{GroupId, Surface};
use indexmap::IndexMap;
use log::info;

type ConstructionFactory = Box<dyn Fn(GroupId) -> Construction>;

/// Registry the toolbar glue drives: activating a tool builds a
/// construction bound to the root plane's group and enqueues it.
#[derive(Default)]
pub struct ToolRegistry {
    tools: IndexMap<String, ConstructionFactory>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in point and rectangle tools.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("point", |group| {
            Construction::Point(PointConstruction::new(group))
        });
        registry.register("rectangle", |group| {
            Construction::Rectangle(RectangleConstruction::new(group))
        });
        registry
    }

    pub fn register(
        &mut self,
        id: impl Into<String>,
        factory: impl Fn(GroupId) -> Construction + 'static,
    ) {
        self.tools.insert(id.into(), Box::new(factory));
    }

    /// Registered identifiers, in registration order.
    pub fn tool_ids(&self) -> impl Iterator<Item = &str> {
        self.tools.keys().map(String::as_str)
    }

    /// Build the tool's construction and enqueue it as a drawing task.
    pub fn activate<S: Surface>(
        &self,
        engine: &mut Engine<S>,
        tool: &str,
    ) -> Result<(), SceneError> {
        let factory = self
            .tools
            .get(tool)
            .ok_or_else(|| SceneError::UnknownTool(tool.to_string()))?;
        let construction = factory(engine.plane_group());
        info!("tool '{tool}' activated, construction enqueued");
        engine.enqueue_task(construction);
        Ok(())
    }
}
