//! Scene actor bookkeeping
//!
//! The renderer proper lives outside this workspace; the scene here
//! is the viewer-side registry of what would be rendered: per-actor
//! bounds, material, and visibility, plus the union bounding box the
//! camera presets frame against.

use neuroview_core::{Drawable, Material, Point3f};

/// One registered surface: its extent and rendering state.
#[derive(Debug, Clone)]
pub struct SceneActor {
    pub bounds: (Point3f, Point3f),
    pub material: Material,
    pub visible: bool,
}

/// Ordered collection of scene actors.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    actors: Vec<SceneActor>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a drawable; returns its actor index.
    pub fn add_drawable(&mut self, drawable: &impl Drawable, material: Material) -> usize {
        self.actors.push(SceneActor {
            bounds: drawable.bounding_box(),
            material,
            visible: true,
        });
        self.actors.len() - 1
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    pub fn actors(&self) -> &[SceneActor] {
        &self.actors
    }

    pub fn set_visible(&mut self, index: usize, visible: bool) {
        if let Some(actor) = self.actors.get_mut(index) {
            actor.visible = visible;
        }
    }

    /// Union bounding box over the visible actors.
    pub fn bounds(&self) -> Option<(Point3f, Point3f)> {
        let mut result: Option<(Point3f, Point3f)> = None;
        for actor in self.actors.iter().filter(|a| a.visible) {
            let (amin, amax) = actor.bounds;
            result = Some(match result {
                None => (amin, amax),
                Some((mut min, mut max)) => {
                    min.x = min.x.min(amin.x);
                    min.y = min.y.min(amin.y);
                    min.z = min.z.min(amin.z);
                    max.x = max.x.max(amax.x);
                    max.y = max.y.max(amax.y);
                    max.z = max.z.max(amax.z);
                    (min, max)
                }
            });
        }
        result
    }
}
