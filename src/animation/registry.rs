//! Update list and click dispatch table for animated objects
//!
//! The render loop iterates the registry once per frame instead of each
//! object scheduling its own callback, and the input layer looks controllers
//! up by render-object id when a click lands on an object.

use std::collections::HashMap;

use log::trace;

use crate::gfx::scene::{object::ObjectId, scene::Scene};

use super::controller::{AnimatedObjectController, FrameUpdate};

/// Controllers in registration order, plus an id lookup table
#[derive(Debug, Default)]
pub struct AnimationRegistry {
    entries: Vec<(ObjectId, AnimatedObjectController)>,
    dispatch: HashMap<ObjectId, usize>,
}

impl AnimationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a fresh controller to a render object
    ///
    /// Registering an id that is already bound resets its animation state but
    /// keeps its position in the update order.
    pub fn register(&mut self, object_id: ObjectId) -> &mut AnimatedObjectController {
        let index = match self.dispatch.get(&object_id) {
            Some(&index) => {
                self.entries[index].1 = AnimatedObjectController::new();
                index
            }
            None => {
                self.entries
                    .push((object_id, AnimatedObjectController::new()));
                let index = self.entries.len() - 1;
                self.dispatch.insert(object_id, index);
                index
            }
        };

        &mut self.entries[index].1
    }

    /// Drops the controller bound to a render object that left the scene
    pub fn unregister(&mut self, object_id: ObjectId) -> Option<AnimatedObjectController> {
        let index = self.dispatch.remove(&object_id)?;
        let (_, controller) = self.entries.remove(index);

        for slot in self.dispatch.values_mut() {
            if *slot > index {
                *slot -= 1;
            }
        }

        Some(controller)
    }

    /// Routes an activation to the controller bound to `object_id`
    ///
    /// Returns `false` when nothing is bound to that object.
    pub fn activate(&mut self, object_id: ObjectId) -> bool {
        match self.dispatch.get(&object_id) {
            Some(&index) => {
                self.entries[index].1.on_activate();
                true
            }
            None => false,
        }
    }

    /// Ticks every controller once, in registration order
    pub fn tick_all<F>(&mut self, mut sink: F)
    where
        F: FnMut(ObjectId, FrameUpdate),
    {
        for (object_id, controller) in self.entries.iter_mut() {
            let update = controller.on_frame_tick();
            sink(*object_id, update);
        }
    }

    /// Ticks every controller and writes the results onto the scene objects
    ///
    /// Objects that are not in the scene yet have nothing to receive the
    /// update, so their transform is skipped for this tick.
    pub fn apply_to_scene(&mut self, scene: &mut Scene) {
        self.tick_all(|object_id, update| match scene.object_mut(object_id) {
            Some(object) => object.apply_animation(update),
            None => trace!("no render object attached to {object_id:?}, skipping tick"),
        });
    }

    pub fn get(&self, object_id: ObjectId) -> Option<&AnimatedObjectController> {
        self.dispatch
            .get(&object_id)
            .map(|&index| &self.entries[index].1)
    }

    pub fn contains(&self, object_id: ObjectId) -> bool {
        self.dispatch.contains_key(&object_id)
    }

    /// Ids of all bound objects, in update order
    pub fn object_ids(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.entries.iter().map(|(id, _)| *id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
