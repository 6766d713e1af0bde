//! World wrapper around hecs

use glam::Vec3;
use hecs::Entity;

use super::{Name, SteeringTarget, Transform, Velocity};
use crate::ai::{Agent, ObstacleSensor};

/// Simulation world containing agents, targets and other entities
pub struct World {
    /// The underlying hecs world
    pub inner: hecs::World,
}

impl World {
    /// Create a new empty world
    pub fn new() -> Self {
        Self {
            inner: hecs::World::new(),
        }
    }

    /// Spawn a steered agent with a transform matching its state
    pub fn spawn_agent(&mut self, name: impl Into<String>, agent: Agent) -> Entity {
        let transform = Transform {
            position: agent.state().position(),
            rotation: agent.state().rotation(),
        };
        self.inner.spawn((Name::new(name), transform, agent))
    }

    /// Spawn an unsteered entity drifting at constant velocity
    pub fn spawn_drifter(
        &mut self,
        name: impl Into<String>,
        position: Vec3,
        velocity: Vec3,
    ) -> Entity {
        self.inner.spawn((
            Name::new(name),
            Transform::from_position(position),
            Velocity(velocity),
        ))
    }

    /// Make `agent` track `target`'s transform
    pub fn set_target(&mut self, agent: Entity, target: Entity) -> Result<(), hecs::NoSuchEntity> {
        self.inner.insert_one(agent, SteeringTarget(target))
    }

    /// Despawn an entity
    pub fn despawn(&mut self, entity: Entity) -> Result<(), hecs::NoSuchEntity> {
        self.inner.despawn(entity)
    }

    /// Get a reference to a component
    pub fn get<T: hecs::Component>(
        &self,
        entity: Entity,
    ) -> Result<hecs::Ref<'_, T>, hecs::ComponentError> {
        self.inner.get::<&T>(entity)
    }

    /// Get the number of entities
    pub fn len(&self) -> u32 {
        self.inner.len()
    }

    /// Check if the world is empty
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Move drifting entities
    pub fn update_drifters(&mut self, dt: f32) {
        for (_, (transform, velocity)) in self.inner.query_mut::<(&mut Transform, &Velocity)>() {
            transform.translate(velocity.0 * dt);
        }
    }

    /// Tick every agent once and write the result back to its transform.
    ///
    /// Target positions are sampled before any agent moves. Agents whose
    /// target entity is gone stop tracking it. Returns the number of agents
    /// ticked.
    pub fn update_steering<S: ObstacleSensor + ?Sized>(&mut self, dt: f32, sensor: &S) -> usize {
        let targets: Vec<(Entity, Option<Vec3>)> = self
            .inner
            .query::<&SteeringTarget>()
            .iter()
            .map(|(entity, target)| {
                let position = self
                    .inner
                    .get::<&Transform>(target.0)
                    .ok()
                    .map(|transform| transform.position);
                (entity, position)
            })
            .collect();

        for (entity, position) in targets {
            if position.is_none() {
                log::debug!("Target of {entity:?} is gone");
                let _ = self.inner.remove_one::<SteeringTarget>(entity);
            }
            if let Ok(mut agent) = self.inner.get::<&mut Agent>(entity) {
                match position {
                    Some(position) => agent.track_target(position),
                    None => agent.clear_target(),
                }
            }
        }

        let mut ticked = 0;
        for (_, (agent, transform)) in self.inner.query_mut::<(&mut Agent, &mut Transform)>() {
            agent.tick(dt, sensor);
            transform.position = agent.state().position();
            transform.rotation = agent.state().rotation();
            ticked += 1;
        }
        ticked
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
