//! Static obstacle world using rapier3d

use glam::Vec3;
use rapier3d::prelude::*;

use crate::ai::{ObstacleProbe, ObstacleSensor};
use crate::core::ObstacleShape;

/// Handle to an obstacle body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObstacleHandle(pub RigidBodyHandle);

/// Fixed colliders that agents probe with rays.
///
/// Changes become visible to probes after [`ObstacleWorld::refresh`].
pub struct ObstacleWorld {
    /// Physics pipeline
    pipeline: PhysicsPipeline,
    /// Island manager
    island_manager: IslandManager,
    /// Broad phase
    broad_phase: DefaultBroadPhase,
    /// Narrow phase
    narrow_phase: NarrowPhase,
    /// Rigid body set
    rigid_body_set: RigidBodySet,
    /// Collider set
    collider_set: ColliderSet,
    /// Impulse joint set
    impulse_joint_set: ImpulseJointSet,
    /// Multibody joint set
    multibody_joint_set: MultibodyJointSet,
    /// CCD solver
    ccd_solver: CCDSolver,
    /// Query pipeline for raycasting
    query_pipeline: QueryPipeline,
    /// Integration parameters
    integration_parameters: IntegrationParameters,
}

impl ObstacleWorld {
    /// Create an empty obstacle world
    pub fn new() -> Self {
        Self {
            pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            integration_parameters: IntegrationParameters::default(),
        }
    }

    /// Rebuild the acceleration structures used by probes
    pub fn refresh(&mut self) {
        self.pipeline.step(
            &vector![0.0, 0.0, 0.0],
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    fn insert(&mut self, center: Vec3, collider: Collider) -> ObstacleHandle {
        let body = RigidBodyBuilder::fixed()
            .translation(vector![center.x, center.y, center.z])
            .build();
        let handle = self.rigid_body_set.insert(body);
        self.collider_set
            .insert_with_parent(collider, handle, &mut self.rigid_body_set);
        ObstacleHandle(handle)
    }

    /// Add an axis-aligned box obstacle
    pub fn add_box(&mut self, center: Vec3, half_extents: Vec3) -> ObstacleHandle {
        let collider =
            ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z).build();
        self.insert(center, collider)
    }

    /// Add a sphere obstacle
    pub fn add_sphere(&mut self, center: Vec3, radius: f32) -> ObstacleHandle {
        let collider = ColliderBuilder::ball(radius).build();
        self.insert(center, collider)
    }

    /// Add an obstacle from its scenario description
    pub fn add_shape(&mut self, shape: ObstacleShape) -> ObstacleHandle {
        match shape {
            ObstacleShape::Box {
                center,
                half_extents,
            } => self.add_box(center, half_extents),
            ObstacleShape::Sphere { center, radius } => self.add_sphere(center, radius),
        }
    }

    /// Remove an obstacle and its collider
    pub fn remove(&mut self, obstacle: ObstacleHandle) {
        self.rigid_body_set.remove(
            obstacle.0,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true,
        );
    }

    /// Number of obstacles
    pub fn len(&self) -> usize {
        self.rigid_body_set.len()
    }

    /// Check if there are no obstacles
    pub fn is_empty(&self) -> bool {
        self.rigid_body_set.is_empty()
    }
}

impl Default for ObstacleWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl ObstacleSensor for ObstacleWorld {
    fn probe(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> ObstacleProbe {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO {
            return ObstacleProbe::MISS;
        }

        let ray = Ray::new(
            point![origin.x, origin.y, origin.z],
            vector![direction.x, direction.y, direction.z],
        );

        self.query_pipeline
            .cast_ray_and_get_normal(
                &self.rigid_body_set,
                &self.collider_set,
                &ray,
                max_distance,
                true,
                QueryFilter::default(),
            )
            .map_or(ObstacleProbe::MISS, |(_, intersection)| {
                let normal = intersection.normal;
                let normal = Vec3::new(normal.x, normal.y, normal.z);
                // Rays starting inside a collider report no usable surface
                if intersection.time_of_impact <= 0.0 || normal.length_squared() <= f32::EPSILON {
                    return ObstacleProbe::MISS;
                }
                ObstacleProbe::hit(intersection.time_of_impact, normal)
            })
    }
}
