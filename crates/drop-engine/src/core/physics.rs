//! Rapier2D behind a small surface: a fixed arena, falling pieces and a contact log.

use glam::Vec2;
use rapier2d::prelude::*;
use std::sync::{Mutex, PoisonError};

use crate::api::types::EntityId;

fn vec2_to_na(v: Vec2) -> nalgebra::Vector2<f32> {
    nalgebra::Vector2::new(v.x, v.y)
}

/// The kind of rigid body. Drop games only need falling pieces and a static arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyType {
    Dynamic,
    Fixed,
}

impl BodyType {
    fn to_rapier(self) -> RigidBodyType {
        match self {
            BodyType::Dynamic => RigidBodyType::Dynamic,
            BodyType::Fixed => RigidBodyType::Fixed,
        }
    }
}

/// Shape description for a collider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColliderDesc {
    Ball { radius: f32 },
    Cuboid { half_width: f32, half_height: f32 },
}

impl ColliderDesc {
    fn shape_builder(&self) -> ColliderBuilder {
        match *self {
            ColliderDesc::Ball { radius } => ColliderBuilder::ball(radius),
            ColliderDesc::Cuboid { half_width, half_height } => {
                ColliderBuilder::cuboid(half_width, half_height)
            }
        }
    }
}

/// Physical material properties for a collider.
#[derive(Debug, Clone, Copy)]
pub struct ColliderMaterial {
    pub restitution: f32,
    pub friction: f32,
    pub density: f32,
}

impl ColliderMaterial {
    /// Default material with a custom bounce.
    pub fn bouncy(restitution: f32) -> Self {
        Self {
            restitution,
            ..Self::default()
        }
    }
}

impl Default for ColliderMaterial {
    fn default() -> Self {
        Self {
            restitution: 0.3,
            friction: 0.5,
            density: 1.0,
        }
    }
}

/// A body to create. Bodies always start at rest.
#[derive(Debug, Clone)]
pub struct BodyDesc {
    pub body_type: BodyType,
    pub position: Vec2,
    /// Continuous collision detection, for fast-falling pieces.
    pub ccd: bool,
    pub collider: ColliderDesc,
}

impl BodyDesc {
    pub fn dynamic(collider: ColliderDesc) -> Self {
        Self {
            body_type: BodyType::Dynamic,
            position: Vec2::ZERO,
            ccd: false,
            collider,
        }
    }

    pub fn fixed(collider: ColliderDesc) -> Self {
        Self {
            body_type: BodyType::Fixed,
            ..Self::dynamic(collider)
        }
    }

    pub fn with_position(mut self, pos: Vec2) -> Self {
        self.position = pos;
        self
    }

    pub fn with_ccd(mut self, enabled: bool) -> Self {
        self.ccd = enabled;
        self
    }
}

/// Handle pair stored on an Entity, referencing Rapier internals.
#[derive(Debug, Clone, Copy)]
pub struct PhysicsBody {
    pub body_handle: RigidBodyHandle,
    pub collider_handle: ColliderHandle,
}

/// A contact notification between two entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionPair {
    pub entity_a: EntityId,
    pub entity_b: EntityId,
    /// `true` when the contact just began, `false` when it ended.
    pub started: bool,
}

impl CollisionPair {
    /// Order-independent key for the pair (lower id first).
    pub fn key(&self) -> (EntityId, EntityId) {
        if self.entity_a.0 <= self.entity_b.0 {
            (self.entity_a, self.entity_b)
        } else {
            (self.entity_b, self.entity_a)
        }
    }
}

type ContactEntry = (ColliderHandle, ColliderHandle, bool);

/// Contact begin/end notifications recorded during a step.
/// Rapier reports through `&self`, hence the lock.
#[derive(Default)]
struct ContactLog {
    entries: Mutex<Vec<ContactEntry>>,
}

impl ContactLog {
    fn take(&self) -> Vec<ContactEntry> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *entries)
    }
}

impl EventHandler for ContactLog {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        let entry = (event.collider1(), event.collider2(), event.started());
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry);
    }

    fn handle_contact_force_event(
        &self,
        _dt: f32,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: f32,
    ) {
    }
}

/// The Rapier pipeline and its sets, owned in one place.
pub struct PhysicsWorld {
    gravity: nalgebra::Vector2<f32>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    contacts: ContactLog,
}

impl PhysicsWorld {
    /// `gravity` in units/s², Y pointing down; `dt` is the fixed step in seconds.
    pub fn new(gravity: Vec2, dt: f32) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.dt = dt;
        Self {
            gravity: vec2_to_na(gravity),
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            contacts: ContactLog::default(),
        }
    }

    /// Create a body with one collider. The entity id rides in the body's `user_data`
    /// so contacts can be mapped back to entities.
    pub fn create_body(
        &mut self,
        entity_id: EntityId,
        desc: &BodyDesc,
        material: ColliderMaterial,
    ) -> PhysicsBody {
        let rb = RigidBodyBuilder::new(desc.body_type.to_rapier())
            .translation(vec2_to_na(desc.position))
            .ccd_enabled(desc.ccd)
            .user_data(u128::from(entity_id.0))
            .build();
        let body_handle = self.bodies.insert(rb);

        let collider = desc
            .collider
            .shape_builder()
            .restitution(material.restitution)
            .friction(material.friction)
            .density(material.density)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .build();
        let collider_handle =
            self.colliders
                .insert_with_parent(collider, body_handle, &mut self.bodies);

        PhysicsBody {
            body_handle,
            collider_handle,
        }
    }

    /// Remove a body and its collider. Removing twice is a logged no-op.
    pub fn remove_body(&mut self, body: &PhysicsBody) {
        let removed = self.bodies.remove(
            body.body_handle,
            &mut self.island_manager,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
        if removed.is_none() {
            log::debug!("physics: body {:?} was already removed", body.body_handle);
        }
    }

    /// Advance one fixed step and append the step's contact changes to `out`.
    pub fn step_into(&mut self, out: &mut Vec<CollisionPair>) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &self.contacts,
        );

        for (h1, h2, started) in self.contacts.take() {
            match (self.entity_of(h1), self.entity_of(h2)) {
                (Some(entity_a), Some(entity_b)) => out.push(CollisionPair {
                    entity_a,
                    entity_b,
                    started,
                }),
                // the collider went away during the step
                _ => log::trace!(
                    "physics: skipped {} for a removed collider",
                    if started { "contact start" } else { "contact end" }
                ),
            }
        }
    }

    /// Position and rotation of a body, `None` once it has been removed.
    pub fn pose(&self, body: &PhysicsBody) -> Option<(Vec2, f32)> {
        let iso = self.bodies.get(body.body_handle)?.position();
        Some((
            Vec2::new(iso.translation.x, iso.translation.y),
            iso.rotation.angle(),
        ))
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    fn entity_of(&self, collider: ColliderHandle) -> Option<EntityId> {
        let parent = self.colliders.get(collider)?.parent()?;
        let body = self.bodies.get(parent)?;
        Some(EntityId(body.user_data as u32))
    }
}
