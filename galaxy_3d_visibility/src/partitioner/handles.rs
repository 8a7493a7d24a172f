/// Object handles stored by the partitioners.
///
/// The caller's stage owns the objects and allocates their keys from its own
/// `SlotMap`s; the partitioner only stores and returns the keys.

use std::fmt;
use slotmap::new_key_type;

// ===== SLOT MAP KEYS =====

new_key_type! {
    /// Stable key for an actor (a movable mesh instance).
    pub struct ActorKey;

    /// Stable key for a light.
    pub struct LightKey;

    /// Stable key for a static geometry chunk.
    pub struct GeomKey;

    /// Stable key for a particle system.
    pub struct ParticleSystemKey;
}

// ===== NODE KINDS =====

bitflags::bitflags! {
    /// Object kinds a frustum query should return.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct NodeKinds: u8 {
        const ACTOR           = 0b0000_0001;
        const LIGHT           = 0b0000_0010;
        const GEOM            = 0b0000_0100;
        const PARTICLE_SYSTEM = 0b0000_1000;

        /// Everything that produces draw calls
        const RENDERABLE = Self::ACTOR.bits() | Self::GEOM.bits() | Self::PARTICLE_SYSTEM.bits();
    }
}

// ===== STAGE NODE =====

/// Any object a partitioner can index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StageNode {
    Actor(ActorKey),
    Light(LightKey),
    Geom(GeomKey),
    ParticleSystem(ParticleSystemKey),
}

impl StageNode {
    pub fn kind(&self) -> NodeKinds {
        match self {
            StageNode::Actor(_) => NodeKinds::ACTOR,
            StageNode::Light(_) => NodeKinds::LIGHT,
            StageNode::Geom(_) => NodeKinds::GEOM,
            StageNode::ParticleSystem(_) => NodeKinds::PARTICLE_SYSTEM,
        }
    }

    /// The renderable handle for this node, `None` for lights.
    pub fn renderable(&self) -> Option<RenderableHandle> {
        match *self {
            StageNode::Actor(key) => Some(RenderableHandle::Actor(key)),
            StageNode::Geom(key) => Some(RenderableHandle::Geom(key)),
            StageNode::ParticleSystem(key) => Some(RenderableHandle::ParticleSystem(key)),
            StageNode::Light(_) => None,
        }
    }

    pub fn light(&self) -> Option<LightKey> {
        match *self {
            StageNode::Light(key) => Some(key),
            _ => None,
        }
    }
}

impl fmt::Display for StageNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageNode::Actor(key) => write!(f, "Actor({:?})", key),
            StageNode::Light(key) => write!(f, "Light({:?})", key),
            StageNode::Geom(key) => write!(f, "Geom({:?})", key),
            StageNode::ParticleSystem(key) => write!(f, "ParticleSystem({:?})", key),
        }
    }
}

impl From<ActorKey> for StageNode {
    fn from(key: ActorKey) -> Self {
        StageNode::Actor(key)
    }
}

impl From<LightKey> for StageNode {
    fn from(key: LightKey) -> Self {
        StageNode::Light(key)
    }
}

impl From<GeomKey> for StageNode {
    fn from(key: GeomKey) -> Self {
        StageNode::Geom(key)
    }
}

impl From<ParticleSystemKey> for StageNode {
    fn from(key: ParticleSystemKey) -> Self {
        StageNode::ParticleSystem(key)
    }
}

/// Something the renderer draws: what `geometry_visible_from` returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RenderableHandle {
    Actor(ActorKey),
    Geom(GeomKey),
    ParticleSystem(ParticleSystemKey),
}

/// Whether an object goes through the spatial index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CullingMode {
    /// Indexed and frustum culled
    #[default]
    Dynamic,
    /// Always visible (directional lights, skyboxes...)
    Never,
}

#[cfg(test)]
#[path = "handles_tests.rs"]
mod tests;
