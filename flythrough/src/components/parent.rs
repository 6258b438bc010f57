use hecs::Entity;

/// Component added to indicate that an entity has a parent
/// The entity's [`super::LocalTransform`] is then relative to its parent.
/// Used by [`crate::systems::update_global_transform_system`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parent(pub Entity);
