use hecs::World;

use crate::components::{GlobalTransform, LocalTransform, Parent};

/// Update global transform system
/// Walks through each entity with a [`LocalTransform`] and works out where it is in global
/// space, taking its chain of [`Parent`]s into account
pub fn update_global_transform_system(world: &mut World) {
    // Roots of the hierarchy: global space is just their local space.
    for (_, (local_transform, global_transform)) in world
        .query::<(&LocalTransform, &mut GlobalTransform)>()
        .without::<&Parent>()
        .iter()
    {
        global_transform.0 = local_transform.to_affine();
    }

    // Views give cheap random access to the rest of the hierarchy while we walk it.
    let mut parents = world.query::<(&Parent, &LocalTransform)>();
    let parents = parents.view();
    let mut roots = world.query::<&LocalTransform>().without::<&Parent>();
    let roots = roots.view();

    for (_, (parent, local_transform, global_transform)) in world
        .query::<(&Parent, &LocalTransform, &mut GlobalTransform)>()
        .iter()
    {
        let mut relative = local_transform.to_affine();
        let mut ancestor = parent.0;
        while let Some((next, ancestor_transform)) = parents.get(ancestor) {
            relative = ancestor_transform.to_affine() * relative;
            ancestor = next.0;
        }
        // An orphan (its root was despawned) keeps whatever it had last frame.
        if let Some(root) = roots.get(ancestor) {
            global_transform.0 = root.to_affine() * relative;
        }
    }
}
