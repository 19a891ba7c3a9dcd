use crate::components::entity::Entity;
use crate::renderer::shape_instance::{ShapeBuffer, ShapeInstance};

/// Build the shape buffer from a set of entities.
/// Inactive and shapeless entities are skipped; the rest are ordered by layer,
/// keeping scene order within a layer.
pub fn build_shape_buffer<'a>(entities: impl Iterator<Item = &'a Entity>, buffer: &mut ShapeBuffer) {
    buffer.clear();

    let mut drawable: Vec<(u8, ShapeInstance)> = entities
        .filter(|e| e.active)
        .filter_map(|e| {
            let shape = e.shape.as_ref()?;
            Some((shape.layer, ShapeInstance::from_component(e.pos, e.rotation, shape)))
        })
        .collect();

    drawable.sort_by_key(|(layer, _)| *layer);

    for (_, instance) in drawable {
        buffer.push(instance);
    }
}
