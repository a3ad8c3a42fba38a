use crate::components::entity::Entity;
use crate::renderer::instance::{RenderBuffer, RenderInstance};

/// Build the render buffer from a set of entities.
/// Entities without a sprite (arena bodies, pieces awaiting the manifest) are skipped.
pub fn build_render_buffer<'a>(entities: impl Iterator<Item = &'a Entity>, buffer: &mut RenderBuffer) {
    buffer.clear();

    for entity in entities {
        let Some(sprite) = &entity.sprite else {
            continue;
        };

        buffer.push(RenderInstance::new(
            entity.pos.x,
            entity.pos.y,
            entity.rotation,
            entity.size,
            sprite.id.0,
            sprite.alpha,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::EntityId;
    use crate::components::sprite::{SpriteComponent, SpriteId};
    use glam::Vec2;

    #[test]
    fn only_sprited_entities_are_emitted() {
        let entities = vec![
            Entity::new(EntityId(1))
                .with_pos(Vec2::new(10.0, 20.0))
                .with_size(60.0)
                .with_sprite(SpriteComponent::new(SpriteId(2))),
            Entity::new(EntityId(2)).with_tag("floor"),
            Entity::new(EntityId(3)).with_tag("piece"),
        ];

        let mut buffer = RenderBuffer::new();
        build_render_buffer(entities.iter(), &mut buffer);

        assert_eq!(buffer.instance_count(), 1);
        let inst = buffer.instances[0];
        assert_eq!((inst.x, inst.y, inst.size, inst.sprite), (10.0, 20.0, 60.0, 2.0));
    }
}
