//! GPU instance records for sprite drawing

use bytemuck::{Pod, Zeroable};

use super::Drawable;

/// One sprite instance, laid out for direct upload into an instance buffer
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct DrawInstance {
    pub position: [f32; 2],
    pub size: [f32; 2],
    pub rotation: f32,
    pub z: f32,
    pub sprite: u32,
    pub frame: u32,
}

impl DrawInstance {
    pub const fn new(x: f32, y: f32, w: f32, h: f32, rotation: f32) -> Self {
        Self {
            position: [x, y],
            size: [w, h],
            rotation,
            z: 0.0,
            sprite: 0,
            frame: 0,
        }
    }
}

impl From<&Drawable> for DrawInstance {
    fn from(d: &Drawable) -> Self {
        Self {
            position: d.position.to_array(),
            size: d.size.to_array(),
            rotation: d.rotation,
            z: d.z,
            sprite: d.sprite as u32,
            frame: d.frame as u32,
        }
    }
}

/// Pack drawables into bytes ready for a vertex/instance buffer
pub fn instance_bytes(drawables: &[Drawable]) -> Vec<u8> {
    let instances: Vec<DrawInstance> = drawables.iter().map(DrawInstance::from).collect();
    bytemuck::cast_slice(&instances).to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::Sprite;
    use glam::Vec2;

    #[test]
    fn test_instance_layout_is_tight() {
        assert_eq!(std::mem::size_of::<DrawInstance>(), 32);
    }

    #[test]
    fn test_instance_bytes() {
        let drawable = Drawable {
            sprite: Sprite::PipeUpper,
            position: Vec2::new(1.0, 2.0),
            size: Vec2::new(52.0, 320.0),
            rotation: 0.5,
            frame: 0,
            z: -10.0,
        };
        let bytes = instance_bytes(&[drawable.clone(), drawable]);
        assert_eq!(bytes.len(), 64);

        let second: DrawInstance = bytemuck::pod_read_unaligned(&bytes[32..]);
        assert_eq!(second.position, [1.0, 2.0]);
        assert_eq!(second.sprite, Sprite::PipeUpper as u32);
        assert_eq!(
            second,
            DrawInstance {
                z: -10.0,
                sprite: Sprite::PipeUpper as u32,
                ..DrawInstance::new(1.0, 2.0, 52.0, 320.0, 0.5)
            }
        );
    }
}
