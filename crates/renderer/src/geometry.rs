use wgpu::util::DeviceExt;

use crate::program::POSITION_LOCATION;

/// Corners of clip space as `(x, y, z)` triples.
pub const QUAD_VERTICES: [f32; 12] = [
    1.0, 1.0, 0.0, //
    1.0, -1.0, 0.0, //
    -1.0, -1.0, 0.0, //
    -1.0, 1.0, 0.0, //
];

/// Two triangles sharing the 1-3 diagonal.
pub const QUAD_INDICES: [u32; 6] = [0, 1, 3, 1, 2, 3];

const POSITION_ATTRIBUTES: [wgpu::VertexAttribute; 1] =
    wgpu::vertex_attr_array![POSITION_LOCATION => Float32x3];

/// Vertex layout for [`QUAD_VERTICES`]: one `vec3` per vertex, tightly packed.
pub fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: (3 * std::mem::size_of::<f32>()) as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &POSITION_ATTRIBUTES,
    }
}

/// The full-screen quad, resident on the GPU.
pub struct Geometry {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

impl Geometry {
    pub fn upload(device: &wgpu::Device) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad vertices"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad indices"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: QUAD_INDICES.len() as u32,
        }
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corner(index: u32) -> (f32, f32) {
        let base = index as usize * 3;
        (QUAD_VERTICES[base], QUAD_VERTICES[base + 1])
    }

    #[test]
    fn quad_covers_clip_space() {
        let mut corners: Vec<_> = (0..4).map(corner).collect();
        corners.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(
            corners,
            vec![(-1.0, -1.0), (-1.0, 1.0), (1.0, -1.0), (1.0, 1.0)]
        );
        assert!(QUAD_VERTICES.chunks(3).all(|vertex| vertex[2] == 0.0));
    }

    #[test]
    fn triangles_share_one_diagonal() {
        let (first, second) = QUAD_INDICES.split_at(3);
        let shared: Vec<_> = first.iter().filter(|index| second.contains(index)).collect();
        assert_eq!(shared, vec![&1, &3]);
        assert!(QUAD_INDICES.iter().all(|&index| index < 4));
    }

    #[test]
    fn layout_matches_vertex_data() {
        let layout = vertex_layout();
        assert_eq!(layout.array_stride, 12);
        assert_eq!(layout.attributes.len(), 1);
        assert_eq!(layout.attributes[0].shader_location, 0);
        assert_eq!(layout.attributes[0].offset, 0);
        assert_eq!(layout.attributes[0].format, wgpu::VertexFormat::Float32x3);
    }

    #[test]
    fn geometry_bytes_are_stable() {
        let first: &[u8] = bytemuck::cast_slice(&QUAD_VERTICES);
        let second: &[u8] = bytemuck::cast_slice(&QUAD_VERTICES);
        assert_eq!(first, second);
        assert_eq!(first.len(), 48);
        assert_eq!(bytemuck::cast_slice::<u32, u8>(&QUAD_INDICES).len(), 24);
    }
}
