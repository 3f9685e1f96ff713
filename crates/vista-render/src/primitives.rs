//! Vertex layout and generated meshes

use bytemuck::{Pod, Zeroable};
use vista_import::ImportedMesh;

/// A vertex with position, normal, and UV coordinates
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    const ATTRIBS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x3,
        2 => Float32x2,
    ];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// CPU-side indexed triangle mesh
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }
}

impl From<&ImportedMesh> for Mesh {
    fn from(mesh: &ImportedMesh) -> Self {
        let vertices = mesh
            .positions
            .iter()
            .enumerate()
            .map(|(i, &position)| Vertex {
                position,
                normal: mesh.normals.get(i).copied().unwrap_or([0.0; 3]),
                uv: mesh.uvs.get(i).copied().unwrap_or([0.0; 2]),
            })
            .collect();

        Self {
            vertices,
            indices: mesh.indices.clone(),
        }
    }
}

/// UV sphere centered at the origin
pub fn create_sphere_mesh(radius: f32, sectors: u32, stacks: u32) -> Mesh {
    let sectors = sectors.max(3);
    let stacks = stacks.max(2);
    let mut vertices = Vec::with_capacity(((sectors + 1) * (stacks + 1)) as usize);

    for stack in 0..=stacks {
        let v = stack as f32 / stacks as f32;
        let phi = std::f32::consts::PI * v; // 0 at +Y pole
        for sector in 0..=sectors {
            let u = sector as f32 / sectors as f32;
            let theta = std::f32::consts::TAU * u;
            let normal = [phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin()];
            vertices.push(Vertex {
                position: [normal[0] * radius, normal[1] * radius, normal[2] * radius],
                normal,
                uv: [u, v],
            });
        }
    }

    let mut indices = Vec::with_capacity((sectors * stacks * 6) as usize);
    let row = sectors + 1;
    for stack in 0..stacks {
        for sector in 0..sectors {
            let a = stack * row + sector;
            let b = a + row;
            // Skip the degenerate triangle at each pole
            if stack != 0 {
                indices.extend_from_slice(&[a, a + 1, b]);
            }
            if stack != stacks - 1 {
                indices.extend_from_slice(&[a + 1, b + 1, b]);
            }
        }
    }

    Mesh { vertices, indices }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_stride() {
        assert_eq!(std::mem::size_of::<Vertex>(), 32);
        assert_eq!(Vertex::desc().array_stride, 32);
    }

    #[test]
    fn test_sphere_counts() {
        let mesh = create_sphere_mesh(1.0, 16, 8);
        assert_eq!(mesh.vertex_count(), 17 * 9);
        // Two triangles per quad minus one per quad on each pole row
        assert_eq!(mesh.index_count(), (16 * 8 * 2 - 16 * 2) * 3);
        assert!(mesh
            .indices
            .iter()
            .all(|&i| (i as usize) < mesh.vertex_count()));
    }

    #[test]
    fn test_sphere_on_radius() {
        let mesh = create_sphere_mesh(2.5, 12, 6);
        for v in &mesh.vertices {
            let [x, y, z] = v.position;
            let r = (x * x + y * y + z * z).sqrt();
            assert!((r - 2.5).abs() < 1e-4);
            let [nx, ny, nz] = v.normal;
            assert!(((nx * nx + ny * ny + nz * nz).sqrt() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_from_imported_pads_attributes() {
        let imported = ImportedMesh {
            name: "tri".into(),
            positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            normals: vec![],
            uvs: vec![[0.5, 0.5]],
            indices: vec![0, 1, 2],
            material_index: None,
        };
        let mesh = Mesh::from(&imported);
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.vertices[0].uv, [0.5, 0.5]);
        assert_eq!(mesh.vertices[2].uv, [0.0, 0.0]);
        assert_eq!(mesh.vertices[1].normal, [0.0, 0.0, 0.0]);
        assert_eq!(mesh.indices, vec![0, 1, 2]);
    }
}
