//! UV-sphere mesh for the globe.
//!
//! Vertex layout follows the classic latitude/longitude sphere: rows from
//! the north pole (v = 0) to the south pole (v = 1), each row holding
//! `width_segments + 1` vertices so the texture seam gets its own column.

use std::f32::consts::PI;

use crate::options::EarthOptions;

/// Vertex for the lit, textured Earth mesh.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct EarthVertex {
    /// Object-space position.
    pub position: [f32; 3],
    /// Unit outward normal.
    pub normal: [f32; 3],
    /// Equirectangular texture coordinate, origin at the top-left.
    pub uv: [f32; 2],
}

impl EarthVertex {
    /// Vertex buffer layout matching `earth.wgsl`.
    #[must_use]
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<EarthVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 0,
                    shader_location: 0,
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 12,
                    shader_location: 1,
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x2,
                    offset: 24,
                    shader_location: 2,
                },
            ],
        }
    }
}

/// Indexed triangle mesh.
#[derive(Debug, Clone, Default)]
pub struct SphereMesh {
    /// Vertices, row-major from north to south.
    pub vertices: Vec<EarthVertex>,
    /// Counter-clockwise triangle indices.
    pub indices: Vec<u32>,
}

impl SphereMesh {
    /// Build a sphere of `radius` with the given segment counts. Segment
    /// counts below 3 (width) and 2 (height) are raised to those minimums.
    #[must_use]
    pub fn new(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        let width = width_segments.max(3);
        let height = height_segments.max(2);

        let mut vertices =
            Vec::with_capacity(((width + 1) * (height + 1)) as usize);
        for iy in 0..=height {
            let v = iy as f32 / height as f32;
            // Pole vertices sit halfway across their segment so the
            // triangle fan samples the texture evenly.
            let u_offset = if iy == 0 {
                0.5 / width as f32
            } else if iy == height {
                -0.5 / width as f32
            } else {
                0.0
            };

            for ix in 0..=width {
                let u = ix as f32 / width as f32;
                let (sin_phi, cos_phi) = (u * 2.0 * PI).sin_cos();
                let (sin_theta, cos_theta) = (v * PI).sin_cos();

                let normal = [-cos_phi * sin_theta, cos_theta, sin_phi * sin_theta];
                vertices.push(EarthVertex {
                    position: normal.map(|c| c * radius),
                    normal,
                    uv: [u + u_offset, v],
                });
            }
        }

        let row = width + 1;
        let mut indices =
            Vec::with_capacity((6 * width * (height - 1)) as usize);
        for iy in 0..height {
            for ix in 0..width {
                let a = iy * row + ix + 1;
                let b = iy * row + ix;
                let c = (iy + 1) * row + ix;
                let d = (iy + 1) * row + ix + 1;
                if iy != 0 {
                    indices.extend_from_slice(&[a, b, d]);
                }
                if iy != height - 1 {
                    indices.extend_from_slice(&[b, c, d]);
                }
            }
        }

        Self { vertices, indices }
    }
}

/// The globe: a static textured sphere.
#[derive(Debug, Clone)]
pub struct Earth {
    /// Sphere radius in world units.
    pub radius: f32,
    /// Geometry uploaded once at startup.
    pub mesh: SphereMesh,
}

impl Earth {
    /// Build the globe geometry from options.
    #[must_use]
    pub fn new(options: &EarthOptions) -> Self {
        Self {
            radius: options.radius,
            mesh: SphereMesh::new(
                options.radius,
                options.width_segments,
                options.height_segments,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    #[test]
    fn vertex_is_32_bytes() {
        assert_eq!(size_of::<EarthVertex>(), 32);
    }

    #[test]
    fn default_globe_counts() {
        let earth = Earth::new(&EarthOptions::default());
        assert_eq!(earth.mesh.vertices.len(), 65 * 65);
        // Pole rows contribute one triangle per segment, others two.
        assert_eq!(earth.mesh.indices.len(), 6 * 64 * 63);
    }

    #[test]
    fn vertices_lie_on_the_sphere() {
        let mesh = SphereMesh::new(2.0, 16, 8);
        for v in &mesh.vertices {
            let p = Vec3::from_array(v.position);
            assert!((p.length() - 2.0).abs() < 1e-5);
            let n = Vec3::from_array(v.normal);
            assert!((n.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn indices_are_in_range() {
        let mesh = SphereMesh::new(1.0, 12, 6);
        let count = mesh.vertices.len() as u32;
        assert!(mesh.indices.iter().all(|&i| i < count));
        assert_eq!(mesh.indices.len() % 3, 0);
    }

    #[test]
    fn triangles_face_outward() {
        let mesh = SphereMesh::new(1.0, 16, 8);
        for tri in mesh.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]]
                .map(|i| Vec3::from_array(mesh.vertices[i as usize].position));
            let face_normal = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            assert!(face_normal.dot(centroid) > 0.0);
        }
    }

    #[test]
    fn poles_are_on_the_y_axis() {
        let mesh = SphereMesh::new(1.0, 8, 4);
        assert!((mesh.vertices[0].position[1] - 1.0).abs() < 1e-6);
        let last = mesh.vertices.last().unwrap();
        assert!((last.position[1] + 1.0).abs() < 1e-6);
    }

    #[test]
    fn tiny_segment_counts_are_raised() {
        let mesh = SphereMesh::new(1.0, 0, 0);
        assert_eq!(mesh.vertices.len(), 4 * 3);
    }
}
