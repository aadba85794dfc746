//! Static spherical collision boundary
//!
//! The tumbler shell is a UV-sphere tessellation converted to a triangle soup
//! (flat vertex array + triangle indices), the shape the physics world treats
//! as an immovable zero-mass body. It is built once at startup and never
//! mutated.
//!
//! Contact queries resolve against the tessellation's inscribed radius - the
//! minimum distance from the center to any triangle plane - so the effective
//! shell matches the faceted mesh rather than the ideal sphere, and a ball can
//! never tunnel between triangles.

use glam::Vec3;

use super::SimError;

/// Contact between a ball and the boundary shell
#[derive(Debug, Clone, Copy)]
pub struct BoundaryContact {
    /// Unit normal at the contact, pointing inward (toward the center)
    pub normal: Vec3,
    /// How far the ball surface has passed the shell
    pub penetration: f32,
}

/// Immutable triangulated sphere shell
#[derive(Debug, Clone)]
pub struct CollisionBoundary {
    radius: f32,
    vertices: Vec<Vec3>,
    /// Triangle indices, three per face
    indices: Vec<u32>,
    inscribed_radius: f32,
}

impl CollisionBoundary {
    /// Tessellate a UV sphere of the given radius into a triangle soup.
    ///
    /// Polar rows emit single triangles instead of quads so no degenerate
    /// faces are produced. Fails if the tessellation yields zero triangles.
    pub fn uv_sphere(radius: f32, segments: u32) -> Result<Self, SimError> {
        let seg = segments as usize;
        let mut vertices = Vec::with_capacity((seg + 1) * (seg + 1));

        for iy in 0..=seg {
            let v = iy as f32 / segments.max(1) as f32;
            let phi = v * std::f32::consts::PI;
            for ix in 0..=seg {
                let u = ix as f32 / segments.max(1) as f32;
                let theta = u * std::f32::consts::TAU;
                vertices.push(Vec3::new(
                    radius * phi.sin() * theta.cos(),
                    radius * phi.cos(),
                    radius * phi.sin() * theta.sin(),
                ));
            }
        }

        let row = seg + 1;
        let mut indices: Vec<u32> = Vec::new();
        for iy in 0..seg {
            for ix in 0..seg {
                let a = (iy * row + ix + 1) as u32;
                let b = (iy * row + ix) as u32;
                let c = ((iy + 1) * row + ix) as u32;
                let d = ((iy + 1) * row + ix + 1) as u32;

                // Top cap row collapses (a, b) to the pole; bottom row (c, d)
                if iy != 0 {
                    indices.extend_from_slice(&[a, b, d]);
                }
                if iy != seg - 1 {
                    indices.extend_from_slice(&[b, c, d]);
                }
            }
        }

        if indices.is_empty() {
            return Err(SimError::DegenerateBoundary { segments });
        }

        let inscribed_radius = Self::measure_inscribed_radius(&vertices, &indices, radius);

        Ok(Self {
            radius,
            vertices,
            indices,
            inscribed_radius,
        })
    }

    /// Minimum distance from the center to any triangle plane.
    fn measure_inscribed_radius(vertices: &[Vec3], indices: &[u32], radius: f32) -> f32 {
        let mut min_dist = radius;
        for tri in indices.chunks_exact(3) {
            let v0 = vertices[tri[0] as usize];
            let v1 = vertices[tri[1] as usize];
            let v2 = vertices[tri[2] as usize];
            let n = (v1 - v0).cross(v2 - v0);
            let len = n.length();
            if len < 1e-6 {
                continue; // collapsed polar edge, contributes no plane
            }
            let dist = (n / len).dot(v0).abs();
            if dist < min_dist {
                min_dist = dist;
            }
        }
        min_dist
    }

    /// Nominal sphere radius the tessellation was built from
    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Effective collision radius (distance to the nearest triangle plane)
    #[inline]
    pub fn inscribed_radius(&self) -> f32 {
        self.inscribed_radius
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Maximum distance a ball center of the given radius may sit from the center
    #[inline]
    pub fn containment_radius(&self, ball_radius: f32) -> f32 {
        self.inscribed_radius - ball_radius
    }

    /// Contact between a ball and the shell interior, if any.
    pub fn contact(&self, pos: Vec3, ball_radius: f32) -> Option<BoundaryContact> {
        let dist = pos.length();
        if dist < 1e-6 {
            return None;
        }
        let limit = self.containment_radius(ball_radius);
        if dist <= limit {
            return None;
        }
        Some(BoundaryContact {
            normal: -pos / dist,
            penetration: dist - limit,
        })
    }
}
