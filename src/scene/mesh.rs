#[allow(unused_imports)]
use log::{debug, info, warn};

use crate::{BoundingBox, DomeError, DomeGeometry, DomeResult, FloorBasin, FloorPunches};
use cgmath::prelude::*;
use cgmath::{Point3, Vector3};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use std::f64::consts::PI;

/// Triangle mesh of the dome, built as a UV sphere and then flattened.
///
/// Vertex layout: the top pole, then `rings - 1` latitude loops of
/// `segments` vertices each from top to bottom, then the bottom pole.
#[derive(Clone, Debug)]
pub struct DomeMesh {
    dome: DomeGeometry,
    vertices: Vec<Point3<f64>>,
    triangles: Vec<[u32; 3]>,
    floor: Vec<usize>,
}

impl DomeMesh {
    pub fn uv_sphere(dome: &DomeGeometry, segments: u32, rings: u32) -> DomeResult<Self> {
        if segments < 3 || rings < 3 {
            return Err(DomeError::settings(format!(
                "UV sphere needs at least 3 segments and 3 rings, got {} and {}",
                segments, rings
            )));
        }

        let vertex_count = sphere_vertex_count(segments, rings).ok_or_else(|| {
            DomeError::settings(format!(
                "a UV sphere with {} segments and {} rings has too many vertices",
                segments, rings
            ))
        })?;

        let radius = dome.radius();
        let loops = rings - 1;

        let mut vertices = Vec::with_capacity(vertex_count as usize);

        vertices.push(Point3::new(0.0, 0.0, radius));

        for ring in 1..rings {
            let theta = PI * f64::from(ring) / f64::from(rings);

            for segment in 0..segments {
                let phi = 2.0 * PI * f64::from(segment) / f64::from(segments);

                vertices.push(Point3::new(
                    radius * theta.sin() * phi.cos(),
                    radius * theta.sin() * phi.sin(),
                    radius * theta.cos(),
                ));
            }
        }

        vertices.push(Point3::new(0.0, 0.0, -radius));

        let top = 0;
        let bottom = 1 + loops * segments;
        let at = |ring: u32, segment: u32| 1 + ring * segments + segment % segments;

        let mut triangles = Vec::with_capacity(2 * segments as usize * loops as usize);

        for segment in 0..segments {
            triangles.push([top, at(0, segment), at(0, segment + 1)]);
        }

        for ring in 0..loops - 1 {
            for segment in 0..segments {
                let a = at(ring, segment);
                let b = at(ring, segment + 1);
                let c = at(ring + 1, segment + 1);
                let d = at(ring + 1, segment);

                triangles.push([a, d, c]);
                triangles.push([a, c, b]);
            }
        }

        for segment in 0..segments {
            triangles.push([bottom, at(loops - 1, segment + 1), at(loops - 1, segment)]);
        }

        debug!(
            "UV sphere of radius {} with {} vertices and {} triangles",
            radius,
            vertices.len(),
            triangles.len()
        );

        Ok(Self {
            dome: *dome,
            vertices,
            triangles,
            floor: Vec::new(),
        })
    }

    /// Moves every vertex at or below the floor height onto the floor.
    ///
    /// The moved vertices become the floor set used by later floor edits.
    /// Returns how many vertices were flattened.
    pub fn flatten_floor(&mut self) -> usize {
        let dome = self.dome;
        let floor_height = dome.floor_height();

        self.floor.clear();

        for (index, vertex) in self.vertices.iter_mut().enumerate() {
            if dome.is_on_or_below_floor(*vertex) {
                *vertex = dome.flatten(*vertex);
                self.floor.push(index);
            }
        }

        debug!(
            "flattened {} vertices onto the floor at z = {}",
            self.floor.len(),
            floor_height
        );

        self.floor.len()
    }

    /// Proportional edit: translates one vertex and drags its neighbors.
    ///
    /// Vertices within `falloff_radius` of the target move by the offset
    /// scaled with a smooth `3t^2 - 2t^3` falloff.
    pub fn punch(
        &mut self,
        vertex: usize,
        offset: Vector3<f64>,
        falloff_radius: f64,
    ) -> DomeResult<()> {
        let center = *self.vertices.get(vertex).ok_or_else(|| {
            DomeError::settings(format!(
                "vertex {} is out of range ({} vertices)",
                vertex,
                self.vertices.len()
            ))
        })?;

        for (index, point) in self.vertices.iter_mut().enumerate() {
            let weight = if index == vertex {
                1.0
            } else {
                smooth_falloff(point.distance(center), falloff_radius)
            };

            if weight > 0.0 {
                *point = *point + offset * weight;
            }
        }

        Ok(())
    }

    /// Punches randomly chosen floor vertices upward.
    ///
    /// The selection is reproducible for a given seed. Returns the number of
    /// punches applied.
    pub fn punch_floor(&mut self, punches: &FloorPunches) -> DomeResult<usize> {
        if self.floor.is_empty() {
            warn!("no floor vertices to punch, flatten the floor first");
            return Ok(0);
        }

        if self.floor.len() < punches.count {
            warn!(
                "only {} floor vertices for {} punches, punching all of them",
                self.floor.len(),
                punches.count
            );
        }

        let mut rng = ChaCha20Rng::seed_from_u64(punches.seed);

        let targets: Vec<usize> = self
            .floor
            .choose_multiple(&mut rng, punches.count)
            .cloned()
            .collect();

        for &target in &targets {
            self.punch(target, Vector3::unit_z() * punches.height, punches.radius)?;
        }

        info!(
            "applied {} floor punches (height {}, radius {})",
            targets.len(),
            punches.height,
            punches.radius
        );

        Ok(targets.len())
    }

    /// Shifts floor vertices strictly inside the basin region vertically.
    pub fn raise_floor_region(&mut self, basin: &FloorBasin) -> usize {
        if self.floor.is_empty() {
            warn!("no floor vertices to raise, flatten the floor first");
            return 0;
        }

        let mut modified = 0;

        for &index in &self.floor {
            let vertex = &mut self.vertices[index];

            if basin.contains(vertex.x, vertex.y) {
                vertex.z += basin.height;
                modified += 1;
            }
        }

        debug!(
            "moved {} floor vertices by {} within {:?}",
            modified, basin.height, basin.region
        );

        modified
    }

    pub fn dome(&self) -> &DomeGeometry {
        &self.dome
    }

    pub fn vertices(&self) -> &[Point3<f64>] {
        &self.vertices
    }

    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    pub fn floor_indices(&self) -> &[usize] {
        &self.floor
    }

    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::from_points(self.vertices.iter().copied())
    }
}

/// Vertex count of a UV sphere, `None` when it cannot be indexed with `u32`.
pub fn sphere_vertex_count(segments: u32, rings: u32) -> Option<u32> {
    rings
        .checked_sub(1)?
        .checked_mul(segments)?
        .checked_add(2)
}

/// Smooth proportional-editing weight, 1 at the center and 0 at the radius.
pub fn smooth_falloff(distance: f64, radius: f64) -> f64 {
    if radius <= 0.0 || distance >= radius {
        return 0.0;
    }

    let t = 1.0 - distance / radius;

    3.0 * t * t - 2.0 * t * t * t
}
