#[allow(unused_imports)]
use log::{debug, info, warn};

use crate::{BoundingBox, DomeMaterial, DomeMesh, DomeResult, SunLight};
use serde::Serialize;
use std::collections::BTreeMap;
use std::convert::Infallible;

pub const DOME_OBJECT_NAME: &str = "DomeWithHdri";
pub const SUN_OBJECT_NAME: &str = "HdriSunLight";

/// Receives the value objects of a dome rig and turns them into scene
/// objects.
///
/// Implementations wrap whatever owns the live scene; the geometry and
/// image analysis never touch it directly.
pub trait SceneBuilder {
    type Error;

    fn add_dome(&mut self, mesh: &DomeMesh, material: &DomeMaterial) -> Result<(), Self::Error>;

    fn add_sun(&mut self, sun: &SunLight) -> Result<(), Self::Error>;
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DomeObject {
    pub radius: f64,
    pub floor_height: f64,
    pub vertex_count: usize,
    pub triangle_count: usize,
    pub floor_vertex_count: usize,
    pub bounds: BoundingBox,
    pub material: DomeMaterial,
}

/// Plain record of the objects a rig produced, serializable to JSON.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SceneDescription {
    pub domes: BTreeMap<String, DomeObject>,
    pub lights: BTreeMap<String, SunLight>,
}

impl SceneDescription {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes all domes and lights, like clearing a scene before a rebuild.
    pub fn clear(&mut self) {
        self.domes.clear();
        self.lights.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.domes.is_empty() && self.lights.is_empty()
    }

    pub fn to_json(&self) -> DomeResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl SceneBuilder for SceneDescription {
    type Error = Infallible;

    fn add_dome(&mut self, mesh: &DomeMesh, material: &DomeMaterial) -> Result<(), Infallible> {
        let dome = DomeObject {
            radius: mesh.dome().radius(),
            floor_height: mesh.dome().floor_height(),
            vertex_count: mesh.vertices().len(),
            triangle_count: mesh.triangles().len(),
            floor_vertex_count: mesh.floor_indices().len(),
            bounds: mesh.bounds(),
            material: material.clone(),
        };

        if self.domes.insert(DOME_OBJECT_NAME.to_owned(), dome).is_some() {
            warn!("replacing existing object {}", DOME_OBJECT_NAME);
        }

        Ok(())
    }

    fn add_sun(&mut self, sun: &SunLight) -> Result<(), Infallible> {
        if self.lights.insert(SUN_OBJECT_NAME.to_owned(), *sun).is_some() {
            warn!("replacing existing object {}", SUN_OBJECT_NAME);
        }

        Ok(())
    }
}
