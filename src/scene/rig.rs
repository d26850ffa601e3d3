#[allow(unused_imports)]
use log::{debug, info, warn};

use crate::{
    BrightSpot, DomeGeometry, DomeMaterial, DomeMesh, DomeResult, DomeSettings, EnvironmentImage,
    SceneBuilder,
};

/// A built dome together with the sun placed from its environment image.
#[derive(Clone, Debug)]
pub struct DomeRig {
    pub dome: DomeGeometry,
    pub mesh: DomeMesh,
    pub material: DomeMaterial,
    /// Absent when the dome was built without an environment image.
    pub bright_spot: Option<BrightSpot>,
}

impl DomeRig {
    /// Runs the whole pipeline: sphere, floor, floor edits, material and,
    /// given an image, the brightest spot and its sun.
    pub fn build(image: Option<&EnvironmentImage>, settings: &DomeSettings) -> DomeResult<Self> {
        settings.validate()?;

        let dome = DomeGeometry::new(settings.radius)?;

        let mut mesh = DomeMesh::uv_sphere(&dome, settings.segments, settings.rings)?;
        mesh.flatten_floor();

        if let Some(punches) = &settings.floor_punches {
            mesh.punch_floor(punches)?;
        }

        if let Some(basin) = &settings.floor_basin {
            mesh.raise_floor_region(basin);
        }

        let material = DomeMaterial::for_dome(&dome, settings.emission_strength, image.is_some());

        if image.is_none() {
            warn!("no environment image, dome uses its fallback color and gets no sun");
        }

        let bright_spot = image.map(|image| BrightSpot::locate(image, &dome));

        info!(
            "built dome of radius {} m ({} vertices, {} on the floor)",
            dome.radius(),
            mesh.vertices().len(),
            mesh.floor_indices().len()
        );

        Ok(Self {
            dome,
            mesh,
            material,
            bright_spot,
        })
    }

    /// Hands the dome and, if any, its sun to a scene builder.
    pub fn apply<B: SceneBuilder>(&self, builder: &mut B) -> Result<(), B::Error> {
        builder.add_dome(&self.mesh, &self.material)?;

        if let Some(spot) = &self.bright_spot {
            builder.add_sun(&spot.light)?;
        }

        Ok(())
    }
}
