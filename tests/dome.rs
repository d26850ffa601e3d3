use domelight::{
    scan, BrightSpot, DomeError, DomeGeometry, DomeMesh, DomeRig, DomeSettings, EnvironmentImage,
    FloorBasin, FloorPunches, PixelOrigin, SceneDescription, DOME_OBJECT_NAME, SUN_OBJECT_NAME,
};
use half::f16;
use image::{DynamicImage, ImageFormat, Rgb, Rgb32FImage, RgbImage};
use img2raw::{ColorSpace, DataFormat, Header};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde_json::json;
use std::io::Cursor;
use zerocopy::AsBytes;

fn image_with_blocks(width: u32, height: u32, blocks: &[(u32, u32, f32)]) -> EnvironmentImage {
    let mut pixels = vec![[0.1f32; 3]; (width * height) as usize];

    for &(bx, by, value) in blocks {
        for y in by..by + 4 {
            for x in bx..bx + 4 {
                pixels[(y * width + x) as usize] = [value; 3];
            }
        }
    }

    EnvironmentImage::new(width, height, pixels).expect("failed to create image")
}

/// Header plus RGBA16F texels, held in words so the header stays aligned.
fn raw_asset(color_space: ColorSpace, data_format: DataFormat, texels: &[[f32; 4]]) -> Vec<u32> {
    let header = Header {
        color_space: color_space.into(),
        data_format: data_format.into(),
        dimensions: [4, 4],
    };

    let mut bytes = header.as_bytes().to_vec();

    for value in texels.iter().flatten() {
        bytes.extend_from_slice(&f16::from_f32(*value).to_bits().to_le_bytes());
    }

    bytes
        .chunks_exact(4)
        .map(|word| u32::from_ne_bytes([word[0], word[1], word[2], word[3]]))
        .collect()
}

fn random_image(rng: &mut ChaCha20Rng) -> EnvironmentImage {
    let width = rng.gen_range(4, 40);
    let height = rng.gen_range(4, 40);

    let pixels = (0..width * height)
        .map(|_| [rng.gen::<f32>(), rng.gen::<f32>(), rng.gen::<f32>()])
        .collect();

    EnvironmentImage::new(width, height, pixels).expect("failed to create image")
}

#[test]
fn scanned_uv_is_always_normalized() {
    let mut rng = ChaCha20Rng::seed_from_u64(7);

    for _ in 0..50 {
        let image = random_image(&mut rng);
        let result = scan(&image);

        assert!((0.0..=1.0).contains(&result.uv.u()));
        assert!((0.0..=1.0).contains(&result.uv.v()));
        assert!(result.pixel.0 + 4 <= image.width());
        assert!(result.pixel.1 + 4 <= image.height());
    }
}

#[test]
fn scanning_is_deterministic() {
    let mut rng = ChaCha20Rng::seed_from_u64(11);
    let image = random_image(&mut rng);

    assert_eq!(scan(&image), scan(&image.clone()));
}

#[test]
fn ties_go_to_first_block_in_row_major_order() {
    // same row: leftmost wins
    let image = image_with_blocks(16, 16, &[(10, 4, 5.0), (2, 4, 5.0)]);
    assert_eq!(scan(&image).pixel, (2, 4));

    // different rows: topmost wins even when further right
    let image = image_with_blocks(16, 16, &[(1, 9, 5.0), (11, 3, 5.0)]);
    assert_eq!(scan(&image).pixel, (11, 3));
}

#[test]
fn strictly_brighter_block_wins_over_earlier_block() {
    let image = image_with_blocks(16, 16, &[(0, 0, 5.0), (8, 8, 5.5)]);
    let result = scan(&image);

    assert_eq!(result.pixel, (8, 8));
    assert!((result.brightness - 16.0 * 3.0 * 5.5).abs() < 1e-4);
    assert!((result.uv.u() - 8.0 / 15.0).abs() < 1e-12);
    assert!((result.uv.v() - 8.0 / 15.0).abs() < 1e-12);
}

#[test]
fn top_left_bright_spot_lands_above_the_dome() {
    let image = image_with_blocks(8, 8, &[(0, 0, 10.0)]);
    let dome = DomeGeometry::new(100.0).expect("failed to create dome");

    let spot = BrightSpot::locate(&image, &dome);

    assert_eq!((spot.uv.u(), spot.uv.v()), (0.0, 0.0));
    assert!(spot.point.x.abs() < 1e-9 && spot.point.y.abs() < 1e-9);
    assert!((spot.point.z - 110.0).abs() < 1e-9);
    assert!((spot.light.position.z - 120.0).abs() < 1e-9);
    assert_eq!(spot.light.energy, 10000.0);
}

#[test]
fn empty_and_tiny_images_are_rejected() {
    for &(width, height) in &[(0, 8), (8, 0), (0, 0), (3, 8), (8, 3)] {
        let pixels = vec![[1.0f32; 3]; (width * height) as usize];

        assert!(
            matches!(
                EnvironmentImage::new(width, height, pixels),
                Err(DomeError::InvalidImage(_))
            ),
            "{}x{} should be rejected",
            width,
            height
        );
    }
}

#[test]
fn pixel_count_must_match_dimensions() {
    let pixels = vec![[1.0f32; 3]; 15];

    assert!(matches!(
        EnvironmentImage::new(4, 4, pixels),
        Err(DomeError::InvalidImage(_))
    ));

    let data = vec![0.0f32; 4 * 4 * 3 - 1];

    assert!(matches!(
        EnvironmentImage::from_interleaved(4, 4, 3, &data, PixelOrigin::TopLeft),
        Err(DomeError::InvalidImage(_))
    ));
}

#[test]
fn png_images_decode_into_unit_range() {
    let mut picture = RgbImage::from_pixel(8, 8, Rgb([0, 0, 0]));
    picture.put_pixel(6, 1, Rgb([255, 255, 255]));

    let mut bytes = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(picture)
        .write_to(&mut bytes, ImageFormat::Png)
        .expect("failed to encode png");

    let image = EnvironmentImage::load_from_memory(bytes.get_ref()).expect("failed to decode");

    assert_eq!((image.width(), image.height()), (8, 8));
    assert_eq!(image.pixel(6, 1), [1.0, 1.0, 1.0]);
    assert_eq!(scan(&image).pixel, (3, 0));
}

#[test]
fn radiance_images_keep_values_above_one() {
    let mut picture = Rgb32FImage::from_pixel(8, 8, Rgb([0.25, 0.25, 0.25]));
    picture.put_pixel(5, 2, Rgb([4.0, 2.0, 8.0]));

    let mut bytes = Cursor::new(Vec::new());
    DynamicImage::ImageRgb32F(picture)
        .write_to(&mut bytes, ImageFormat::Hdr)
        .expect("failed to encode hdr");

    let image = EnvironmentImage::load_from_memory(bytes.get_ref()).expect("failed to decode");

    assert_eq!((image.width(), image.height()), (8, 8));
    assert_eq!(image.pixel(5, 2), [4.0, 2.0, 8.0]);
    assert_eq!(image.pixel(0, 0), [0.25, 0.25, 0.25]);
    assert_eq!(scan(&image).pixel, (2, 0));
}

#[test]
fn truncated_raw_assets_are_rejected() {
    assert!(matches!(
        EnvironmentImage::from_raw_asset(&[0u8; 3]),
        Err(DomeError::InvalidImage(_))
    ));
}

#[test]
fn raw_assets_decode_half_float_texels() {
    let mut texels = [[0.125f32, 0.125, 0.125, 1.0]; 16];
    texels[4 + 2] = [2.5, 0.5, 0.25, 1.0];

    let words = raw_asset(ColorSpace::LinearSRGB, DataFormat::RGBA16F, &texels);
    let image = EnvironmentImage::from_raw_asset(words.as_bytes()).expect("failed to decode");

    assert_eq!((image.width(), image.height()), (4, 4));
    assert_eq!(image.pixel(2, 1), [2.5, 0.5, 0.25]);
    assert_eq!(image.pixel(3, 3), [0.125, 0.125, 0.125]);
    assert_eq!(image.brightness(2, 1), 3.25);
}

#[test]
fn raw_assets_in_other_formats_are_rejected() {
    let texels = [[0.5f32; 4]; 16];

    for &(color_space, data_format) in &[
        (ColorSpace::LinearSRGB, DataFormat::RGBA32F),
        (ColorSpace::LinearSRGB, DataFormat::RGBE8),
        (ColorSpace::SRGB, DataFormat::RGBA16F),
        (ColorSpace::NonColor, DataFormat::RGBA16F),
    ] {
        let words = raw_asset(color_space, data_format, &texels);

        assert!(
            matches!(
                EnvironmentImage::from_raw_asset(words.as_bytes()),
                Err(DomeError::InvalidImage(_))
            ),
            "{} {} should be rejected",
            color_space,
            data_format
        );
    }
}

#[test]
fn raw_assets_with_missing_texels_are_rejected() {
    let texels = [[0.5f32; 4]; 12];
    let words = raw_asset(ColorSpace::LinearSRGB, DataFormat::RGBA16F, &texels);

    assert!(matches!(
        EnvironmentImage::from_raw_asset(words.as_bytes()),
        Err(DomeError::InvalidImage(_))
    ));
}

#[test]
fn oversized_buffers_are_rejected_without_overflow() {
    assert!(matches!(
        EnvironmentImage::from_interleaved(u32::MAX, u32::MAX, 4, &[], PixelOrigin::TopLeft),
        Err(DomeError::InvalidImage(_))
    ));
    assert!(matches!(
        EnvironmentImage::new(u32::MAX, u32::MAX, Vec::new()),
        Err(DomeError::InvalidImage(_))
    ));
}

#[test]
fn flattened_mesh_has_no_vertex_below_floor() {
    let dome = DomeGeometry::new(50.0).expect("failed to create dome");
    let original = DomeMesh::uv_sphere(&dome, 32, 16).expect("failed to create mesh");

    let mut mesh = original.clone();
    let flattened = mesh.flatten_floor();

    assert_eq!(flattened, mesh.floor_indices().len());
    assert!(flattened > 0);

    for (before, after) in original.vertices().iter().zip(mesh.vertices()) {
        assert!(after.z >= dome.floor_height());
        assert_eq!((before.x, before.y), (after.x, after.y));
    }

    for &index in mesh.floor_indices() {
        assert_eq!(mesh.vertices()[index].z, -5.0);
    }

    let bounds = mesh.bounds();

    assert_eq!(bounds.min.z, -5.0);
    assert!((bounds.max.z - 50.0).abs() < 1e-9);
    assert!((bounds.size().z - 55.0).abs() < 1e-9);
    assert!(mesh.vertices().iter().all(|&vertex| bounds.contains(vertex)));
}

#[test]
fn floor_punches_are_reproducible() {
    let dome = DomeGeometry::new(100.0).expect("failed to create dome");
    let punches = FloorPunches {
        seed: 42,
        ..FloorPunches::default()
    };

    let punched = || {
        let mut mesh = DomeMesh::uv_sphere(&dome, 64, 32).expect("failed to create mesh");
        mesh.flatten_floor();
        let count = mesh.punch_floor(&punches).expect("failed to punch floor");
        (count, mesh.vertices().to_vec())
    };

    let (count, first) = punched();
    let (_, second) = punched();

    assert_eq!(count, 5);
    assert_eq!(first, second);

    let raised = first.iter().filter(|vertex| vertex.z > -10.0 + 1e-9).count();
    let mut flat = DomeMesh::uv_sphere(&dome, 64, 32).expect("failed to create mesh");
    flat.flatten_floor();
    let already_above = flat.vertices().iter().filter(|v| v.z > -10.0 + 1e-9).count();

    assert!(raised > already_above);
}

#[test]
fn punching_more_than_floor_uses_every_floor_vertex() {
    let dome = DomeGeometry::new(10.0).expect("failed to create dome");
    let mut mesh = DomeMesh::uv_sphere(&dome, 4, 3).expect("failed to create mesh");

    // rings at z = 5, -5 and the bottom pole at -10
    assert_eq!(mesh.flatten_floor(), 5);

    let count = mesh
        .punch_floor(&FloorPunches {
            count: 50,
            height: 1.0,
            radius: 0.0,
            seed: 1,
        })
        .expect("failed to punch floor");

    assert_eq!(count, 5);

    for &index in mesh.floor_indices() {
        assert_eq!(mesh.vertices()[index].z, 0.0);
    }
}

#[test]
fn punch_rejects_unknown_vertex() {
    let dome = DomeGeometry::new(10.0).expect("failed to create dome");
    let mut mesh = DomeMesh::uv_sphere(&dome, 4, 3).expect("failed to create mesh");

    assert!(matches!(
        mesh.punch(1000, cgmath::Vector3::new(0.0, 0.0, 1.0), 1.0),
        Err(DomeError::InvalidSettings(_))
    ));
}

#[test]
fn basin_only_moves_floor_vertices_inside_region() {
    let dome = DomeGeometry::new(10.0).expect("failed to create dome");
    let mut mesh = DomeMesh::uv_sphere(&dome, 4, 3).expect("failed to create mesh");
    mesh.flatten_floor();

    // only the bottom pole sits strictly inside this square
    let moved = mesh.raise_floor_region(&FloorBasin {
        region: [-1.0, -1.0, 1.0, 1.0],
        height: -2.0,
    });

    assert_eq!(moved, 1);

    let lowest = mesh
        .vertices()
        .iter()
        .map(|vertex| vertex.z)
        .fold(std::f64::INFINITY, f64::min);

    assert_eq!(lowest, -3.0);
}

#[test]
fn basin_needs_a_flattened_floor() {
    let dome = DomeGeometry::new(10.0).expect("failed to create dome");
    let mut mesh = DomeMesh::uv_sphere(&dome, 4, 3).expect("failed to create mesh");
    let before = mesh.vertices().to_vec();

    let moved = mesh.raise_floor_region(&FloorBasin {
        region: [-100.0, -100.0, 100.0, 100.0],
        height: 5.0,
    });

    assert_eq!(moved, 0);
    assert_eq!(mesh.vertices(), &before[..]);
}

#[test]
fn settings_fill_defaults_from_partial_json() {
    let settings = DomeSettings::from_json(
        &json!({
            "radius": 75.0,
            "floor_punches": { "count": 3 }
        })
        .to_string(),
    )
    .expect("failed to parse settings");

    assert_eq!(settings.radius, 75.0);
    assert_eq!(settings.segments, 128);
    assert_eq!(settings.rings, 64);
    assert_eq!(settings.emission_strength, 50.0);

    let punches = settings.floor_punches.expect("punches should be set");

    assert_eq!(punches.count, 3);
    assert_eq!(punches.height, 10.0);
    assert_eq!(punches.radius, 10.0);
    assert!(settings.floor_basin.is_none());
}

#[test]
fn invalid_settings_are_rejected() {
    assert!(matches!(
        DomeSettings::from_json(r#"{ "radius": -5.0 }"#),
        Err(DomeError::InvalidRadius(_))
    ));
    assert!(matches!(
        DomeSettings::from_json(r#"{ "segments": 2 }"#),
        Err(DomeError::InvalidSettings(_))
    ));
    assert!(matches!(
        DomeSettings::from_json(r#"{ "segments": 70000, "rings": 70000 }"#),
        Err(DomeError::InvalidSettings(_))
    ));
    assert!(matches!(
        DomeSettings::from_json(r#"{ "floor_basin": { "region": [1, 1, -1, -1] } }"#),
        Err(DomeError::InvalidSettings(_))
    ));
    assert!(matches!(
        DomeSettings::from_json("{ not json"),
        Err(DomeError::Json(_))
    ));
}

#[test]
fn rig_hands_dome_and_sun_to_scene_builder() {
    let image = image_with_blocks(32, 16, &[(16, 4, 8.0)]);
    let settings = DomeSettings {
        segments: 32,
        rings: 16,
        ..DomeSettings::default()
    };

    let rig = DomeRig::build(Some(&image), &settings).expect("failed to build rig");
    let spot = rig.bright_spot.expect("rig should have a bright spot");

    let mut scene = SceneDescription::new();
    rig.apply(&mut scene).expect("scene description never fails");

    let dome = &scene.domes[DOME_OBJECT_NAME];

    assert_eq!(dome.radius, 100.0);
    assert_eq!(dome.floor_height, -10.0);
    assert_eq!(dome.vertex_count, 2 + 15 * 32);
    assert_eq!(dome.material.emission_strength, 50.0);
    assert_eq!(dome.material.mapping_offset, [0.0, 0.0, -20.0]);
    assert!(dome.material.has_environment);

    assert_eq!(scene.lights[SUN_OBJECT_NAME], spot.light);
    assert_eq!(spot.light.energy, 10000.0);

    let json: serde_json::Value =
        serde_json::from_str(&scene.to_json().expect("failed to serialize scene"))
            .expect("failed to parse scene json");

    assert_eq!(json["domes"][DOME_OBJECT_NAME]["radius"], json!(100.0));
    assert!(json["lights"][SUN_OBJECT_NAME]["position"].is_object());

    scene.clear();
    assert!(scene.is_empty());
}

#[test]
fn rig_without_image_has_no_sun() {
    let settings = DomeSettings {
        radius: 20.0,
        segments: 16,
        rings: 8,
        ..DomeSettings::default()
    };

    let rig = DomeRig::build(None, &settings).expect("failed to build rig");

    let mut scene = SceneDescription::new();
    rig.apply(&mut scene).expect("scene description never fails");

    assert!(rig.bright_spot.is_none());
    assert!(!rig.material.has_environment);
    assert_eq!(scene.domes.len(), 1);
    assert!(scene.lights.is_empty());
}
