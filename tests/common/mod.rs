// tests/common/mod.rs
#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use lai_calc::catalog::CatalogId;
use lai_calc::geometry::{polygon_from_ring, StudyArea};
use lai_calc::scene::{BandGrid, Scene, SceneMetadata};

pub const INSIDE: [[f64; 2]; 4] = [[1.0, 1.0], [3.0, 1.0], [3.0, 3.0], [1.0, 3.0]];
pub const OVERLAPPING: [[f64; 2]; 4] = [[9.0, 9.0], [12.0, 9.0], [12.0, 12.0], [9.0, 12.0]];
pub const DISJOINT: [[f64; 2]; 4] = [[20.0, 20.0], [22.0, 20.0], [22.0, 22.0], [20.0, 22.0]];

/// 10 x 10 square at the origin
pub fn study_area() -> StudyArea {
    StudyArea::from_rings(&[vec![[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]]]).unwrap()
}

pub fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
}

pub fn metadata(
    source: CatalogId,
    acquired: DateTime<Utc>,
    cloud_cover: f32,
    footprint: &[[f64; 2]],
) -> SceneMetadata {
    SceneMetadata {
        source,
        acquired,
        cloud_cover,
        spacecraft: match source {
            CatalogId::Landsat8C2L2 => "LANDSAT_8".to_string(),
            CatalogId::Landsat9C2L2 => "LANDSAT_9".to_string(),
        },
        footprint: polygon_from_ring(footprint),
        projection: "EPSG:32612".to_string(),
        geo_transform: [0.0, 30.0, 0.0, 0.0, 0.0, -30.0],
    }
}

/// Grid of `width` x `height` filled with `values`, repeating if needed
pub fn grid(width: usize, height: usize, values: &[f32]) -> BandGrid {
    let data = (0..width * height).map(|i| values[i % values.len()]).collect();
    BandGrid::new((width, height), data).unwrap()
}

/// Raw digital number that scales to reflectance `r`
pub fn dn(r: f32) -> f32 {
    ((r as f64 + 0.2) / 0.0000275) as f32
}

/// Scene with already scaled reflectance in SR_B5 (nir), SR_B4 (red), SR_B2 (blue)
pub fn reflectance_scene(
    width: usize,
    height: usize,
    nir: &[f32],
    red: &[f32],
    blue: &[f32],
) -> Scene {
    Scene::new(
        "LC08_TEST",
        metadata(CatalogId::Landsat8C2L2, utc(2023, 6, 1, 17, 30, 0), 1.0, &INSIDE),
    )
    .with_band("SR_B2", grid(width, height, blue))
    .with_band("SR_B4", grid(width, height, red))
    .with_band("SR_B5", grid(width, height, nir))
}

/// Raw (unscaled) 2 x 2 scene whose reflectance is blue 0.1, red 0.2, nir 0.4
pub fn raw_scene(
    id: &str,
    source: CatalogId,
    acquired: DateTime<Utc>,
    cloud_cover: f32,
    footprint: &[[f64; 2]],
) -> Scene {
    Scene::new(id, metadata(source, acquired, cloud_cover, footprint))
        .with_band("SR_B2", grid(2, 2, &[dn(0.1)]))
        .with_band("SR_B4", grid(2, 2, &[dn(0.2)]))
        .with_band("SR_B5", grid(2, 2, &[dn(0.4)]))
        .with_band("ST_B10", grid(2, 2, &[44000.0]))
        .with_band("QA_PIXEL", grid(2, 2, &[21824.0]))
}

pub fn ids(scenes: impl IntoIterator<Item = Scene>) -> Vec<String> {
    scenes.into_iter().map(|s| s.id().to_string()).collect()
}
