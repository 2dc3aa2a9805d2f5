// tests/unit_tests.rs
mod common;

use std::sync::Arc;

use approx::assert_abs_diff_eq;
use lai_calc::error::LaiError;
use lai_calc::processing::indices::{apply_index, LaiModel, EVI, LAI, NDI};
use lai_calc::processing::{BandExtractor, IndexCalculator, IndexDeriver, RadiometricScaler};
use lai_calc::scene::{is_nodata, BandGrid};

use common::{grid, raw_scene, reflectance_scene, utc, INSIDE};
use lai_calc::catalog::CatalogId;

/// Helper function to extract result values for a band
fn band_values(scene: &lai_calc::Scene, band: &str) -> Vec<f32> {
    scene.band(band).unwrap().data().to_vec()
}

/// Test NDVI calculation with known values
#[test]
fn test_ndvi_calculation() {
    let test_cases = [
        // NIR, RED, Expected NDVI
        (0.4, 0.2, 0.33333),   // (0.4-0.2)/(0.4+0.2)
        (0.3, 0.3, 0.0),       // NIR = RED
        (0.1, 0.5, -0.66667),  // water-like
        (0.0, 0.0, f32::NAN),  // divide by zero
    ];

    let nir: Vec<f32> = test_cases.iter().map(|(nir, _, _)| *nir).collect();
    let red: Vec<f32> = test_cases.iter().map(|(_, red, _)| *red).collect();
    let scene = reflectance_scene(2, 2, &nir, &red, &[0.05]);

    let result = apply_index(scene, &NDI::ndvi()).unwrap();
    let values = band_values(&result, "ndvi");

    for (i, (_, _, expected)) in test_cases.iter().enumerate() {
        if expected.is_nan() {
            assert!(is_nodata(values[i]), "expected no-data at {}, got {}", i, values[i]);
        } else {
            assert_abs_diff_eq!(values[i], *expected, epsilon = 1e-4);
        }
    }
}

#[test]
fn test_ndvi_stays_within_unit_range() {
    // Negative scaled reflectance can push the raw ratio outside [-1, 1]
    let nir = [0.1, 0.3, -0.05, 0.8];
    let red = [-0.15, -0.1, -0.1, 0.05];
    let scene = reflectance_scene(2, 2, &nir, &red, &[0.05]);

    let result = apply_index(scene, &NDI::ndvi()).unwrap();
    let values = band_values(&result, "ndvi");

    assert!(is_nodata(values[0])); // -5.0
    assert!(is_nodata(values[1])); // 2.0
    assert_abs_diff_eq!(values[2], -1.0 / 3.0, epsilon = 1e-4);
    assert_abs_diff_eq!(values[3], 0.75 / 0.85, epsilon = 1e-4);

    for v in values.iter().filter(|v| !is_nodata(**v)) {
        assert!((-1.0..=1.0).contains(v), "ndvi {} out of range", v);
    }
}

#[test]
fn test_masked_ndvi_leaves_evi_defined() {
    let scene = reflectance_scene(1, 1, &[0.3], &[-0.1], &[0.05]);

    let derived = IndexDeriver::default().derive(&scene).unwrap();

    assert!(is_nodata(band_values(&derived, "ndvi")[0])); // ratio 2.0
    assert_abs_diff_eq!(band_values(&derived, "evi")[0], 1.0 / 0.325, epsilon = 1e-3);
    assert!(!is_nodata(band_values(&derived, "lai")[0]));
}

/// Test EVI calculation with known values
#[test]
fn test_evi_calculation() {
    // EVI = 2.5 * (NIR - RED) / (NIR + 6*RED - 7.5*BLUE + 1)
    let test_cases = [
        // NIR, RED, BLUE, Expected EVI
        (0.4, 0.2, 0.1, 0.27027),   // 0.5 / 1.85
        (0.3, 0.3, 0.05, 0.0),      // NIR = RED
        (0.5, 0.1, 0.05, 0.57971),  // 1.0 / 1.725
        (0.0, 0.0, 0.0, f32::NAN),  // no signal
    ];

    let nir: Vec<f32> = test_cases.iter().map(|(nir, _, _, _)| *nir).collect();
    let red: Vec<f32> = test_cases.iter().map(|(_, red, _, _)| *red).collect();
    let blue: Vec<f32> = test_cases.iter().map(|(_, _, blue, _)| *blue).collect();
    let scene = reflectance_scene(2, 2, &nir, &red, &blue);

    let result = apply_index(scene, &EVI::landsat()).unwrap();
    let values = band_values(&result, "evi");

    for (i, (_, _, _, expected)) in test_cases.iter().enumerate() {
        if expected.is_nan() {
            assert!(is_nodata(values[i]), "expected no-data at {}, got {}", i, values[i]);
        } else {
            assert_abs_diff_eq!(values[i], *expected, epsilon = 1e-4);
        }
    }
}

#[test]
fn test_evi_zero_denominator_is_nodata() {
    // 1.25 + 6*0.25 - 7.5*0.5 + 1 == 0 exactly in binary floating point
    let scene = reflectance_scene(1, 1, &[1.25], &[0.25], &[0.5]);

    let result = apply_index(scene, &EVI::landsat()).unwrap();

    assert!(is_nodata(band_values(&result, "evi")[0]));
}

#[test]
fn test_evi_is_not_clamped() {
    let scene = reflectance_scene(1, 1, &[0.9], &[0.05], &[0.2]);
    // 2.5 * 0.85 / (0.9 + 0.3 - 1.5 + 1) = 2.125 / 0.7
    let result = apply_index(scene, &EVI::landsat()).unwrap();

    assert_abs_diff_eq!(band_values(&result, "evi")[0], 2.125 / 0.7, epsilon = 1e-4);
}

#[test]
fn test_lai_from_evi() {
    let scene = reflectance_scene(2, 2, &[0.4], &[0.2], &[0.1])
        .with_band("evi", grid(2, 2, &[0.27027, 0.0, -0.5, f32::NAN]));

    let result = apply_index(scene, &LAI::new(LaiModel::default())).unwrap();
    let values = band_values(&result, "lai");

    assert_abs_diff_eq!(values[0], 3.618 * 0.27027 - 0.118, epsilon = 1e-5);
    assert_abs_diff_eq!(values[1], -0.118, epsilon = 1e-6);
    // Negative LAI is preserved
    assert_abs_diff_eq!(values[2], 3.618 * -0.5 - 0.118, epsilon = 1e-5);
    assert!(is_nodata(values[3]));
}

#[test]
fn test_lai_clamp_only_when_configured() {
    let model = LaiModel {
        clamp_min: Some(0.0),
        ..LaiModel::default()
    };
    let scene = reflectance_scene(1, 3, &[0.4], &[0.2], &[0.1])
        .with_band("evi", grid(1, 3, &[-0.5, 0.5, f32::NAN]));

    let result = apply_index(scene, &LAI::new(model)).unwrap();
    let values = band_values(&result, "lai");

    assert_eq!(values[0], 0.0);
    assert_abs_diff_eq!(values[1], 3.618 * 0.5 - 0.118, epsilon = 1e-5);
    assert!(is_nodata(values[2]));
}

/// Worked example: blue 0.1, red 0.2, nir 0.4 (already scaled)
#[test]
fn test_derivation_chain_example() {
    let scene = reflectance_scene(1, 1, &[0.4], &[0.2], &[0.1]);

    let derived = IndexDeriver::default().derive(&scene).unwrap();

    assert_abs_diff_eq!(band_values(&derived, "ndvi")[0], 0.2 / 0.6, epsilon = 1e-5);
    // 2.5 * 0.2 / (0.4 + 1.2 - 0.75 + 1)
    assert_abs_diff_eq!(band_values(&derived, "evi")[0], 0.5 / 1.85, epsilon = 1e-5);
    assert_abs_diff_eq!(band_values(&derived, "lai")[0], 3.618 * (0.5 / 1.85) - 0.118, epsilon = 1e-4);
}

#[test]
fn test_degenerate_scene_yields_nodata_without_error() {
    let scene = reflectance_scene(2, 2, &[0.0], &[0.0], &[0.05]);

    let derived = IndexDeriver::default().derive(&scene).unwrap();

    for band in ["ndvi", "evi", "lai"] {
        assert!(
            band_values(&derived, band).iter().all(|v| is_nodata(*v)),
            "{} should be undefined everywhere",
            band
        );
    }
}

#[test]
fn test_derive_appends_without_removing() {
    let scene = reflectance_scene(1, 1, &[0.4], &[0.2], &[0.1]);

    let derived = IndexDeriver::default().derive(&scene).unwrap();

    let names: Vec<&str> = derived.band_names().collect();
    assert_eq!(names, ["SR_B2", "SR_B4", "SR_B5", "ndvi", "evi", "lai"]);
    // Input scene is untouched
    assert_eq!(scene.bands().len(), 3);
}

#[test]
fn test_missing_input_band() {
    let scene = reflectance_scene(1, 1, &[0.4], &[0.2], &[0.1]).select(&["SR_B4", "SR_B5"]).unwrap();

    let err = IndexDeriver::default().derive(&scene).unwrap_err();

    assert!(
        matches!(err, LaiError::MissingBand { ref band, .. } if band == "SR_B2"),
        "unexpected error: {}",
        err
    );
}

#[test]
fn test_shape_mismatch() {
    let scene = reflectance_scene(2, 2, &[0.4], &[0.2], &[0.1]).with_band("SR_B4", grid(1, 2, &[0.2]));

    let err = apply_index(scene, &NDI::ndvi()).unwrap_err();

    assert!(matches!(err, LaiError::ShapeMismatch { ref band, .. } if band == "SR_B4"));
}

/// Test that custom names are properly set
#[test]
fn test_custom_index_names() {
    let ndi = NDI::new("SR_B3", "SR_B5", Some("ndwi".to_string()));
    assert_eq!(ndi.name(), "ndwi");
    assert_eq!(ndi.input_bands(), ["SR_B3", "SR_B5"]);

    assert_eq!(NDI::new("a", "b", None).name(), "nd");
    assert_eq!(EVI::landsat().name(), "evi");
    assert_eq!(LAI::new(LaiModel::default()).name(), "lai");
}

/// Test that required_bands returns the correct number for each calculator
#[test]
fn test_required_bands() {
    assert_eq!(NDI::ndvi().required_bands(), 2);
    assert_eq!(EVI::landsat().required_bands(), 3);
    assert_eq!(LAI::new(LaiModel::default()).required_bands(), 1);
    assert_eq!(IndexDeriver::default().output_bands(), ["ndvi", "evi", "lai"]);
}

#[test]
fn test_reflectance_scaling() {
    let raw = [0.0, 7273.0, 10000.0, 65535.0];
    let scene = reflectance_scene(2, 2, &raw, &raw, &raw);

    let scaled = RadiometricScaler::default().scale(&scene);

    for band in ["SR_B2", "SR_B4", "SR_B5"] {
        let values = band_values(&scaled, band);
        for (v, dn) in values.iter().zip(raw) {
            assert_abs_diff_eq!(*v as f64, dn as f64 * 0.0000275 - 0.2, epsilon = 1e-6);
        }
    }
}

#[test]
fn test_thermal_scaling_and_pass_through() {
    let scene = raw_scene(
        "LC08_SCALE",
        CatalogId::Landsat8C2L2,
        utc(2023, 6, 1, 17, 30, 0),
        1.0,
        &INSIDE,
    )
    .with_band("ST_QA", grid(2, 2, &[120.0]))
    .with_band("SR_QA_AEROSOL", grid(2, 2, &[96.0]));

    let scaled = RadiometricScaler::default().scale(&scene);

    assert_abs_diff_eq!(band_values(&scaled, "ST_B10")[0], 44000.0 * 0.00341802 + 149.0, epsilon = 1e-3);
    for band in ["QA_PIXEL", "ST_QA", "SR_QA_AEROSOL"] {
        assert!(Arc::ptr_eq(
            scaled.band_arc(band).unwrap(),
            scene.band_arc(band).unwrap()
        ));
    }
    // Raw input is not modified
    assert_eq!(band_values(&scene, "ST_B10")[0], 44000.0);
    // Scaled bands keep their position
    let names: Vec<&str> = scaled.band_names().collect();
    let original: Vec<&str> = scene.band_names().collect();
    assert_eq!(names, original);
}

#[test]
fn test_scaling_twice_double_scales() {
    let scene = reflectance_scene(1, 1, &[10000.0], &[10000.0], &[10000.0]);
    let scaler = RadiometricScaler::default();

    let once = scaler.scale(&scene);
    let twice = scaler.scale(&once);

    assert_abs_diff_eq!(band_values(&once, "SR_B5")[0], 0.075, epsilon = 1e-6);
    assert_abs_diff_eq!(band_values(&twice, "SR_B5")[0], 0.075 * 0.0000275 - 0.2, epsilon = 1e-6);
}

#[test]
fn test_band_group_matches_whole_name() {
    let scaler = RadiometricScaler::default();

    assert_eq!(scaler.group_for("SR_B1").map(|g| g.name()), Some("reflectance"));
    assert_eq!(scaler.group_for("SR_B7").map(|g| g.name()), Some("reflectance"));
    assert_eq!(scaler.group_for("ST_B10").map(|g| g.name()), Some("thermal"));
    assert!(scaler.group_for("SR_B10").is_none());
    assert!(scaler.group_for("xSR_B1").is_none());
    assert!(scaler.group_for("QA_PIXEL").is_none());
}

#[test]
fn test_extract_lai_only() {
    let scene = reflectance_scene(1, 1, &[0.4], &[0.2], &[0.1]);
    let derived = IndexDeriver::default().derive(&scene).unwrap();

    let lai = BandExtractor::lai().extract(&derived).unwrap();

    let names: Vec<&str> = lai.band_names().collect();
    assert_eq!(names, ["lai"]);
    assert_eq!(lai.id(), derived.id());
    assert_eq!(lai.acquired(), derived.acquired());
}

#[test]
fn test_extract_without_lai_fails() {
    let scene = reflectance_scene(1, 1, &[0.4], &[0.2], &[0.1]);

    let err = BandExtractor::lai().extract(&scene).unwrap_err();

    assert!(matches!(err, LaiError::MissingBand { ref band, .. } if band == "lai"));
}

#[test]
fn test_band_grid_dimensions_and_stats() {
    assert!(matches!(
        BandGrid::new((2, 2), vec![1.0; 3]),
        Err(LaiError::InvalidDimensions { .. })
    ));

    let g = grid(2, 2, &[1.0, f32::NAN, 3.0, 2.0]);
    assert_eq!(g.get(0, 1), Some(3.0));
    assert_eq!(g.get(2, 0), None);

    let stats = g.stats().unwrap();
    assert_eq!(stats.min, 1.0);
    assert_eq!(stats.max, 3.0);
    assert_abs_diff_eq!(stats.mean, 2.0);
    assert_eq!(stats.valid_pixels, 3);
    assert_eq!(stats.nodata_pixels, 1);

    assert!(BandGrid::filled((2, 2), f32::NAN).unwrap().stats().is_none());
}

#[test]
fn test_band_grid_rejects_overflowing_shape() {
    assert!(matches!(
        BandGrid::new((usize::MAX, 2), vec![0.0; 4]),
        Err(LaiError::InvalidDimensions { width: usize::MAX, height: 2, len: 4 })
    ));
    assert!(matches!(
        BandGrid::filled((2, usize::MAX), 0.0),
        Err(LaiError::InvalidDimensions { .. })
    ));
}
