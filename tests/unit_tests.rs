// tests/unit_tests.rs
use std::path::PathBuf;

use chrono::NaiveDate;

use composite_calc::aoi::AreaOfInterest;
use composite_calc::catalog::{Catalog, SceneRecord};
use composite_calc::image::{bands, MultiBandImage, NODATA};
use composite_calc::io::export::resample_nearest;
use composite_calc::io::reader::{GeoInfo, RawScene};
use composite_calc::processing::clip::{point_in_ring, ClipMask};
use composite_calc::processing::indices::{self, IndexCalculator, EVI, GCI, NDVI, SAVI, VARI};
use composite_calc::processing::reduce::{reduce_collection, Reducer};
use composite_calc::sensor::{Landsat8, Sensor, Sentinel2};

/// Helper to build an image where every band holds one constant value
fn uniform_image(width: usize, height: usize, values: &[(&str, f32)]) -> MultiBandImage {
    let mut image = MultiBandImage::new((width, height));
    for (name, value) in values {
        image.add_band(name, vec![*value; width * height]).unwrap();
    }
    image
}

fn band_value(image: &MultiBandImage, name: &str) -> f32 {
    image.band(name).unwrap()[0]
}

fn dummy_record() -> SceneRecord {
    SceneRecord {
        id: "scene".to_string(),
        path: PathBuf::from("scene.tif"),
        date: NaiveDate::from_ymd_opt(2022, 6, 1).unwrap(),
        cloud_cover: 0.0,
    }
}

fn dummy_geo(width: usize, height: usize) -> GeoInfo {
    GeoInfo {
        projection: String::new(),
        geo_transform: [0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
        width,
        height,
    }
}

/// Test NDVI against a hand-computed value
#[test]
fn test_ndvi_known_value() {
    let mut image = uniform_image(1, 1, &[(bands::NIR, 0.5), (bands::RED, 0.1)]);
    indices::add_index(&mut image, &NDVI).unwrap();

    // (0.5 - 0.1) / (0.5 + 0.1) = 0.6667
    assert!((band_value(&image, "NDVI") - 0.6667).abs() < 1e-4);
}

/// Verify every formula literally for one synthetic pixel
#[test]
fn test_all_formulas_fixed_pixel() {
    let mut image = uniform_image(
        1,
        1,
        &[
            (bands::NIR, 0.4),
            (bands::RED, 0.2),
            (bands::BLUE, 0.1),
            (bands::GREEN, 0.3),
        ],
    );
    indices::add_standard_indices(&mut image).unwrap();

    // NDVI = 0.2 / 0.6
    assert!((band_value(&image, "NDVI") - 0.333_333_3).abs() < 1e-5);
    // SAVI = 1.5 * 0.2 / (0.6 + 0.5)
    assert!((band_value(&image, "SAVI") - 0.272_727_3).abs() < 1e-5);
    // EVI = 2.5 * 0.2 / (0.4 + 1.2 - 0.75 + 1)
    assert!((band_value(&image, "EVI") - 0.270_270_3).abs() < 1e-5);
    // GCI = 0.4 / 0.3 - 1
    assert!((band_value(&image, "GCI") - 0.333_333_3).abs() < 1e-5);
    // ARVI: 2*red - blue = 0.3, (0.4 - 0.3) / (0.4 + 0.3)
    assert!((band_value(&image, "ARVI") - 0.142_857_1).abs() < 1e-5);
    // VARI = (0.3 - 0.2) / (0.3 + 0.2 - 0.1)
    assert!((band_value(&image, "VARI") - 0.25).abs() < 1e-5);
}

/// Zero denominators must yield NODATA, not infinities
#[test]
fn test_zero_denominator_yields_nodata() {
    let mut image = uniform_image(1, 1, &[(bands::NIR, 0.0), (bands::RED, 0.0)]);
    indices::add_index(&mut image, &NDVI).unwrap();
    assert_eq!(band_value(&image, "NDVI"), NODATA);

    // VARI with GREEN + RED == BLUE
    let mut image = uniform_image(
        1,
        1,
        &[(bands::GREEN, 0.2), (bands::RED, 0.2), (bands::BLUE, 0.4)],
    );
    indices::add_index(&mut image, &VARI).unwrap();
    assert_eq!(band_value(&image, "VARI"), NODATA);

    // GCI with GREEN == 0
    let mut image = uniform_image(1, 1, &[(bands::NIR, 0.4), (bands::GREEN, 0.0)]);
    indices::add_index(&mut image, &GCI).unwrap();
    assert_eq!(band_value(&image, "GCI"), NODATA);
}

/// NODATA inputs propagate to the index band
#[test]
fn test_nodata_propagates() {
    let mut image = uniform_image(1, 1, &[(bands::NIR, NODATA), (bands::RED, 0.2)]);
    indices::add_index(&mut image, &NDVI).unwrap();
    assert_eq!(band_value(&image, "NDVI"), NODATA);
}

/// A missing required band fails without appending anything
#[test]
fn test_missing_band_fails_deterministically() {
    let mut image = uniform_image(2, 2, &[(bands::NIR, 0.4), (bands::RED, 0.2)]);
    let before = image.len();

    let result = indices::add_index(&mut image, &EVI);
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("blue"));
    assert_eq!(image.len(), before);
}

/// The engine only appends: original band values stay untouched
#[test]
fn test_original_bands_untouched() {
    let mut image = uniform_image(
        2,
        2,
        &[
            (bands::NIR, 0.4),
            (bands::RED, 0.2),
            (bands::BLUE, 0.1),
            (bands::GREEN, 0.3),
        ],
    );
    indices::add_standard_indices(&mut image).unwrap();

    assert_eq!(image.len(), 10);
    assert!(image.band(bands::NIR).unwrap().iter().all(|&v| v == 0.4));
    assert!(image.band(bands::RED).unwrap().iter().all(|&v| v == 0.2));
    assert!(image.band(bands::BLUE).unwrap().iter().all(|&v| v == 0.1));
    assert!(image.band(bands::GREEN).unwrap().iter().all(|&v| v == 0.3));
}

/// Applying the same index twice is rejected
#[test]
fn test_duplicate_index_rejected() {
    let mut image = uniform_image(1, 1, &[(bands::NIR, 0.4), (bands::RED, 0.2)]);
    indices::add_index(&mut image, &NDVI).unwrap();
    assert!(indices::add_index(&mut image, &NDVI).is_err());
}

#[test]
fn test_required_bands() {
    assert_eq!(NDVI.required_bands(), &[bands::NIR, bands::RED]);
    assert_eq!(SAVI::default().required_bands(), &[bands::NIR, bands::RED]);
    assert_eq!(EVI.required_bands(), &[bands::NIR, bands::RED, bands::BLUE]);
}

/// Reducers across three scenes, with NODATA gaps
#[test]
fn test_reducers_skip_nodata() {
    // Per pixel samples across time:
    //   px0: [1, 2, 3]          px1: [NODATA, 4, 6]
    //   px2: all NODATA         px3: [2, NODATA, NODATA]
    let make = |values: [f32; 4]| {
        let mut image = MultiBandImage::new((2, 2));
        image.add_band(bands::RED, values.to_vec()).unwrap();
        image
    };
    let images = vec![
        make([1.0, NODATA, NODATA, 2.0]),
        make([2.0, 4.0, NODATA, NODATA]),
        make([3.0, 6.0, NODATA, NODATA]),
    ];

    let mean = reduce_collection(&images, Reducer::Mean).unwrap();
    assert_eq!(mean.band(bands::RED).unwrap(), &[2.0, 5.0, NODATA, 2.0]);

    // Even-count median averages the middle two
    let median = reduce_collection(&images, Reducer::Median).unwrap();
    assert_eq!(median.band(bands::RED).unwrap(), &[2.0, 5.0, NODATA, 2.0]);

    let min = reduce_collection(&images, Reducer::Min).unwrap();
    assert_eq!(min.band(bands::RED).unwrap(), &[1.0, 4.0, NODATA, 2.0]);

    let max = reduce_collection(&images, Reducer::Max).unwrap();
    assert_eq!(max.band(bands::RED).unwrap(), &[3.0, 6.0, NODATA, 2.0]);
}

#[test]
fn test_reduce_rejects_bad_collections() {
    assert!(reduce_collection(&[], Reducer::Mean).is_err());

    let a = uniform_image(2, 2, &[(bands::RED, 1.0)]);
    let b = uniform_image(3, 3, &[(bands::RED, 1.0)]);
    assert!(reduce_collection(&[a.clone(), b], Reducer::Mean).is_err());

    let c = uniform_image(2, 2, &[(bands::NIR, 1.0)]);
    assert!(reduce_collection(&[a, c], Reducer::Mean).is_err());
}

/// Date filter is half-open, cloud filter inclusive
#[test]
fn test_catalog_filters() {
    let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
    let scene = |id: &str, d: NaiveDate, cc: f64| SceneRecord {
        id: id.to_string(),
        path: PathBuf::from(format!("{id}.tif")),
        date: d,
        cloud_cover: cc,
    };
    let catalog = Catalog {
        scenes: vec![
            scene("before", date(2021, 12, 31), 1.0),
            scene("on_start", date(2022, 1, 1), 1.0),
            scene("inside", date(2022, 6, 15), 10.0),
            scene("on_end", date(2023, 1, 1), 1.0),
            scene("cloudy", date(2022, 6, 16), 10.1),
        ],
    };

    let filtered = catalog
        .filter_date(date(2022, 1, 1), date(2023, 1, 1))
        .filter_cloud_cover(10.0);

    let ids: Vec<&str> = filtered.scenes.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, ["on_start", "inside"]);
}

#[test]
fn test_point_in_ring() {
    let ring = [
        (0.0, 0.0),
        (10.0, 0.0),
        (10.0, 10.0),
        (0.0, 10.0),
        (0.0, 0.0),
    ];
    assert!(point_in_ring(&ring, 5.0, 5.0));
    assert!(!point_in_ring(&ring, 15.0, 5.0));
    assert!(!point_in_ring(&ring, -1.0, 5.0));
    assert!(!point_in_ring(&ring, 5.0, -5.0));
}

/// Clip mask keeps pixels whose centers fall inside the ring
#[test]
fn test_clip_mask_apply() {
    let geo = dummy_geo(4, 4);
    // Square covering pixel centers (0.5, 0.5) and (1.5, 1.5)
    let ring = [(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0), (0.0, 0.0)];
    let mask = ClipMask::build(&ring, &geo);

    let mut image = uniform_image(4, 4, &[(bands::RED, 1.0)]);
    mask.apply(&mut image);

    let data = image.band(bands::RED).unwrap();
    for y in 0..4 {
        for x in 0..4 {
            let expected = if x < 2 && y < 2 { 1.0 } else { NODATA };
            assert_eq!(data[y * 4 + x], expected, "pixel ({x},{y})");
        }
    }
}

#[test]
fn test_aoi_from_ring_closes_and_validates() {
    let aoi = AreaOfInterest::from_ring(vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]).unwrap();
    assert_eq!(aoi.ring().len(), 4);
    assert_eq!(aoi.ring().first(), aoi.ring().last());
    assert_eq!(aoi.bbox(), (0.0, 0.0, 1.0, 1.0));

    assert!(AreaOfInterest::from_ring(vec![(0.0, 0.0), (1.0, 1.0)]).is_err());
}

/// Nearest-neighbour resample to a coarser ground sample distance
#[test]
fn test_resample_nearest() {
    let mut image = MultiBandImage::new((4, 4));
    image
        .add_band(bands::RED, (0..16).map(|v| v as f32).collect())
        .unwrap();
    let geo = GeoInfo {
        projection: String::new(),
        geo_transform: [0.0, 10.0, 0.0, 0.0, 0.0, -10.0],
        width: 4,
        height: 4,
    };

    let (out, out_geo) = resample_nearest(&image, &geo, 20.0).unwrap();
    assert_eq!(out.shape(), (2, 2));
    assert_eq!(out_geo.geo_transform[1], 20.0);
    assert_eq!(out_geo.geo_transform[5], -20.0);
    // Each output pixel center lands on source pixel (2x+1, 2y+1)
    assert_eq!(out.band(bands::RED).unwrap(), &[5.0, 7.0, 13.0, 15.0]);
}

/// Landsat-8 cloud/shadow/saturation mask and scaling
#[test]
fn test_landsat8_mask_and_scale() {
    let raw_names = Landsat8.raw_bands();
    let mut scene = RawScene {
        record: dummy_record(),
        geo: dummy_geo(2, 2),
        shape: (2, 2),
        bands: Vec::new(),
        qa: Vec::new(),
    };
    for &name in raw_names {
        scene.bands.push((name.to_string(), vec![10_000.0; 4]));
    }
    // px0 clear, px1 cloud, px2 cloud shadow, px3 saturated
    scene
        .qa
        .push(("QA_PIXEL".to_string(), vec![0, 1 << 5, 1 << 3, 0]));
    scene.qa.push(("QA_RADSAT".to_string(), vec![0, 0, 0, 2]));

    let image = Landsat8.mask_and_scale(&scene).unwrap();
    assert_eq!(
        image.band_names(),
        ["blue", "green", "red", "nir", "swir1", "swir2", "surface_temp"]
    );
    assert_eq!(image.band_names(), Landsat8.canonical_bands());

    let blue = image.band(bands::BLUE).unwrap();
    assert!((blue[0] - 0.075).abs() < 1e-6); // 10000 * 0.0000275 - 0.2
    assert_eq!(&blue[1..], &[NODATA, NODATA, NODATA]);

    let temp = image.band(bands::SURFACE_TEMP).unwrap();
    assert!((temp[0] - 177.2802).abs() < 1e-3); // 10000 * 0.00312802 + 146
}

/// Sentinel-2 QA60 mask and reflectance scaling
#[test]
fn test_sentinel2_mask_and_scale() {
    let raw_names = Sentinel2.raw_bands();
    let mut scene = RawScene {
        record: dummy_record(),
        geo: dummy_geo(2, 2),
        shape: (2, 2),
        bands: Vec::new(),
        qa: Vec::new(),
    };
    for &name in raw_names {
        scene.bands.push((name.to_string(), vec![5_000.0; 4]));
    }
    // px0 clear, px1 cloud, px2 cirrus, px3 clear
    scene
        .qa
        .push(("QA60".to_string(), vec![0, 1 << 10, 1 << 11, 0]));

    let image = Sentinel2.mask_and_scale(&scene).unwrap();
    assert_eq!(
        image.band_names(),
        ["blue", "green", "red", "nir", "rededge4", "watervapor", "swir1", "swir2"]
    );
    assert_eq!(image.band_names(), Sentinel2.canonical_bands());

    let nir = image.band(bands::NIR).unwrap();
    assert_eq!(nir, &[0.5, NODATA, NODATA, 0.5]);
}

/// A scene missing its quality band fails instead of passing unmasked pixels
#[test]
fn test_missing_qa_band_fails() {
    let scene = RawScene {
        record: dummy_record(),
        geo: dummy_geo(1, 1),
        shape: (1, 1),
        bands: vec![("B2".to_string(), vec![1.0])],
        qa: Vec::new(),
    };
    assert!(Sentinel2.mask_and_scale(&scene).is_err());
}
