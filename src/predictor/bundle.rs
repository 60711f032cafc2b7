//! Model input and output bundles
//!
//! An input bundle is the fixed-shape collection of named arrays the wave
//! model needs for one rollout, plus coordinate and time metadata. No
//! observational data is sourced: every field is a random placeholder.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use rand::RngExt;
use serde::{Deserialize, Serialize};

use crate::models::Location;

/// Surface fields the wave checkpoint declares as inputs
pub const SURFACE_FIELDS: [&str; 22] = [
    "mwd", "mwp", "pp1d", "shww", "mdww", "mpww", "shts", "2t", "10u", "10v", "swh", "mdts",
    "mpts", "swh1", "mwd1", "mwp1", "swh2", "mwd2", "mwp2", "10u_wave", "10v_wave", "wind",
];

/// Static fields (land-sea mask, soil type, geopotential, water body mask, latitude mask)
pub const STATIC_FIELDS: [&str; 5] = ["lsm", "slt", "z", "wmb", "lat_mask"];

/// Atmospheric fields, one slice per pressure level
pub const ATMOS_FIELDS: [&str; 3] = ["t", "q", "z"];

/// Pressure levels in hPa
pub const ATMOS_LEVELS: [u32; 4] = [1000, 850, 500, 200];

/// Time steps of history the model consumes (previous and current)
pub const HISTORY_LENGTH: usize = 2;

/// Single grid point per bundle
pub const GRID_DIM: usize = 1;

const BATCH_SIZE: usize = 1;

/// Hours between the two history steps
pub const HISTORY_STEP_HOURS: i64 = 6;

/// A dense row-major array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub shape: Vec<usize>,
    pub data: Vec<f32>,
}

impl Field {
    /// Wrap data, checking it matches the shape
    pub fn new(shape: Vec<usize>, data: Vec<f32>) -> Option<Self> {
        (shape.iter().product::<usize>() == data.len()).then_some(Self { shape, data })
    }

    /// Field of the given shape filled with values in `[-1, 1)`
    pub fn random<R: RngExt>(shape: &[usize], rng: &mut R) -> Self {
        let len = shape.iter().product();
        let data = (0..len).map(|_| rng.random_range(-1.0f32..1.0)).collect();
        Self {
            shape: shape.to_vec(),
            data,
        }
    }

    /// Element at a multi-dimensional index
    #[must_use]
    pub fn at(&self, index: &[usize]) -> Option<f32> {
        if index.len() != self.shape.len() {
            return None;
        }
        let mut offset = 0;
        for (&i, &dim) in index.iter().zip(&self.shape) {
            if i >= dim {
                return None;
            }
            offset = offset * dim + i;
        }
        self.data.get(offset).copied()
    }
}

/// Coordinates, pressure levels and history timestamps of a bundle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleMetadata {
    pub lat: Vec<f32>,
    /// Longitudes in `[0, 360)`
    pub lon: Vec<f32>,
    pub atmos_levels: Vec<u32>,
    /// Oldest first; the last entry is the valid time
    pub time: Vec<DateTime<Utc>>,
}

/// Model input for a single location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputBundle {
    pub surf_vars: BTreeMap<String, Field>,
    pub static_vars: BTreeMap<String, Field>,
    pub atmos_vars: BTreeMap<String, Field>,
    pub metadata: BundleMetadata,
}

impl InputBundle {
    /// Build a placeholder bundle centred on `location` with valid time `now`
    pub fn placeholder<R: RngExt>(location: &Location, now: DateTime<Utc>, rng: &mut R) -> Self {
        let surface_shape = [BATCH_SIZE, HISTORY_LENGTH, GRID_DIM, GRID_DIM];
        let static_shape = [BATCH_SIZE, GRID_DIM, GRID_DIM];
        let atmos_shape = [
            BATCH_SIZE,
            HISTORY_LENGTH,
            ATMOS_LEVELS.len(),
            GRID_DIM,
            GRID_DIM,
        ];

        let surf_vars = random_fields(&SURFACE_FIELDS, &surface_shape, rng);
        let static_vars = random_fields(&STATIC_FIELDS, &static_shape, rng);
        let atmos_vars = random_fields(&ATMOS_FIELDS, &atmos_shape, rng);

        let previous = now - Duration::hours(HISTORY_STEP_HOURS);

        Self {
            surf_vars,
            static_vars,
            atmos_vars,
            metadata: BundleMetadata {
                lat: vec![location.latitude as f32],
                lon: vec![location.grid_longitude() as f32],
                atmos_levels: ATMOS_LEVELS.to_vec(),
                time: vec![previous, now],
            },
        }
    }
}

fn random_fields<R: RngExt>(
    names: &[&str],
    shape: &[usize],
    rng: &mut R,
) -> BTreeMap<String, Field> {
    names
        .iter()
        .map(|name| (name.to_string(), Field::random(shape, rng)))
        .collect()
}

/// Time metadata of a predicted step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputMetadata {
    pub time: Vec<DateTime<Utc>>,
}

/// One predicted step as returned by a rollout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputBundle {
    pub surf_vars: BTreeMap<String, Field>,
    pub metadata: OutputMetadata,
}

impl OutputBundle {
    /// Value of a surface field at batch 0, predicted step 0, grid centre
    #[must_use]
    pub fn point_value(&self, name: &str) -> Option<f64> {
        self.surf_vars
            .get(name)?
            .at(&[0, 0, 0, 0])
            .map(f64::from)
    }

    /// Valid time of this step
    #[must_use]
    pub fn valid_time(&self) -> Option<DateTime<Utc>> {
        self.metadata.time.last().copied()
    }
}
