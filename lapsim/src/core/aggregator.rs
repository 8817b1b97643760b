use serde::Serialize;
use std::collections::BTreeMap;

/// Minimum number of samples required for an aggregation.
pub const MIN_NO_SAMPLES: usize = 10;

/// Sample is recorded once per tick for the player vehicle.
///
/// * `speed` - (km/h) Speed at the end of the tick
/// * `acceleration` - (m/s^2) Speed change since the previous sample divided by the timestep
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sample {
    pub speed: f64,
    pub acceleration: f64,
}

/// * `speed_bucket_floor` - (km/h) Lower bound of the speed bucket (multiple of the bucket size)
/// * `avg_acceleration` - (m/s^2) Mean acceleration of all samples in the bucket
/// * `count` - Number of samples in the bucket
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketAggregate {
    pub speed_bucket_floor: f64,
    pub avg_acceleration: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Aggregate {
    Buckets(Vec<BucketAggregate>),
    InsufficientData { available: usize, required: usize },
}

impl Aggregate {
    pub fn buckets(&self) -> Option<&[BucketAggregate]> {
        match self {
            Aggregate::Buckets(buckets) => Some(buckets),
            Aggregate::InsufficientData { .. } => None,
        }
    }

    pub fn is_insufficient(&self) -> bool {
        matches!(self, Aggregate::InsufficientData { .. })
    }
}

/// ScatterTrace is the visualization-ready form of an aggregate: one marker per bucket with the
/// speed on the x axis, the mean acceleration on the y axis, and the number of occurrences on
/// the z axis.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScatterTrace {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
}

impl ScatterTrace {
    pub fn from_buckets(buckets: &[BucketAggregate]) -> ScatterTrace {
        ScatterTrace {
            x: buckets.iter().map(|b| b.speed_bucket_floor).collect(),
            y: buckets.iter().map(|b| b.avg_acceleration).collect(),
            z: buckets.iter().map(|b| b.count as f64).collect(),
        }
    }
}

/// aggregate groups the samples into speed buckets of width bucket_size (see bucketize). Fewer
/// than MIN_NO_SAMPLES samples yield InsufficientData, which callers should treat as "skip this
/// cycle" rather than as a failure.
pub fn aggregate(samples: &[Sample], bucket_size: f64) -> Aggregate {
    if samples.len() < MIN_NO_SAMPLES {
        return Aggregate::InsufficientData {
            available: samples.len(),
            required: MIN_NO_SAMPLES,
        };
    }

    Aggregate::Buckets(bucketize(samples, bucket_size))
}

/// bucketize returns the mean acceleration and the number of samples per speed bucket in
/// ascending bucket order. A sample belongs to the bucket floor(speed / bucket_size) *
/// bucket_size. Sums are built in sample order. bucket_size must be positive.
pub fn bucketize(samples: &[Sample], bucket_size: f64) -> Vec<BucketAggregate> {
    // buckets are keyed by their index to get an exact ordering key
    let mut buckets: BTreeMap<i64, (f64, usize)> = BTreeMap::new();

    for sample in samples.iter() {
        let key = (sample.speed / bucket_size).floor() as i64;
        let entry = buckets.entry(key).or_insert((0.0, 0));
        entry.0 += sample.acceleration;
        entry.1 += 1;
    }

    buckets
        .iter()
        .map(|(&key, &(sum, count))| BucketAggregate {
            speed_bucket_floor: key as f64 * bucket_size,
            avg_acceleration: sum / count as f64,
            count,
        })
        .collect()
}
