use bincode::{Decode, Encode};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// A closed retention time interval in seconds.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct RtRange {
    pub min: f64,
    pub max: f64,
}

impl RtRange {
    pub fn new(min: f64, max: f64) -> Self {
        RtRange { min, max }
    }

    /// The smallest range enclosing both `self` and `other`.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use msviz::data::trace::RtRange;
    /// let spanned = RtRange::new(0.0, 10.0).span(RtRange::new(5.0, 25.0));
    /// assert_eq!(spanned, RtRange::new(0.0, 25.0));
    /// ```
    pub fn span(self, other: RtRange) -> RtRange {
        RtRange {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn width(self) -> f64 {
        self.max - self.min
    }

    pub fn contains(self, rt: f64) -> bool {
        self.min <= rt && rt <= self.max
    }
}

/// An extracted ion chromatogram: the intensity of one mass over retention
/// time, sampled at the scans of its source file.
///
/// Stored as parallel vectors of equal length, one entry per scan. A `None`
/// intensity means the scan carries no data point for this mass; it still
/// occupies its slot so the baseline is represented at that retention time.
///
/// `rt_range` is the native acquisition range of the source file, which may
/// exceed the retention time extent of the samples themselves.
#[derive(Clone, Debug, Serialize, Deserialize, Encode, Decode)]
pub struct XicTrace {
    pub scan_ids: Vec<i32>,
    pub retention_times: Vec<f64>,
    pub intensities: Vec<Option<f64>>,
    pub rt_range: RtRange,
}

impl XicTrace {
    /// Constructs a new `XicTrace`.
    ///
    /// # Arguments
    ///
    /// * `scan_ids` - Scan identifiers, one per sample.
    /// * `retention_times` - Retention time per scan, in seconds.
    /// * `intensities` - Recorded intensity per scan, `None` where the scan
    ///   has no data point for this mass.
    /// * `rt_range` - Native acquisition range of the source file.
    pub fn new(
        scan_ids: Vec<i32>,
        retention_times: Vec<f64>,
        intensities: Vec<Option<f64>>,
        rt_range: RtRange,
    ) -> Self {
        XicTrace {
            scan_ids,
            retention_times,
            intensities,
            rt_range,
        }
    }

    /// Number of scans in this trace.
    pub fn len(&self) -> usize {
        self.scan_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scan_ids.is_empty()
    }

    /// The largest recorded intensity, or 0 when no intensity is recorded.
    pub fn max_intensity(&self) -> f64 {
        self.intensities
            .iter()
            .flatten()
            .copied()
            .max_by_key(|intensity| OrderedFloat(*intensity))
            .unwrap_or(0.0)
    }
}

/// Pixel coordinates of one trace silhouette, as parallel x and y vectors.
///
/// For a trace of n samples the polyline holds n + 2 points: the first and
/// last point are synthetic and pin the silhouette to the baseline row, so a
/// consumer can stroke or fill it directly.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct PixelPolyline {
    pub x: Vec<i32>,
    pub y: Vec<i32>,
}

impl PixelPolyline {
    pub fn new(x: Vec<i32>, y: Vec<i32>) -> Self {
        PixelPolyline { x, y }
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Iterates over the points as (x, y) pairs.
    pub fn points(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }
}
