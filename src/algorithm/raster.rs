use itertools::izip;
use log::debug;
use ordered_float::OrderedFloat;
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use serde::{Deserialize, Serialize};

use crate::data::trace::{PixelPolyline, RtRange, XicTrace};

/// A set of traces projected onto one pixel grid.
///
/// `polylines` is index-aligned with the input traces (a trace without
/// samples occupies its slot with an empty polyline), so a consumer cycling
/// through a fixed color palette by trace index gets reproducible colors.
/// `rt_range` and `max_intensity` describe the shared coordinate system all
/// polylines were projected with.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RasterizedXic {
    pub polylines: Vec<PixelPolyline>,
    pub rt_range: RtRange,
    pub max_intensity: f64,
}

impl RasterizedXic {
    fn empty() -> Self {
        RasterizedXic {
            polylines: Vec::new(),
            rt_range: RtRange::new(0.0, 0.0),
            max_intensity: 0.0,
        }
    }
}

/// Projects XIC traces onto a `width` x `height` pixel grid as
/// baseline-closed polylines.
///
/// A first pass over all traces establishes the shared coordinate system:
/// the maximum recorded intensity, and the span of the traces' native
/// acquisition ranges. Spanning the native ranges rather than the sample
/// extents means the displayed retention time range can exceed the extent
/// of the visible samples, matching the full acquisition of the source
/// files.
///
/// The second pass maps each sample to
/// `x = floor((rt - min) / range * (width - 1))` and
/// `y = (height - 1) - floor(intensity / max_intensity * (height - 1))`,
/// so full-scale intensity lands on row 0 and zero intensity on the
/// baseline row `height - 1`. A scan without a recorded intensity
/// contributes intensity 0 rather than a gap, keeping the baseline
/// represented at its retention time. Each polyline is closed with
/// synthetic baseline points before the first and after the last sample.
///
/// A zero-width retention time range maps every x to 0; a zero maximum
/// intensity maps every y to the baseline row. Both are explicit branches,
/// the arithmetic never divides by zero.
///
/// # Arguments
///
/// * `traces` - The traces to project; traces without samples keep their
///   slot in the output as an empty polyline.
/// * `width` - Grid width in pixels; every x falls in `[0, width - 1]`.
/// * `height` - Grid height in pixels; every y falls in `[0, height - 1]`.
///
/// # Returns
///
/// One polyline per input trace together with the shared coordinate system.
/// If no trace has samples, the polyline set is empty.
pub fn rasterize_traces(traces: &[XicTrace], width: usize, height: usize) -> RasterizedXic {
    // bounds pass over all traces
    let mut max_intensity: f64 = 0.0;
    let mut rt_range: Option<RtRange> = None;

    for trace in traces {
        if trace.is_empty() {
            continue;
        }
        max_intensity = *std::cmp::max(
            OrderedFloat(max_intensity),
            OrderedFloat(trace.max_intensity()),
        );
        rt_range = Some(match rt_range {
            Some(range) => range.span(trace.rt_range),
            None => trace.rt_range,
        });
    }

    let rt_range = match rt_range {
        Some(range) => range,
        None => return RasterizedXic::empty(),
    };

    debug!(
        "rasterizing {} traces onto {}x{} grid, rt range [{}, {}], max intensity {}",
        traces.len(),
        width,
        height,
        rt_range.min,
        rt_range.max,
        max_intensity
    );

    let x_scale = width.saturating_sub(1) as f64;
    let y_scale = height.saturating_sub(1) as f64;
    let baseline = height.saturating_sub(1) as i32;

    // projection pass, one polyline per trace
    let polylines = traces
        .iter()
        .map(|trace| {
            if trace.is_empty() {
                return PixelPolyline::default();
            }

            let mut sample_x = Vec::with_capacity(trace.len());
            let mut sample_y = Vec::with_capacity(trace.len());

            for (rt, intensity) in izip!(&trace.retention_times, &trace.intensities) {
                let rt_fraction = if rt_range.width() > 0.0 {
                    (rt - rt_range.min) / rt_range.width()
                } else {
                    0.0
                };
                // a scan without a data point counts as intensity 0
                let intensity_fraction = if max_intensity > 0.0 {
                    intensity.unwrap_or(0.0) / max_intensity
                } else {
                    0.0
                };

                sample_x.push((rt_fraction * x_scale).floor() as i32);
                sample_y.push(baseline - (intensity_fraction * y_scale).floor() as i32);
            }

            // close the silhouette down to the baseline at both ends
            let mut x = Vec::with_capacity(trace.len() + 2);
            let mut y = Vec::with_capacity(trace.len() + 2);
            x.push(sample_x[0]);
            y.push(baseline);
            x.extend_from_slice(&sample_x);
            y.extend_from_slice(&sample_y);
            x.push(sample_x[sample_x.len() - 1]);
            y.push(baseline);

            PixelPolyline::new(x, y)
        })
        .collect();

    RasterizedXic {
        polylines,
        rt_range,
        max_intensity,
    }
}

/// Rasterizes many trace groups in parallel, one grid per group.
///
/// A feature table redraw produces one group of aligned traces per table
/// row; the rows are independent, so they are fanned out over a dedicated
/// thread pool.
///
/// # Arguments
///
/// * `groups` - One vector of traces per output grid.
/// * `width` - Grid width in pixels.
/// * `height` - Grid height in pixels.
/// * `num_threads` - Number of threads to use for parallel processing.
pub fn rasterize_batch(
    groups: &[Vec<XicTrace>],
    width: usize,
    height: usize,
    num_threads: usize,
) -> Vec<RasterizedXic> {
    let pool = ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build()
        .unwrap();

    pool.install(|| {
        groups
            .par_iter()
            .map(|traces| rasterize_traces(traces, width, height))
            .collect()
    })
}
