use std::collections::BTreeMap;
use std::fmt;
use std::fmt::{Display, Formatter};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::peak::MassPeak;

/// Configuration for mass list filtering
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Name of the mass list to read from the scan (default: "masses")
    pub mass_list_name: String,
    /// Minimum intensity a peak must reach to survive the intensity
    /// threshold filter (default: 10.0)
    pub noise_level: f64,
    /// Maximum number of peaks the top-n filter keeps (default: 150)
    pub take_top_n: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        FilterConfig {
            mass_list_name: "masses".to_string(),
            noise_level: 10.0,
            take_top_n: 150,
        }
    }
}

/// How a row aggregates the per-feature values of a data type.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub enum BindingKind {
    Sum,
    Average,
    Min,
    Max,
    Range,
    Count,
}

impl Display for BindingKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            BindingKind::Sum => write!(f, "Sum"),
            BindingKind::Average => write!(f, "Average"),
            BindingKind::Min => write!(f, "Min"),
            BindingKind::Max => write!(f, "Max"),
            BindingKind::Range => write!(f, "Range"),
            BindingKind::Count => write!(f, "Count"),
        }
    }
}

/// Errors raised by the filtering layer.
///
/// These are configuration or programming errors. They abort the single
/// request they occur in; there is nothing to retry.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum FilterError {
    /// A data type was asked for a row binding it does not define.
    #[error("data type {type_id} does not support binding {binding}")]
    UndefinedBinding {
        type_id: &'static str,
        binding: BindingKind,
    },
    /// No filter is registered under the requested kind.
    #[error("no mass filter registered for kind {0}")]
    UnknownFilter(FilterKind),
    /// A filter selected an index outside the input mass list.
    #[error("filter selected index {index} but the mass list holds {len} peaks")]
    SelectionOutOfRange { index: usize, len: usize },
}

/// Identifies a mass filter implementation in the registry.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub enum FilterKind {
    IntensityThreshold,
    TopN,
}

impl Display for FilterKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            FilterKind::IntensityThreshold => write!(f, "IntensityThreshold"),
            FilterKind::TopN => write!(f, "TopN"),
        }
    }
}

/// A keep/drop decision over a mass list.
///
/// Implementations select the retained peaks **by index** into the input
/// slice. Selecting by index rather than by value keeps equal-valued
/// duplicate peaks distinct across the retained/removed split.
pub trait MassFilter: Send + Sync {
    /// Indices of the peaks to retain. Order and duplicates in the returned
    /// vector are irrelevant; the caller sorts and deduplicates. Indices
    /// outside `peaks` are rejected by the caller as
    /// [`FilterError::SelectionOutOfRange`].
    fn retained_indices(
        &self,
        peaks: &[MassPeak],
        config: &FilterConfig,
    ) -> Result<Vec<usize>, FilterError>;

    fn name(&self) -> &'static str;
}

impl fmt::Debug for dyn MassFilter + '_ {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "MassFilter({})", self.name())
    }
}

/// Retains peaks whose intensity reaches `config.noise_level`.
pub struct IntensityThresholdFilter;

impl MassFilter for IntensityThresholdFilter {
    fn retained_indices(
        &self,
        peaks: &[MassPeak],
        config: &FilterConfig,
    ) -> Result<Vec<usize>, FilterError> {
        Ok(peaks
            .iter()
            .enumerate()
            .filter(|(_, peak)| peak.intensity >= config.noise_level)
            .map(|(index, _)| index)
            .collect())
    }

    fn name(&self) -> &'static str {
        "intensity threshold"
    }
}

/// Retains the `config.take_top_n` most intense peaks, ties broken towards
/// the earlier peak.
pub struct TopNFilter;

impl MassFilter for TopNFilter {
    fn retained_indices(
        &self,
        peaks: &[MassPeak],
        config: &FilterConfig,
    ) -> Result<Vec<usize>, FilterError> {
        if peaks.len() <= config.take_top_n {
            return Ok((0..peaks.len()).collect());
        }

        let mut indices: Vec<usize> = (0..peaks.len()).collect();
        indices.sort_by(|&a, &b| {
            peaks[b]
                .intensity
                .partial_cmp(&peaks[a].intensity)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.cmp(&b))
        });
        indices.truncate(config.take_top_n);

        Ok(indices)
    }

    fn name(&self) -> &'static str {
        "top n"
    }
}

/// Maps a [`FilterKind`] to its implementation.
///
/// Replaces lookup by runtime type with an explicit table; new filters are
/// added with [`FilterRegistry::register`].
pub struct FilterRegistry {
    filters: BTreeMap<FilterKind, Box<dyn MassFilter>>,
}

impl FilterRegistry {
    /// An empty registry with no filters.
    pub fn empty() -> Self {
        FilterRegistry {
            filters: BTreeMap::new(),
        }
    }

    pub fn register(&mut self, kind: FilterKind, filter: Box<dyn MassFilter>) {
        self.filters.insert(kind, filter);
    }

    /// Looks up the filter registered under `kind`.
    pub fn get(&self, kind: FilterKind) -> Result<&dyn MassFilter, FilterError> {
        self.filters
            .get(&kind)
            .map(|filter| filter.as_ref())
            .ok_or(FilterError::UnknownFilter(kind))
    }
}

impl Default for FilterRegistry {
    /// A registry holding the built-in filters.
    fn default() -> Self {
        let mut registry = FilterRegistry::empty();
        registry.register(FilterKind::IntensityThreshold, Box::new(IntensityThresholdFilter));
        registry.register(FilterKind::TopN, Box::new(TopNFilter));
        registry
    }
}
