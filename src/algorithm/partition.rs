use log::debug;

use crate::algorithm::filter::{FilterConfig, FilterError, MassFilter};
use crate::data::peak::{MassPeak, PartitionResult};

/// Splits a mass list into retained and removed peaks under a filter.
///
/// The filter alone decides which peaks survive; this function only computes
/// the complement. The split is positional: the filter selects indices into
/// `peaks`, so every input peak lands in exactly one of the two outputs even
/// when several peaks carry identical (m/z, intensity) values. Both outputs
/// preserve acquisition order.
///
/// # Arguments
///
/// * `peaks` - The mass list, in acquisition order.
/// * `filter` - Keep/drop decision, usually taken from a
///   [`FilterRegistry`](crate::algorithm::filter::FilterRegistry).
/// * `config` - Filter parameters.
///
/// # Returns
///
/// The retained and removed peaks, or the filter's error. An index outside
/// `peaks` aborts the request with [`FilterError::SelectionOutOfRange`];
/// no partial result is produced.
///
/// # Example
///
/// ```rust
/// # use msviz::algorithm::filter::{FilterConfig, IntensityThresholdFilter};
/// # use msviz::algorithm::partition::partition;
/// # use msviz::data::peak::MassPeak;
/// let peaks = vec![MassPeak::new(100.0, 5.0), MassPeak::new(200.0, 50.0)];
/// let config = FilterConfig { noise_level: 10.0, ..FilterConfig::default() };
/// let result = partition(&peaks, &IntensityThresholdFilter, &config).unwrap();
/// assert_eq!(result.retained, vec![MassPeak::new(200.0, 50.0)]);
/// assert_eq!(result.removed, vec![MassPeak::new(100.0, 5.0)]);
/// ```
pub fn partition(
    peaks: &[MassPeak],
    filter: &dyn MassFilter,
    config: &FilterConfig,
) -> Result<PartitionResult, FilterError> {
    let mut indices = filter.retained_indices(peaks, config)?;
    indices.sort_unstable();
    indices.dedup();

    if let Some(&index) = indices.last() {
        if index >= peaks.len() {
            return Err(FilterError::SelectionOutOfRange {
                index,
                len: peaks.len(),
            });
        }
    }

    let mut retained = Vec::with_capacity(indices.len());
    let mut removed = Vec::with_capacity(peaks.len() - indices.len());

    let mut next_retained = indices.iter().copied().peekable();
    for (index, peak) in peaks.iter().enumerate() {
        if next_retained.peek() == Some(&index) {
            next_retained.next();
            retained.push(*peak);
        } else {
            removed.push(*peak);
        }
    }

    debug!(
        "filter '{}' retained {} of {} peaks",
        filter.name(),
        retained.len(),
        peaks.len()
    );

    Ok(PartitionResult { retained, removed })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Retains a fixed index set, standing in for an external predicate.
    struct FixedSelection(Vec<usize>);

    impl MassFilter for FixedSelection {
        fn retained_indices(
            &self,
            _peaks: &[MassPeak],
            _config: &FilterConfig,
        ) -> Result<Vec<usize>, FilterError> {
            Ok(self.0.clone())
        }

        fn name(&self) -> &'static str {
            "fixed selection"
        }
    }

    #[test]
    fn test_partition_complement_in_original_order() {
        // retain only (2, 20); removed must be [(1, 10), (3, 30)] in order
        let peaks = vec![
            MassPeak::new(1.0, 10.0),
            MassPeak::new(2.0, 20.0),
            MassPeak::new(3.0, 30.0),
        ];
        let result = partition(&peaks, &FixedSelection(vec![1]), &FilterConfig::default()).unwrap();

        assert_eq!(result.retained, vec![MassPeak::new(2.0, 20.0)]);
        assert_eq!(
            result.removed,
            vec![MassPeak::new(1.0, 10.0), MassPeak::new(3.0, 30.0)]
        );
    }

    #[test]
    fn test_partition_reconstructs_input() {
        let peaks = vec![
            MassPeak::new(100.0, 1.0),
            MassPeak::new(200.0, 2.0),
            MassPeak::new(300.0, 3.0),
            MassPeak::new(400.0, 4.0),
        ];
        let result =
            partition(&peaks, &FixedSelection(vec![0, 2]), &FilterConfig::default()).unwrap();

        assert_eq!(result.len(), peaks.len());
        // merging both parts back in index order reconstructs the input
        assert_eq!(
            result.retained,
            vec![MassPeak::new(100.0, 1.0), MassPeak::new(300.0, 3.0)]
        );
        assert_eq!(
            result.removed,
            vec![MassPeak::new(200.0, 2.0), MassPeak::new(400.0, 4.0)]
        );
    }

    #[test]
    fn test_partition_keeps_duplicate_peaks_distinct() {
        // two numerically identical peaks; retaining one must not drag the
        // other into the same output
        let peaks = vec![MassPeak::new(100.0, 10.0), MassPeak::new(100.0, 10.0)];
        let result = partition(&peaks, &FixedSelection(vec![0]), &FilterConfig::default()).unwrap();

        assert_eq!(result.retained.len(), 1);
        assert_eq!(result.removed.len(), 1);
    }

    #[test]
    fn test_partition_tolerates_unsorted_duplicate_selection() {
        let peaks = vec![
            MassPeak::new(1.0, 1.0),
            MassPeak::new(2.0, 2.0),
            MassPeak::new(3.0, 3.0),
        ];
        let result = partition(
            &peaks,
            &FixedSelection(vec![2, 0, 2]),
            &FilterConfig::default(),
        )
        .unwrap();

        assert_eq!(
            result.retained,
            vec![MassPeak::new(1.0, 1.0), MassPeak::new(3.0, 3.0)]
        );
        assert_eq!(result.removed, vec![MassPeak::new(2.0, 2.0)]);
    }

    #[test]
    fn test_partition_empty_input() {
        let result = partition(&[], &FixedSelection(vec![]), &FilterConfig::default()).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_partition_rejects_out_of_range_selection() {
        let peaks = vec![MassPeak::new(1.0, 1.0)];
        let err =
            partition(&peaks, &FixedSelection(vec![3]), &FilterConfig::default()).unwrap_err();
        assert_eq!(err, FilterError::SelectionOutOfRange { index: 3, len: 1 });
    }

    /// A predicate layer signalling an unsupported type/binding combination.
    struct BrokenBinding;

    impl MassFilter for BrokenBinding {
        fn retained_indices(
            &self,
            _peaks: &[MassPeak],
            _config: &FilterConfig,
        ) -> Result<Vec<usize>, FilterError> {
            Err(FilterError::UndefinedBinding {
                type_id: "mz",
                binding: crate::algorithm::filter::BindingKind::Range,
            })
        }

        fn name(&self) -> &'static str {
            "broken binding"
        }
    }

    #[test]
    fn test_partition_propagates_binding_error() {
        let peaks = vec![MassPeak::new(1.0, 1.0)];
        let err = partition(&peaks, &BrokenBinding, &FilterConfig::default()).unwrap_err();
        assert!(matches!(err, FilterError::UndefinedBinding { .. }));
    }
}
