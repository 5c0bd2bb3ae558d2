use log::debug;
use serde::{Deserialize, Serialize};

use crate::algorithm::filter::{FilterConfig, FilterError, FilterKind, FilterRegistry};
use crate::algorithm::partition::partition;
use crate::data::peak::{MassPeak, PlotMode, Scan};

/// Everything a preview plot needs to show the effect of a mass filter on
/// one scan: the surviving peaks, the dropped peaks, and the display mode
/// matching the scan's acquisition.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FilterPreview {
    pub retained: Vec<MassPeak>,
    pub removed: Vec<MassPeak>,
    pub plot_mode: PlotMode,
}

/// Computes the preview of a mass filter run over one scan.
///
/// Reads the mass list named by `config.mass_list_name` from the scan, runs
/// the registered filter and splits the list into retained and removed
/// peaks. A scan without that mass list produces no preview (`Ok(None)`);
/// that is a normal condition, not an error. Filter lookup and evaluation
/// failures abort the request.
///
/// # Arguments
///
/// * `scan` - The scan to preview, with its mass lists attached.
/// * `registry` - Table of available mass filters.
/// * `kind` - Which filter to run.
/// * `config` - Filter parameters, including the mass list name.
pub fn preview_mass_filtering(
    scan: &Scan,
    registry: &FilterRegistry,
    kind: FilterKind,
    config: &FilterConfig,
) -> Result<Option<FilterPreview>, FilterError> {
    let mass_list = match scan.mass_list(&config.mass_list_name) {
        Some(mass_list) => mass_list,
        None => {
            debug!(
                "scan {} has no mass list '{}', skipping preview",
                scan.scan_id, config.mass_list_name
            );
            return Ok(None);
        }
    };

    let filter = registry.get(kind)?;
    let result = partition(&mass_list.peaks, filter, config)?;

    Ok(Some(FilterPreview {
        retained: result.retained,
        removed: result.removed,
        plot_mode: scan.plot_mode(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::peak::MassList;

    fn scan_with_masses(centroided: bool) -> Scan {
        let mut scan = Scan::new(7, 130.5, centroided);
        scan.add_mass_list(MassList::new(
            "masses".to_string(),
            vec![
                MassPeak::new(100.0, 5.0),
                MassPeak::new(200.0, 50.0),
                MassPeak::new(300.0, 8.0),
            ],
        ));
        scan
    }

    #[test]
    fn test_preview_splits_mass_list() {
        let scan = scan_with_masses(true);
        let registry = FilterRegistry::default();
        let config = FilterConfig {
            noise_level: 10.0,
            ..FilterConfig::default()
        };

        let preview = preview_mass_filtering(
            &scan,
            &registry,
            FilterKind::IntensityThreshold,
            &config,
        )
        .unwrap()
        .unwrap();

        assert_eq!(preview.retained, vec![MassPeak::new(200.0, 50.0)]);
        assert_eq!(
            preview.removed,
            vec![MassPeak::new(100.0, 5.0), MassPeak::new(300.0, 8.0)]
        );
        assert_eq!(preview.plot_mode, PlotMode::Centroid);
    }

    #[test]
    fn test_preview_profile_scan_uses_continuous_mode() {
        let scan = scan_with_masses(false);
        let registry = FilterRegistry::default();
        let config = FilterConfig {
            noise_level: 0.0,
            ..FilterConfig::default()
        };

        let preview =
            preview_mass_filtering(&scan, &registry, FilterKind::IntensityThreshold, &config)
                .unwrap()
                .unwrap();
        assert_eq!(preview.plot_mode, PlotMode::Continuous);
    }

    #[test]
    fn test_preview_missing_mass_list() {
        let scan = Scan::new(1, 0.0, true);
        let registry = FilterRegistry::default();

        let preview = preview_mass_filtering(
            &scan,
            &registry,
            FilterKind::IntensityThreshold,
            &FilterConfig::default(),
        )
        .unwrap();
        assert!(preview.is_none());
    }

    #[test]
    fn test_preview_unknown_filter_aborts() {
        let scan = scan_with_masses(true);
        let registry = FilterRegistry::empty();

        let err = preview_mass_filtering(
            &scan,
            &registry,
            FilterKind::TopN,
            &FilterConfig::default(),
        )
        .unwrap_err();
        assert_eq!(err, FilterError::UnknownFilter(FilterKind::TopN));
    }
}
