use std::collections::BTreeMap;
use std::fmt;
use std::fmt::{Display, Formatter};
use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// Represents a single centroided peak as a pair of m/z and intensity.
///
/// Two peaks with equal numeric values are still distinct entities; the
/// partitioning logic keeps track of peaks by position in the containing
/// mass list, never by numeric equality.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct MassPeak {
    pub mz: f64,
    pub intensity: f64,
}

impl MassPeak {
    pub fn new(mz: f64, intensity: f64) -> Self {
        MassPeak { mz, intensity }
    }
}

impl Display for MassPeak {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "MassPeak(mz: {}, intensity: {})", self.mz, self.intensity)
    }
}

/// A named list of peaks detected in one scan.
///
/// A scan can carry several mass lists, one per detector run, keyed by the
/// detector name. Peaks are kept in acquisition order.
#[derive(Clone, Debug, Serialize, Deserialize, Encode, Decode)]
pub struct MassList {
    pub name: String,
    pub peaks: Vec<MassPeak>,
}

impl MassList {
    /// Constructs a new `MassList`.
    ///
    /// # Arguments
    ///
    /// * `name` - Name of the mass detector that produced this list.
    /// * `peaks` - The detected peaks, in acquisition order.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use msviz::data::peak::{MassList, MassPeak};
    /// let masses = MassList::new("centroid".to_string(), vec![MassPeak::new(100.0, 10.0)]);
    /// assert_eq!(masses.len(), 1);
    /// ```
    pub fn new(name: String, peaks: Vec<MassPeak>) -> Self {
        MassList { name, peaks }
    }

    pub fn len(&self) -> usize {
        self.peaks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peaks.is_empty()
    }
}

/// Display mode a consumer should use for a spectrum plot.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize, Encode, Decode)]
pub enum PlotMode {
    Centroid,
    Continuous,
}

impl Display for PlotMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            PlotMode::Centroid => write!(f, "Centroid"),
            PlotMode::Continuous => write!(f, "Continuous"),
        }
    }
}

/// A minimal scan record backing the filter preview.
///
/// Holds the retention time, the centroided flag of the acquisition and the
/// mass lists produced for this scan, keyed by detector name.
#[derive(Clone, Debug, Serialize, Deserialize, Encode, Decode)]
pub struct Scan {
    pub scan_id: i32,
    pub retention_time: f64,
    pub centroided: bool,
    pub mass_lists: BTreeMap<String, MassList>,
}

impl Scan {
    pub fn new(scan_id: i32, retention_time: f64, centroided: bool) -> Self {
        Scan {
            scan_id,
            retention_time,
            centroided,
            mass_lists: BTreeMap::new(),
        }
    }

    /// Attaches a mass list to this scan, replacing any list of the same name.
    pub fn add_mass_list(&mut self, mass_list: MassList) {
        self.mass_lists.insert(mass_list.name.clone(), mass_list);
    }

    /// Returns the mass list with the given detector name, if present.
    pub fn mass_list(&self, name: &str) -> Option<&MassList> {
        self.mass_lists.get(name)
    }

    /// The display mode matching this scan's acquisition.
    pub fn plot_mode(&self) -> PlotMode {
        if self.centroided {
            PlotMode::Centroid
        } else {
            PlotMode::Continuous
        }
    }
}

/// Result of splitting a mass list under a filter: the peaks the filter kept
/// and the peaks it dropped, each in original acquisition order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct PartitionResult {
    pub retained: Vec<MassPeak>,
    pub removed: Vec<MassPeak>,
}

impl PartitionResult {
    /// Total number of peaks across both parts.
    pub fn len(&self) -> usize {
        self.retained.len() + self.removed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.retained.is_empty() && self.removed.is_empty()
    }
}
