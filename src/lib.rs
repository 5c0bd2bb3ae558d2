// data module
pub mod data {
    pub mod peak;
    pub mod trace;
}

// algorithm module
pub mod algorithm {
    pub mod filter;
    pub mod partition;
    pub mod raster;
    pub mod preview;
}
