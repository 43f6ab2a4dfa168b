// Domain layer: report and chart models plus the ports the pipeline talks through.

pub mod metric;
pub mod model;
pub mod ports;
