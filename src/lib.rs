// Library exports for svgc

pub mod artifact;
pub mod csv_reader;
pub mod data;
pub mod dispatch;
pub mod filter;
pub mod format;
pub mod histogram;
pub mod options;
pub mod palette;
pub mod scale;
pub mod scatter;
pub mod state;
pub mod svg;
pub mod ticks;
