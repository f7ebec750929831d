//! Debug renderings of an assembled chart.

pub mod svg;
