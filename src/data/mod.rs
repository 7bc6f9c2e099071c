/// Dataset container and binary validation
pub mod dataset;
