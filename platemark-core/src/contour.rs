pub mod decompose;
pub mod raster;
