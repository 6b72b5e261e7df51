pub mod quake_map_pipeline;

pub use quake_map_pipeline::QuakeMapPipeline;
