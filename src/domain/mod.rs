// Domain layer: GeoJSON input, map primitives, style rules and ports.

pub mod model;
pub mod ports;
pub mod style;
