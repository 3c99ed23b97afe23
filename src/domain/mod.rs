// Domain layer: value types and ports (interfaces) for the key-generation core.

pub mod model;
pub mod ports;
