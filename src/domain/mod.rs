// Domain layer: core models and ports (interfaces). No web or filesystem dependencies.

pub mod model;
pub mod ports;
