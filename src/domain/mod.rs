// Domain layer: BUX models and the admin API seam.

pub mod model;
pub mod ports;
