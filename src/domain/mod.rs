// Domain layer: order model, wire document and ports. No I/O here.

pub mod document;
pub mod manual_entry;
pub mod model;
pub mod ports;
