pub mod bounds;
pub mod drawing;
pub mod position;

pub use bounds::GeoBounds;
pub use drawing::{Drawing, DrawingId, DrawingKey, DrawingKind, MeasurementUnit};
pub use position::Position;
