//! Indexed polygon mesh storage with region extrusion and host export.

pub mod buffer;
pub mod error;
pub mod export;
pub mod extrude;

pub use buffer::*;
pub use error::*;
pub use export::*;
pub use extrude::*;
