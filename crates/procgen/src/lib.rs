//! Procedural tree generation: trunk lofting, branch and twig extrusion,
//! leaf planes and vertex coloring.

pub mod adjacency;
pub mod branch_faces;
pub mod coloring;
pub mod error;
pub mod generator;
pub mod growth;
pub mod host;
pub mod leaves;
pub mod params;
pub mod trunk;

pub use adjacency::*;
pub use branch_faces::*;
pub use coloring::*;
pub use error::*;
pub use generator::*;
pub use growth::*;
pub use host::*;
pub use leaves::*;
pub use params::*;
pub use trunk::*;
