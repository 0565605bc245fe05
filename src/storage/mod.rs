//! Flat-file storage: response artifacts and the persisted route table.

pub mod artifacts;
pub mod route_file;

pub use artifacts::ArtifactStore;
pub use route_file::RouteFile;
