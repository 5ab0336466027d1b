pub mod backend;
pub mod loaders;
pub mod matrix;
pub mod point;
pub mod route;

pub use backend::{BackendRoute, BackendStop, BackendSummary};
pub use loaders::{ingest_addresses, load_addresses, AddressFormat, UploadedFile, MAX_ADDRESSES};
pub use matrix::{TimeMatrix, FAILED_CELL_MINUTES};
pub use point::GeocodedPoint;
pub use route::{RouteResult, RouteStop, RouteTag, Summary};
