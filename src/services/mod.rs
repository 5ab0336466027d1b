pub mod comparison;
pub mod credentials;
pub mod export;
pub mod geocoder;
pub mod normalizer;
pub mod optimization;
pub mod progress;
pub mod time_matrix;
pub mod warn_writer;

pub use comparison::{compare, format_minutes, Comparison};
pub use credentials::{CredentialStatus, CredentialValidator};
pub use export::{to_csv, to_ics};
pub use geocoder::Geocoder;
pub use normalizer::normalize;
pub use optimization::{MockBackend, OptimizationGateway, OptimizationStrategy, RemoteBackend};
pub use progress::{ProgressReporter, ProgressSnapshot};
pub use time_matrix::TimeMatrixBuilder;
pub use warn_writer::{WarnStage, WarnWriter, Warning};
