pub mod address_loader;

pub use address_loader::{ingest_addresses, load_addresses, AddressFormat, UploadedFile, MAX_ADDRESSES};
