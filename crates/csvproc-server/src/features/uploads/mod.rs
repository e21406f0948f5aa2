pub mod commands;
pub mod routes;

pub use commands::{UploadCsvCommand, UploadCsvError, UploadCsvResponse};

pub use routes::uploads_routes;
