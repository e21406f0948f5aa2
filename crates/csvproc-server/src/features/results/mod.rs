pub mod queries;
pub mod routes;

pub use queries::{GetDataError, GetDataQuery};

pub use routes::results_routes;
