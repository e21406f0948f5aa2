pub mod get_data;

pub use get_data::{GetDataError, GetDataQuery};
