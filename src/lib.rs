pub mod config;
pub mod dataset;
pub mod query;
pub mod server;

pub use dataset::{Dataset, ParsePolicy, Record};
pub use query::{Filter, Page, PageRequest, QueryService};
