//! Market-data source adapters.

mod yahoo;

pub use yahoo::{YahooAdapter, YahooCrumbManager};
