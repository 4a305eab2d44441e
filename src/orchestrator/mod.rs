pub mod batch_processor;

pub use batch_processor::{extract_from_api, App, HarvestStats};
