pub mod csv_stager;
pub mod sku_harvester;

pub use csv_stager::{CsvStager, CATEGORY_ERRORS, CATEGORY_MATCHES, CATEGORY_NO_RESPONSES};
pub use sku_harvester::harvest_sku;
