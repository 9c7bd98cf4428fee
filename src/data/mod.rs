pub mod export;
pub mod tables;

pub use export::{write_campaigns_csv, write_report_csv};
pub use tables::{read_csv, read_csv_table};
