//! Reading REDCap export files and writing formatted records.
//!
//! Every reader takes a path to a CSV file as produced by the REDCap export
//! API or the project's download page.

pub mod csv_table;
pub mod dictionary;
pub mod events;
pub mod records;

pub use csv_table::{CsvTable, read_csv_table};
pub use dictionary::{load_data_dictionary, parse_data_dictionary};
pub use events::{load_event_map, parse_event_map};
pub use records::{read_records, write_records};
