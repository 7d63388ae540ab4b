//! REDCap project metadata models.
//!
//! - **field**: data dictionary rows and their formatting category
//! - **choices**: choice list decoding
//! - **dictionary**: name-indexed data dictionary view
//! - **export**: checkbox expansion into export field names
//! - **events**: longitudinal event map
//! - **options** / **provenance**: formatting configuration

pub mod choices;
pub mod dictionary;
pub mod error;
pub mod events;
pub mod export;
pub mod field;
pub mod options;
pub mod provenance;

pub use choices::{Choice, parse_choices};
pub use dictionary::DataDictionary;
pub use error::{ChoiceParseError, DictionaryError, EventMapError};
pub use events::{EventDefinition, EventMap};
pub use export::{ExportFieldName, checkbox_column_name, export_field_names, field_export_names};
pub use field::{
    DateOrder, FieldCategory, FieldDefinition, FieldType, NON_DATA_TYPES, ValidationType,
};
pub use options::{EventSource, EventTranslation, FormatOptions};
pub use provenance::FormatProvenance;
