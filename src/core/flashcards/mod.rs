pub mod flashcard_models;
pub mod flashcard_service;
pub mod grouping;
pub mod pleco_format;
pub mod sheet_parser;
pub mod tone;

pub use flashcard_models::FlashcardError;
pub use flashcard_service::build_import;
pub use pleco_format::import_file_name;
