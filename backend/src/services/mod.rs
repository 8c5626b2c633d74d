pub mod diagnostics_service;
pub mod progress_service;
pub mod progress_store;
pub mod word_selector;
