// Adapters layer: concrete implementations for external systems (Scopus API, file storage, report formats).

pub mod scopus;
pub mod spreadsheet;
pub mod storage;
