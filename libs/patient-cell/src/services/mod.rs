pub mod patient;
pub mod search;

pub use patient::PatientDirectoryService;
pub use search::search_patients;
