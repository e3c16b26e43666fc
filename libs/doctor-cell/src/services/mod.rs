pub mod availability;
pub mod branches;
pub mod directory;

pub use availability::AvailabilityService;
pub use branches::{distinct_branches, doctors_in_branch, match_branch};
pub use directory::DoctorDirectoryService;
