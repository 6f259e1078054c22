pub mod overlap;
pub mod vacation;

pub use vacation::VacationService;
