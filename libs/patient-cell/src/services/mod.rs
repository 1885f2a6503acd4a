pub mod communication;
pub mod patient;

pub use communication::CommunicationService;
pub use patient::PatientService;
