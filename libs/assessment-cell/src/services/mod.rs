pub mod assessment;
pub mod consultation;
pub mod stats;
pub mod treatment_plan;

pub use assessment::AssessmentService;
pub use consultation::ConsultationService;
pub use stats::{summarize, AssessmentStats};
pub use treatment_plan::TreatmentPlanService;
