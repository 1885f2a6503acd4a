pub mod chatbot;
pub mod email;

pub use chatbot::ChatbotSettingsService;
pub use email::EmailSettingsService;
