pub mod extractor;
pub mod secret;
pub mod session;
pub mod test_utils;
pub mod validation;
