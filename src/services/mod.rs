pub mod form_state;
pub mod logger;
pub mod templates;
