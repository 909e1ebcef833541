pub mod action_errors;
pub mod env;
pub mod suggest;
pub mod text;
