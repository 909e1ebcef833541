//! Keeps an HTTP tool's url template and its structured parameter lists
//! (query parameters, path variables) consistent while either one is edited.

pub mod constants;
pub mod errors;
pub mod managers;
pub mod model;
pub mod rpc;
pub mod services;
pub mod stores;
pub mod sync;
pub mod utils;
