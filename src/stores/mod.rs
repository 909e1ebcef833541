pub mod memory_form_store;

pub use memory_form_store::MemoryFormStore;
