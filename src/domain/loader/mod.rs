pub mod library_loader;
pub mod trusted_types;
