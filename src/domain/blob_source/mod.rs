pub mod blob_source;
pub mod directory_path;
pub mod path_error;
pub mod zip_file_path;
