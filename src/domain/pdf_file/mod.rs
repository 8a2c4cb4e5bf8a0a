pub mod create_pdf;
pub mod file_name;
pub mod page_format;
pub mod renderer;
pub mod save_target;
