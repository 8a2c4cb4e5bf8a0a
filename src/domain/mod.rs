pub mod blob_source;
pub mod image_data_list;
pub mod image_selector;
pub mod loader;
pub mod page;
pub mod pdf_file;
pub mod pipeline;
pub mod raster;

// --- public re-exports ---
pub use blob_source::blob_source::BlobSource;
pub use page::html_page::HtmlPage;
pub use pipeline::{Pipeline, RunOutcome};
