pub mod document_provider;
pub mod html_page;
pub mod image_element;
