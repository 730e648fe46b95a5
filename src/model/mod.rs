pub mod photo;
pub mod upload;
