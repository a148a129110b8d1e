pub mod gallery;
pub mod painting;
pub mod settings;
pub mod sitemap;
pub mod upload;
