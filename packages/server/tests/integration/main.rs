mod common;

mod gallery;
mod media;
mod paintings;
mod settings;
mod upload;
