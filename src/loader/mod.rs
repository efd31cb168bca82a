pub mod library;
pub mod sample_loader;
