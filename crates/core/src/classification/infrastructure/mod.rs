pub mod image_directory_sink;
