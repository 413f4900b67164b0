pub mod image_writer;
pub mod video_reader;
pub mod video_source_resolver;
