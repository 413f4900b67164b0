pub mod ffmpeg_reader;
pub mod http_video_resolver;
pub mod image_file_reader;
pub mod image_file_writer;
