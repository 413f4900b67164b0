pub mod constants;
pub mod download;
pub mod face_encoding;
pub mod face_location;
pub mod frame;
pub mod scan_config;
pub mod scan_error;
pub mod timestamp;
pub mod video_metadata;
