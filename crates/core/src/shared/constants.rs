pub const YOLO_MODEL_NAME: &str = "yolo11n-pose_widerface.onnx";
pub const YOLO_MODEL_URL: &str =
    "https://github.com/neutrinographics/faceguard/releases/download/v0.1.0/yolo11n-pose_widerface.onnx";

pub const EMBEDDING_MODEL_NAME: &str = "w600k_r50.onnx";
pub const EMBEDDING_MODEL_URL: &str =
    "https://github.com/neutrinographics/faceguard/releases/download/v0.1.0/w600k_r50.onnx";

/// Maximum encoding distance for two faces to count as the same person.
pub const DEFAULT_TOLERANCE: f64 = 0.6;

/// Classify every 20th frame when collecting unique faces.
pub const DEFAULT_DEDUP_SKIP_INTERVAL: usize = 20;

/// Classify every 5th frame when searching for a reference face.
pub const DEFAULT_MATCH_SKIP_INTERVAL: usize = 5;

pub const DEFAULT_OUTPUT_ROOT: &str = "output";

/// Hosts that serve watch pages rather than media files.
pub const UNSUPPORTED_VIDEO_HOSTS: &[&str] = &["youtube.com", "youtu.be"];

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];
