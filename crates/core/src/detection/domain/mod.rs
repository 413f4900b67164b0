pub mod encoding_comparator;
pub mod face_detector;
pub mod face_encoder;
