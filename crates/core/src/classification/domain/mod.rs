pub mod classifier_state;
pub mod face_classifier;
pub mod frame_annotator;
pub mod frame_sampler;
pub mod frame_sink;
pub mod match_record;
