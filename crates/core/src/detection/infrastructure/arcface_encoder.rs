/// ArcFace face encoder using ONNX Runtime.
///
/// Crops each face from the frame, resizes to the model's 112×112 input and
/// returns the L2-normalized embedding.
use std::path::Path;

use crate::detection::domain::face_encoder::FaceEncoder;
use crate::shared::face_encoding::FaceEncoding;
use crate::shared::face_location::FaceLocation;
use crate::shared::frame::Frame;

use super::execution_provider::preferred_execution_providers;

const INPUT_SIZE: usize = 112;
const NORM_MEAN: f32 = 127.5;
const NORM_STD: f32 = 127.5;

pub struct ArcFaceEncoder {
    session: ort::session::Session,
}

impl ArcFaceEncoder {
    pub fn new(model_path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let intra_threads = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let session = ort::session::Session::builder()?
            .with_optimization_level(ort::session::builder::GraphOptimizationLevel::Level3)?
            .with_inter_threads(1)?
            .with_intra_threads(intra_threads)?
            .with_execution_providers(preferred_execution_providers())?
            .commit_from_file(model_path)?;
        Ok(Self { session })
    }

    fn embed(&mut self, face: &Frame) -> Result<FaceEncoding, Box<dyn std::error::Error>> {
        let tensor = preprocess(face.data(), face.width(), face.height());
        let input_value = ort::value::Tensor::from_array(tensor)?;
        let outputs = self.session.run(ort::inputs![input_value])?;
        let embedding_array = outputs[0].try_extract_array::<f32>()?;
        let embedding_slice = embedding_array
            .as_slice()
            .ok_or("Cannot get embedding slice")?;
        Ok(FaceEncoding::normalized(embedding_slice.to_vec()))
    }
}

impl FaceEncoder for ArcFaceEncoder {
    fn encode(
        &mut self,
        frame: &Frame,
        locations: &[FaceLocation],
    ) -> Result<Vec<FaceEncoding>, Box<dyn std::error::Error>> {
        locations
            .iter()
            .map(|loc| {
                let face = frame
                    .crop(loc)
                    .ok_or_else(|| format!("Face box {loc:?} lies outside the frame"))?;
                self.embed(&face)
            })
            .collect()
    }
}

/// Resize crop to 112x112, normalize, NCHW layout.
fn preprocess(rgb_data: &[u8], width: u32, height: u32) -> ndarray::Array4<f32> {
    let src_w = width as usize;
    let src_h = height as usize;

    let mut tensor = ndarray::Array4::<f32>::zeros((1, 3, INPUT_SIZE, INPUT_SIZE));
    if src_w == 0 || src_h == 0 {
        return tensor;
    }

    for y in 0..INPUT_SIZE {
        let src_y = (((y as f64 + 0.5) * src_h as f64 / INPUT_SIZE as f64) as usize).min(src_h - 1);
        for x in 0..INPUT_SIZE {
            let src_x =
                (((x as f64 + 0.5) * src_w as f64 / INPUT_SIZE as f64) as usize).min(src_w - 1);
            let offset = (src_y * src_w + src_x) * 3;
            if offset + 2 < rgb_data.len() {
                for c in 0..3 {
                    tensor[[0, c, y, x]] = (rgb_data[offset + c] as f32 - NORM_MEAN) / NORM_STD;
                }
            }
        }
    }

    tensor
}
