//! Gender prediction via the insightface `genderage` model on ONNX Runtime.
//!
//! The table consumes only the arg-max label; every failure degrades to
//! [`Gender::Unknown`] in [`predict_gender`].

use crate::types::{Gender, GenderScores};
use image::imageops::FilterType;
use image::DynamicImage;
use ndarray::Array4;
use ort::session::Session;
use ort::value::TensorRef;
use std::path::Path;
use thiserror::Error;

pub const GENDERAGE_MODEL_FILE: &str = "genderage.onnx";

const GENDERAGE_INPUT_SIZE: usize = 96;
// genderage.onnx folds normalization into the graph: raw 0-255 RGB in.
const GENDERAGE_MEAN: f32 = 0.0;
const GENDERAGE_STD: f32 = 1.0;
// Output layout: [female_logit, male_logit, age / 100].
const GENDERAGE_OUTPUT_LEN: usize = 3;

#[derive(Error, Debug)]
pub enum GenderError {
    #[error("model file not found: {0} (download genderage.onnx from insightface)")]
    ModelNotFound(String),
    #[error("no gender classifier configured")]
    Unavailable,
    #[error("image decode failed: {0}")]
    Image(#[from] image::ImageError),
    #[error("inference failed: {0}")]
    InferenceFailed(String),
    #[error("ort: {0}")]
    Ort(#[from] ort::Error),
}

/// Anything that can turn an image into a gender distribution.
pub trait GenderClassifier {
    /// Classify an already decoded image.
    fn classify_image(&mut self, image: &DynamicImage) -> Result<GenderScores, GenderError>;

    /// Decode the file at `path`, then classify it.
    fn classify(&mut self, path: &Path) -> Result<GenderScores, GenderError> {
        let decoded = image::open(path)?;
        self.classify_image(&decoded)
    }
}

impl<C: GenderClassifier + ?Sized> GenderClassifier for Box<C> {
    fn classify_image(&mut self, image: &DynamicImage) -> Result<GenderScores, GenderError> {
        (**self).classify_image(image)
    }

    fn classify(&mut self, path: &Path) -> Result<GenderScores, GenderError> {
        (**self).classify(path)
    }
}

/// Classify the decoded `image` loaded from `path` and keep only the
/// winning label. `path` identifies the image in the failure log.
pub fn predict_gender<C: GenderClassifier + ?Sized>(
    classifier: &mut C,
    path: &Path,
    image: &DynamicImage,
) -> Gender {
    match classifier.classify_image(image) {
        Ok(scores) => scores.label(),
        Err(e) => {
            tracing::warn!(image = %path.display(), error = %e, "error predicting gender");
            Gender::Unknown
        }
    }
}

/// Placeholder used when no model is installed.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoClassifier;

impl GenderClassifier for NoClassifier {
    fn classify_image(&mut self, _image: &DynamicImage) -> Result<GenderScores, GenderError> {
        Err(GenderError::Unavailable)
    }
}

/// insightface `genderage` classifier.
///
/// Runs on the whole image; no face detection gate is applied, so
/// non-face images still yield a (meaningless) label.
pub struct OnnxGenderClassifier {
    session: Session,
}

impl OnnxGenderClassifier {
    /// Load the genderage ONNX model from the given path.
    pub fn load(model_path: &str) -> Result<Self, GenderError> {
        if !Path::new(model_path).exists() {
            return Err(GenderError::ModelNotFound(model_path.to_string()));
        }

        let session = Session::builder()?
            .with_intra_threads(1)?
            .commit_from_file(model_path)?;

        tracing::info!(
            path = model_path,
            inputs = ?session.inputs().iter().map(|i| (i.name(), i.dtype())).collect::<Vec<_>>(),
            outputs = ?session.outputs().iter().map(|o| o.name()).collect::<Vec<_>>(),
            "loaded genderage model"
        );

        Ok(Self { session })
    }

    /// Resize to the model input and pack as a NCHW float tensor.
    fn preprocess(img: &DynamicImage) -> Array4<f32> {
        let size = GENDERAGE_INPUT_SIZE;
        let rgb = img
            .resize_exact(size as u32, size as u32, FilterType::Triangle)
            .to_rgb8();
        let mut tensor = Array4::<f32>::zeros((1, 3, size, size));

        for (x, y, pixel) in rgb.enumerate_pixels() {
            let (x, y) = (x as usize, y as usize);
            for c in 0..3 {
                tensor[[0, c, y, x]] = (pixel[c] as f32 - GENDERAGE_MEAN) / GENDERAGE_STD;
            }
        }

        tensor
    }
}

impl GenderClassifier for OnnxGenderClassifier {
    fn classify_image(&mut self, image: &DynamicImage) -> Result<GenderScores, GenderError> {
        let input = Self::preprocess(image);

        let outputs = self.session.run(ort::inputs![TensorRef::from_array_view(input.view())?])?;

        let (_, raw) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|e| GenderError::InferenceFailed(format!("genderage output: {e}")))?;

        if raw.len() < GENDERAGE_OUTPUT_LEN {
            return Err(GenderError::InferenceFailed(format!(
                "expected {GENDERAGE_OUTPUT_LEN} outputs, got {}",
                raw.len()
            )));
        }

        Ok(softmax_scores(raw[0], raw[1]))
    }
}

fn softmax_scores(female: f32, male: f32) -> GenderScores {
    let max = female.max(male);
    let f = (female - max).exp();
    let m = (male - max).exp();
    let sum = f + m;
    GenderScores {
        woman: f / sum,
        man: m / sum,
    }
}
