//! Wire types of the classification service.

use darkscan_protocols::{Classification, ImageClassification};
use serde::{Deserialize, Serialize};

/// Text classification request.
#[derive(Debug, Serialize)]
pub struct TextRequest<'a> {
    pub text: &'a str,
}

/// Image classification request.
#[derive(Debug, Serialize)]
pub struct ImageRequest<'a> {
    pub image_link: &'a str,
}

/// Response of both prediction endpoints.
#[derive(Debug, Deserialize)]
pub struct PredictionResponse {
    pub predicted_class_index: u32,
    #[serde(default)]
    pub predicted_label: Option<String>,
    /// Image endpoint only.
    #[serde(default)]
    pub extracted_text: Option<String>,
}

impl PredictionResponse {
    pub fn into_classification(self) -> Classification {
        Classification {
            class_index: self.predicted_class_index,
            label: self.predicted_label,
        }
    }

    pub fn into_image_classification(mut self) -> ImageClassification {
        let extracted_text = self.extracted_text.take().unwrap_or_default();
        ImageClassification {
            classification: self.into_classification(),
            extracted_text,
        }
    }
}
