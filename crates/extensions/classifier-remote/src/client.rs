//! HTTP client implementation.

use std::time::Duration;

use async_trait::async_trait;
use darkscan_config::ClassifierConfig;
use darkscan_protocols::{
    Classification, ClassifierError, FeedbackEvent, FeedbackSink, ImageClassification,
    ImageClassifier, TextClassifier,
};
use serde::Serialize;
use tracing::debug;

use crate::api::{ImageRequest, PredictionResponse, TextRequest};

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the remote classification service.
pub struct RemoteClassifier {
    text_url: String,
    image_url: String,
    feedback_url: String,
    client: reqwest::Client,
}

impl RemoteClassifier {
    pub fn new() -> Result<Self, ClassifierError> {
        Self::with_url(DEFAULT_BASE_URL)
    }

    /// Service at `base_url` with the default endpoint paths.
    pub fn with_url(base_url: &str) -> Result<Self, ClassifierError> {
        let config = ClassifierConfig {
            base_url: base_url.to_string(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            ..Default::default()
        };
        Self::from_config(&config)
    }

    pub fn from_config(config: &ClassifierConfig) -> Result<Self, ClassifierError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ClassifierError::Unavailable(e.to_string()))?;
        let base = config.base_url.trim_end_matches('/');
        Ok(Self {
            text_url: format!("{}{}", base, config.text_path),
            image_url: format!("{}{}", base, config.image_path),
            feedback_url: format!("{}{}", base, config.feedback_path),
            client,
        })
    }

    async fn post<T: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &T,
    ) -> Result<reqwest::Response, ClassifierError> {
        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| ClassifierError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(ClassifierError::Status { status, message });
        }

        Ok(response)
    }

    async fn predict<T: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &T,
    ) -> Result<PredictionResponse, ClassifierError> {
        self.post(url, body)
            .await?
            .json()
            .await
            .map_err(|e| ClassifierError::Decode(e.to_string()))
    }
}

#[async_trait]
impl TextClassifier for RemoteClassifier {
    async fn classify_text(&self, text: &str) -> Result<Classification, ClassifierError> {
        let response = self.predict(&self.text_url, &TextRequest { text }).await?;
        debug!(
            class_index = response.predicted_class_index,
            label = ?response.predicted_label,
            "Text classified"
        );
        Ok(response.into_classification())
    }
}

#[async_trait]
impl ImageClassifier for RemoteClassifier {
    async fn classify_image(&self, image_link: &str) -> Result<ImageClassification, ClassifierError> {
        let response = self.predict(&self.image_url, &ImageRequest { image_link }).await?;
        debug!(
            image = %image_link,
            class_index = response.predicted_class_index,
            "Image classified"
        );
        Ok(response.into_image_classification())
    }
}

#[async_trait]
impl FeedbackSink for RemoteClassifier {
    async fn send_feedback(&self, event: &FeedbackEvent) -> Result<(), ClassifierError> {
        let response = self.post(&self.feedback_url, event).await?;
        let body = response.text().await.unwrap_or_default();
        debug!(prediction = event.prediction.as_str(), response = %body, "Feedback delivered");
        Ok(())
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
