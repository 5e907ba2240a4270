//! Remote classifier and feedback traits.

use async_trait::async_trait;

use crate::error::ClassifierError;
use crate::types::{Classification, FeedbackEvent, ImageClassification};

/// Statistical classifier consulted for text leaves the rules did not flag.
#[async_trait]
pub trait TextClassifier: Send + Sync {
    /// Classify a piece of text. Index 0 means no pattern.
    async fn classify_text(&self, text: &str) -> Result<Classification, ClassifierError>;
}

/// Classifier for leaf images, addressed by their source link.
#[async_trait]
pub trait ImageClassifier: Send + Sync {
    async fn classify_image(&self, image_link: &str)
    -> Result<ImageClassification, ClassifierError>;
}

/// Receiver of user judgments.
#[async_trait]
pub trait FeedbackSink: Send + Sync {
    async fn send_feedback(&self, event: &FeedbackEvent) -> Result<(), ClassifierError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Judgment;
    use std::sync::Mutex;

    struct KeywordClassifier;

    #[async_trait]
    impl TextClassifier for KeywordClassifier {
        async fn classify_text(&self, text: &str) -> Result<Classification, ClassifierError> {
            if text.contains("only") {
                Ok(Classification::new(2, "scarcity"))
            } else {
                Ok(Classification::background())
            }
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        events: Mutex<Vec<FeedbackEvent>>,
    }

    #[async_trait]
    impl FeedbackSink for RecordingSink {
        async fn send_feedback(&self, event: &FeedbackEvent) -> Result<(), ClassifierError> {
            self.events.lock().unwrap().push(event.clone());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_text_classifier_object_safe() {
        let classifier: Box<dyn TextClassifier> = Box::new(KeywordClassifier);
        let hit = classifier.classify_text("only 2 left").await.unwrap();
        assert!(hit.is_pattern());
        let miss = classifier.classify_text("hello").await.unwrap();
        assert!(!miss.is_pattern());
    }

    #[tokio::test]
    async fn test_feedback_sink_records() {
        let sink = RecordingSink::default();
        let event = FeedbackEvent {
            text: "Only 3 left".to_string(),
            prediction: Judgment::DarkPattern,
        };
        sink.send_feedback(&event).await.unwrap();
        assert_eq!(sink.events.lock().unwrap().len(), 1);
    }
}
