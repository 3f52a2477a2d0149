//! Emotion classifier client for the external `/classify` service.
//!
//! `classify` keeps the failure visible as a [`ClassifyError`]; `classify_or_general` is the
//! boundary the response generator uses, where every failure degrades to `general`.

use crate::config::HavenConfig;
use crate::emotion::GENERAL_LABEL;
use crate::error::ClassifyError;
use async_trait::async_trait;
use serde::Serialize;

#[async_trait]
pub trait EmotionClassifier: Send + Sync {
    /// Raw label, lowercased and trimmed. Not restricted to the known set.
    async fn classify(&self, text: &str) -> Result<String, ClassifyError>;

    async fn classify_or_general(&self, text: &str) -> String {
        match self.classify(text).await {
            Ok(label) => label,
            Err(e) => {
                tracing::warn!(
                    target: "haven::classifier",
                    error = %e,
                    "classification failed; using fallback label"
                );
                GENERAL_LABEL.to_string()
            }
        }
    }
}

#[derive(Serialize)]
struct ClassifyRequest<'a> {
    text: &'a str,
}

/// `POST {url}` with `{"text": ...}`; expects a bare JSON string in the body.
pub struct HttpEmotionClassifier {
    url: String,
    client: reqwest::Client,
}

impl HttpEmotionClassifier {
    /// `url` is the full endpoint, e.g. `https://host/classify`.
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(url, reqwest::Client::new())
    }

    pub fn with_client(url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            url: url.into(),
            client,
        }
    }

    pub fn from_config(config: &HavenConfig) -> Self {
        Self::new(config.classify_url())
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl EmotionClassifier for HttpEmotionClassifier {
    async fn classify(&self, text: &str) -> Result<String, ClassifyError> {
        let res = self
            .client
            .post(&self.url)
            .json(&ClassifyRequest { text })
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            return Err(ClassifyError::Status(status));
        }

        let raw: String = res
            .json()
            .await
            .map_err(|e| ClassifyError::Body(e.to_string()))?;
        let label = normalize_label(&raw);
        if label.is_empty() {
            return Err(ClassifyError::Body("empty label".to_string()));
        }
        tracing::debug!(target: "haven::classifier", label = %label, "classified");
        Ok(label)
    }
}

pub fn normalize_label(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn classifier_for(server: &MockServer) -> HttpEmotionClassifier {
        let cfg = HavenConfig {
            public_url: server.uri(),
            ..HavenConfig::default()
        };
        HttpEmotionClassifier::from_config(&cfg)
    }

    #[tokio::test]
    async fn label_is_trimmed_and_lowercased() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/classify"))
            .and(body_json(json!({ "text": "I got the job!" })))
            .respond_with(ResponseTemplate::new(200).set_body_json("  Joy\n"))
            .expect(1)
            .mount(&server)
            .await;

        let classifier = classifier_for(&server).await;
        assert_eq!(classifier.classify("I got the job!").await.unwrap(), "joy");
    }

    #[tokio::test]
    async fn server_error_degrades_to_general() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/classify"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let classifier = classifier_for(&server).await;
        assert!(matches!(
            classifier.classify("hello").await,
            Err(ClassifyError::Status(s)) if s.as_u16() == 500
        ));
        assert_eq!(classifier.classify_or_general("hello").await, GENERAL_LABEL);
    }

    #[tokio::test]
    async fn connection_error_degrades_to_general() {
        // reserve a port, then free it so nothing is listening there
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/classify", listener.local_addr().unwrap());
        drop(listener);

        let classifier = HttpEmotionClassifier::new(url);
        assert!(matches!(
            classifier.classify("hello").await,
            Err(ClassifyError::Transport(_))
        ));
        assert_eq!(classifier.classify_or_general("hello").await, GENERAL_LABEL);
    }

    #[tokio::test]
    async fn non_string_body_degrades_to_general() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/classify"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "label": "joy" })))
            .mount(&server)
            .await;

        let classifier = classifier_for(&server).await;
        assert!(matches!(classifier.classify("hi").await, Err(ClassifyError::Body(_))));
        assert_eq!(classifier.classify_or_general("hi").await, GENERAL_LABEL);
    }

    #[tokio::test]
    async fn unknown_label_passes_through_unchanged() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json("Neutral"))
            .mount(&server)
            .await;

        let classifier = classifier_for(&server).await;
        assert_eq!(classifier.classify_or_general("meh").await, "neutral");
    }
}
