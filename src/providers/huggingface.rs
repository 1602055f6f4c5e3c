use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{Classification, ThemeClassifier};
use crate::constants::{HF_API_TOKEN_ENV, HF_INFERENCE_HOST};
use crate::error::ThumbError;

/// Zero-shot theme classifier backed by the hosted Hugging Face inference API.
#[derive(Clone)]
pub struct HuggingFaceClassifier {
    client: reqwest::blocking::Client,
    endpoint: String,
    token: Option<String>,
}

impl std::fmt::Debug for HuggingFaceClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HuggingFaceClassifier")
            .field("endpoint", &self.endpoint)
            .field("authenticated", &self.token.is_some())
            .finish_non_exhaustive()
    }
}

#[derive(Serialize, Debug)]
struct ZeroShotRequest<'a> {
    inputs: &'a str,
    parameters: ZeroShotParameters<'a>,
}

#[derive(Serialize, Debug)]
struct ZeroShotParameters<'a> {
    candidate_labels: &'a [&'a str],
    multi_label: bool,
}

#[derive(Deserialize, Debug)]
struct LabelScore {
    label: String,
    score: f32,
}

/// The endpoint has answered in both shapes over time.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum ZeroShotResponse {
    Parallel {
        labels: Vec<String>,
        scores: Vec<f32>,
    },
    Scored(Vec<LabelScore>),
    Failed {
        error: String,
    },
}

impl HuggingFaceClassifier {
    /// Creates a classifier for `model`. Without an explicit token the
    /// `HF_API_TOKEN` environment variable is used, if set.
    pub fn new(token: Option<String>, model: &str) -> Self {
        let token = token
            .or_else(|| std::env::var(HF_API_TOKEN_ENV).ok())
            .filter(|token| !token.trim().is_empty());
        if token.is_none() {
            warn!(
                "No {} set, classification requests will be anonymous",
                HF_API_TOKEN_ENV
            );
        }
        Self {
            client: reqwest::blocking::Client::new(),
            endpoint: format!("{HF_INFERENCE_HOST}/{model}"),
            token,
        }
    }

    /// Points the classifier at a different inference URL.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

impl ThemeClassifier for HuggingFaceClassifier {
    fn classify(
        &self,
        text: &str,
        candidate_labels: &[&str],
    ) -> Result<Classification, ThumbError> {
        let body = ZeroShotRequest {
            inputs: text,
            parameters: ZeroShotParameters {
                candidate_labels,
                multi_label: true,
            },
        };

        debug!(
            "Classifying {} chars against {} labels via {}",
            text.len(),
            candidate_labels.len(),
            self.endpoint
        );
        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request.send()?;
        let status = response.status();
        let bytes = response.bytes()?;
        if !status.is_success() {
            return Err(ThumbError::Api {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).to_string(),
            });
        }
        parse_response(&bytes)
    }
}

fn parse_response(bytes: &[u8]) -> Result<Classification, ThumbError> {
    let parsed: ZeroShotResponse = serde_json::from_slice(bytes)?;
    let mut pairs = match parsed {
        ZeroShotResponse::Parallel { labels, scores } => {
            if labels.len() != scores.len() {
                return Err(ThumbError::Decode(format!(
                    "got {} labels but {} scores",
                    labels.len(),
                    scores.len()
                )));
            }
            labels.into_iter().zip(scores).collect::<Vec<_>>()
        }
        ZeroShotResponse::Scored(items) => items
            .into_iter()
            .map(|item| (item.label, item.score))
            .collect(),
        ZeroShotResponse::Failed { error } => return Err(ThumbError::Decode(error)),
    };

    pairs.sort_by(|a, b| b.1.total_cmp(&a.1));
    let (labels, scores) = pairs.into_iter().unzip();
    Ok(Classification { labels, scores })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::test_server::serve_once;

    #[test]
    fn parses_parallel_shape() {
        let body = br#"{"sequence":"x","labels":["technology","science"],"scores":[0.91,0.42]}"#;
        let result = parse_response(body).expect("parse parallel");
        assert_eq!(result.labels, vec!["technology", "science"]);
        assert_eq!(result.scores, vec![0.91, 0.42]);
    }

    #[test]
    fn parses_scored_list_and_sorts() {
        let body = br#"[{"label":"art","score":0.2},{"label":"food","score":0.8}]"#;
        let result = parse_response(body).expect("parse list");
        assert_eq!(result.labels, vec!["food", "art"]);
        assert_eq!(result.scores, vec![0.8, 0.2]);
    }

    #[test]
    fn rejects_mismatched_and_error_payloads() {
        assert!(matches!(
            parse_response(br#"{"labels":["a"],"scores":[]}"#),
            Err(ThumbError::Decode(_))
        ));
        assert!(matches!(
            parse_response(br#"{"error":"Model is currently loading"}"#),
            Err(ThumbError::Decode(message)) if message.contains("loading")
        ));
        assert!(parse_response(b"not json").is_err());
    }

    #[test]
    fn classifies_against_local_endpoint() {
        let (base, server) = serve_once(
            "200 OK",
            r#"{"labels":["science","art"],"scores":[0.8,0.6]}"#.to_string(),
        );
        let classifier = HuggingFaceClassifier::new(Some("hf-token".to_string()), "any/model")
            .with_endpoint(format!("{base}/models/zero-shot"));

        let result = classifier
            .classify("Stars and paint", &["science", "art"])
            .expect("classify");
        assert_eq!(result.labels, vec!["science", "art"]);

        let request = server.join().expect("server thread");
        assert!(request.starts_with("POST /models/zero-shot "), "{request}");
        assert!(request.to_ascii_lowercase().contains("authorization: bearer hf-token"));
        assert!(request.contains(r#""candidate_labels":["science","art"]"#));
    }

    #[test]
    fn error_status_becomes_api_error() {
        let (base, server) = serve_once(
            "503 Service Unavailable",
            r#"{"error":"Model is currently loading"}"#.to_string(),
        );
        let classifier = HuggingFaceClassifier::new(Some("hf-token".to_string()), "any/model")
            .with_endpoint(base);

        let result = classifier.classify("text", &["art"]);
        assert!(matches!(
            result,
            Err(ThumbError::Api { status: 503, ref body }) if body.contains("loading")
        ));
        server.join().expect("server thread");
    }

    #[test]
    fn request_body_shape() {
        let labels = ["technology", "art"];
        let body = ZeroShotRequest {
            inputs: "hello",
            parameters: ZeroShotParameters {
                candidate_labels: &labels,
                multi_label: true,
            },
        };
        let value = serde_json::to_value(&body).expect("serialize");
        assert_eq!(value["inputs"], "hello");
        assert_eq!(value["parameters"]["candidate_labels"][1], "art");
        assert_eq!(value["parameters"]["multi_label"], true);
    }
}
