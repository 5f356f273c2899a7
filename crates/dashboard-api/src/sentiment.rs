use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::error::ApiResult;
use crate::{build_http_client, endpoint, read_json};

/// Raw score as published by the sentiment service: usually a label
/// ("positive" / "negative" / "neutral"), occasionally a signed number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SentimentScore {
    Label(String),
    Value(f64),
}

impl Default for SentimentScore {
    fn default() -> Self {
        SentimentScore::Label(String::new())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentRecord {
    pub stock_symbol: String,
    #[serde(default)]
    pub sentiment_score: SentimentScore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    pub fn classify(score: &SentimentScore) -> Self {
        match score {
            SentimentScore::Label(label) => match label.as_str() {
                "positive" => SentimentLabel::Positive,
                "negative" => SentimentLabel::Negative,
                _ => SentimentLabel::Neutral,
            },
            SentimentScore::Value(v) if *v > 0.0 => SentimentLabel::Positive,
            SentimentScore::Value(v) if *v < 0.0 => SentimentLabel::Negative,
            SentimentScore::Value(_) => SentimentLabel::Neutral,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "Positive",
            SentimentLabel::Negative => "Negative",
            SentimentLabel::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl SentimentRecord {
    pub fn label(&self) -> SentimentLabel {
        SentimentLabel::classify(&self.sentiment_score)
    }
}

#[derive(Debug, Deserialize)]
struct SentimentsResponse {
    sentiments: Option<Vec<SentimentRecord>>,
}

#[derive(Clone)]
pub struct SentimentClient {
    client: reqwest::Client,
    base_url: String,
}

impl SentimentClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ApiResult<Self> {
        Ok(Self::with_client(build_http_client(timeout)?, base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Latest sentiment classification per stock.
    pub async fn list(&self) -> ApiResult<Vec<SentimentRecord>> {
        let url = endpoint(&self.base_url, &["api", "sentiments"])?;
        tracing::debug!(%url, "GET sentiments");

        let response = self.client.get(url).send().await?;
        let body: SentimentsResponse = read_json(response).await?;
        Ok(body.sentiments.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    #[test]
    fn labels_classify_exactly() {
        let classify = |s: &str| SentimentLabel::classify(&SentimentScore::Label(s.into()));
        assert_eq!(classify("positive"), SentimentLabel::Positive);
        assert_eq!(classify("negative"), SentimentLabel::Negative);
        assert_eq!(classify("neutral"), SentimentLabel::Neutral);
        assert_eq!(classify("Positive"), SentimentLabel::Neutral);
        assert_eq!(classify(""), SentimentLabel::Neutral);
    }

    #[test]
    fn numeric_scores_classify_by_sign() {
        let classify = |v: f64| SentimentLabel::classify(&SentimentScore::Value(v));
        assert_eq!(classify(0.42), SentimentLabel::Positive);
        assert_eq!(classify(-0.1), SentimentLabel::Negative);
        assert_eq!(classify(0.0), SentimentLabel::Neutral);
    }

    #[tokio::test]
    async fn list_decodes_mixed_scores() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/api/sentiments/");
                then.status(200).json_body(json!({
                    "sentiments": [
                        { "stock_symbol": "AAPL", "sentiment_score": "positive" },
                        { "stock_symbol": "TSLA", "sentiment_score": -0.8 },
                        { "stock_symbol": "IBM" }
                    ]
                }));
            })
            .await;

        let client = SentimentClient::with_client(reqwest::Client::new(), server.base_url());
        let records = client.list().await.unwrap();

        mock.assert_async().await;
        let labels: Vec<_> = records.iter().map(SentimentRecord::label).collect();
        assert_eq!(
            labels,
            vec![
                SentimentLabel::Positive,
                SentimentLabel::Negative,
                SentimentLabel::Neutral
            ]
        );
    }

    #[tokio::test]
    async fn missing_sentiments_field_is_empty() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/sentiments/");
                then.status(200).json_body(json!({}));
            })
            .await;

        let client = SentimentClient::with_client(reqwest::Client::new(), server.base_url());
        assert!(client.list().await.unwrap().is_empty());
    }
}
