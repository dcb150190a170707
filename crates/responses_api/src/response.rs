use serde::Deserialize;

use crate::error::ResponsesApiError;

/// Subset of a Responses API response body needed to extract reply text.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResponsesResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub output: Vec<OutputItem>,
    #[serde(default)]
    pub output_text: Option<String>,
    #[serde(default)]
    pub error: Option<ResponseErrorBody>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResponseErrorBody {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputItem {
    Message {
        #[serde(default)]
        content: Vec<OutputContent>,
    },
    /// Reasoning, web search calls and any other item kinds.
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputContent {
    OutputText {
        text: String,
    },
    Refusal {
        refusal: String,
    },
    #[serde(other)]
    Other,
}

impl ResponsesResponse {
    /// Concatenated assistant text of this response.
    pub fn text(&self) -> Option<String> {
        if let Some(text) = self.output_text.as_deref().filter(|text| !text.is_empty()) {
            return Some(text.to_owned());
        }

        let mut text = String::new();
        for item in &self.output {
            let OutputItem::Message { content } = item else {
                continue;
            };
            for part in content {
                match part {
                    OutputContent::OutputText { text: part } => text.push_str(part),
                    OutputContent::Refusal { refusal } => text.push_str(refusal),
                    OutputContent::Other => {}
                }
            }
        }

        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// Maps a failed response or an empty reply to an error, otherwise returns the text.
    pub fn into_text(self) -> Result<String, ResponsesApiError> {
        if self.status.as_deref() == Some("failed") || self.error.is_some() {
            let error = self.error.unwrap_or(ResponseErrorBody {
                code: None,
                message: None,
            });
            return Err(ResponsesApiError::ResponseFailed {
                code: error.code,
                message: error
                    .message
                    .unwrap_or_else(|| "response failed without message".to_owned()),
            });
        }

        self.text()
            .ok_or(ResponsesApiError::EmptyOutput { status: self.status })
    }
}
