use serde::{Deserialize, Serialize};
use std::fmt;

use crate::prelude::DatasetId;

/// Successful upload acknowledgement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub dataset_id: DatasetId,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub filename: Option<String>,
}

/// Structured rejection returned when the service refuses a CSV.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UploadRejection {
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub required_columns: Option<Vec<String>>,
    #[serde(default)]
    pub found_columns: Option<Vec<String>>,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl UploadRejection {
    pub fn from_message(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            ..Default::default()
        }
    }

    /// Operator-facing text: the error, then the column hints and row errors
    /// when the service supplied them.
    pub fn hint_text(&self) -> String {
        let mut text = if self.error.is_empty() {
            "Failed to upload file. Please try again.".to_string()
        } else {
            self.error.clone()
        };
        if let Some(required) = &self.required_columns {
            text.push_str(&format!("\n\nRequired columns: {}", required.join(", ")));
        }
        if let Some(found) = &self.found_columns {
            text.push_str(&format!("\n\nFound columns: {}", found.join(", ")));
        }
        for row_error in &self.errors {
            text.push('\n');
            text.push_str(row_error);
        }
        text
    }
}

impl fmt::Display for UploadRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.error.is_empty() {
            write!(f, "upload failed")
        } else {
            write!(f, "{}", self.error)
        }
    }
}
