//! Conversion progress event types
//!
//! Wire format is one JSON object per line:
//! - `{"type":"progress","stage":"Extracting","progress":5,"message":"..."}`
//! - `{"type":"complete","downloadUrl":"/downloads/converted-project-....zip"}`
//! - `{"type":"error","error":"..."}`

use serde::{Deserialize, Serialize};

/// Pipeline stage, in emission order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ConversionStage {
    #[serde(rename = "Extracting")]
    Extracting,
    #[serde(rename = "Analyzing")]
    Analyzing,
    #[serde(rename = "Creating Structure")]
    CreatingStructure,
    #[serde(rename = "Converting HTML")]
    ConvertingHtml,
    #[serde(rename = "Processing Assets")]
    ProcessingAssets,
    #[serde(rename = "Setting up Auth Scaffold")]
    SettingUpAuthScaffold,
    #[serde(rename = "Finalizing")]
    Finalizing,
    #[serde(rename = "Packaging")]
    Packaging,
    #[serde(rename = "Complete")]
    Complete,
}

impl ConversionStage {
    /// All stages in order
    pub const ALL: [ConversionStage; 9] = [
        ConversionStage::Extracting,
        ConversionStage::Analyzing,
        ConversionStage::CreatingStructure,
        ConversionStage::ConvertingHtml,
        ConversionStage::ProcessingAssets,
        ConversionStage::SettingUpAuthScaffold,
        ConversionStage::Finalizing,
        ConversionStage::Packaging,
        ConversionStage::Complete,
    ];

    /// Percentage reported when the stage begins
    pub fn percent(self) -> u8 {
        match self {
            ConversionStage::Extracting => 5,
            ConversionStage::Analyzing => 10,
            ConversionStage::CreatingStructure => 20,
            ConversionStage::ConvertingHtml => 40,
            ConversionStage::ProcessingAssets => 60,
            ConversionStage::SettingUpAuthScaffold => 80,
            ConversionStage::Finalizing => 95,
            ConversionStage::Packaging => 98,
            ConversionStage::Complete => 100,
        }
    }

    /// Stage that follows this one (`None` for `Complete`)
    pub fn next(self) -> Option<ConversionStage> {
        let index = Self::ALL.iter().position(|s| *s == self)?;
        Self::ALL.get(index + 1).copied()
    }
}

/// Event streamed to the uploading client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ConversionEvent {
    Progress {
        stage: ConversionStage,
        /// 0-100, non-decreasing within one job
        progress: u8,
        message: String,
    },
    Complete {
        #[serde(rename = "downloadUrl")]
        download_url: String,
    },
    Error {
        error: String,
    },
}

impl ConversionEvent {
    /// `complete` and `error` end the stream
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ConversionEvent::Progress { .. })
    }
}
