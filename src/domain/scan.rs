use std::{fmt, str::FromStr};

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

const TEXT_PREVIEW_CHARS: usize = 30;
const IMAGE_PREVIEW_FALLBACK: &str = "Image Upload";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    Url,
    Text,
    Image,
}

impl ScanMode {
    pub const ALL: [ScanMode; 3] = [ScanMode::Url, ScanMode::Text, ScanMode::Image];

    pub fn as_str(self) -> &'static str {
        match self {
            ScanMode::Url => "url",
            ScanMode::Text => "text",
            ScanMode::Image => "image",
        }
    }
}

impl fmt::Display for ScanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScanMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ScanMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == wanted)
            .ok_or_else(|| format!("unknown scan mode: {wanted}"))
    }
}

/// An image picked for upload, already read into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// One row of the recent-activity list. Field names on disk match the
/// layout the web dashboard stored, so existing history files stay readable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanHistoryEntry {
    #[serde(rename = "type")]
    pub mode: ScanMode,
    #[serde(rename = "content")]
    pub content_preview: String,
    #[serde(rename = "result")]
    pub verdict_label: String,
    pub timestamp: String,
}

impl ScanHistoryEntry {
    pub fn new<Tz>(
        mode: ScanMode,
        content_preview: String,
        verdict_label: impl Into<String>,
        at: &DateTime<Tz>,
    ) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        Self {
            mode,
            content_preview,
            verdict_label: verdict_label.into(),
            timestamp: at.format("%H:%M").to_string(),
        }
    }
}

pub fn content_preview(mode: ScanMode, input: &str, file_name: Option<&str>) -> String {
    match mode {
        ScanMode::Url => input.to_string(),
        ScanMode::Text => {
            let mut chars = input.chars();
            let head: String = chars.by_ref().take(TEXT_PREVIEW_CHARS).collect();
            if chars.next().is_some() {
                format!("{head}...")
            } else {
                head
            }
        }
        ScanMode::Image => file_name
            .filter(|name| !name.is_empty())
            .unwrap_or(IMAGE_PREVIEW_FALLBACK)
            .to_string(),
    }
}
