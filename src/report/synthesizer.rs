use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use rand::Rng;

use crate::domain::{Safety, ScanMode, VerdictRecord};

use super::wrap::wrap;

pub const PAGE_WIDTH: usize = 72;
pub const PRODUCT_NAME: &str = "CYBERSHIELD AI";
pub const SUBTITLE: &str = "Automated Threat Analysis Report";
pub const CONTENT_HEADING: &str = "Analyzed Content:";
pub const IMAGE_PLACEHOLDER: &str = "[Image File Analyzed]";
pub const DISCLAIMER: &str = "Disclaimer: Generated by AI. Verify with official sources.";

const CONTENT_INDENT: &str = "  ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub fill: (u8, u8, u8),
    pub ink: (u8, u8, u8),
}

impl Palette {
    pub fn for_safety(safety: Safety) -> Self {
        match safety {
            Safety::Safe => Palette {
                fill: (220, 255, 220),
                ink: (0, 100, 0),
            },
            Safety::Threat => Palette {
                fill: (255, 220, 220),
                ink: (200, 0, 0),
            },
        }
    }
}

/// The two non-deterministic inputs of a report.
#[derive(Debug, Clone)]
pub struct ReportMeta {
    pub reference_id: u32,
    pub generated_at: DateTime<Tz>,
}

pub struct ReportSynthesizer {
    engine_label: String,
    timezone: Tz,
}

impl ReportSynthesizer {
    pub fn new(engine_label: impl Into<String>, timezone: Tz) -> Self {
        Self {
            engine_label: engine_label.into(),
            timezone,
        }
    }

    pub fn synthesize(&self, mode: ScanMode, raw_input: &str, verdict: &VerdictRecord) -> Vec<u8> {
        let meta = ReportMeta {
            reference_id: rand::thread_rng().gen_range(0..1_000_000),
            generated_at: Utc::now().with_timezone(&self.timezone),
        };
        tracing::info!(
            target: "report",
            reference_id = meta.reference_id,
            %mode,
            result = verdict.label(),
            "report generated"
        );
        self.render(&meta, mode, raw_input, verdict).into_bytes()
    }

    /// Header band, metadata, verdict box, content snippet, footer; always in
    /// that order.
    pub fn render(
        &self,
        meta: &ReportMeta,
        mode: ScanMode,
        raw_input: &str,
        verdict: &VerdictRecord,
    ) -> String {
        let safety = verdict.safety();
        let palette = Palette::for_safety(safety);
        let heavy = "=".repeat(PAGE_WIDTH);
        let border = format!("+{}+", "-".repeat(PAGE_WIDTH - 2));
        let inner = PAGE_WIDTH - 4;

        let mut lines = vec![
            heavy.clone(),
            PRODUCT_NAME.to_string(),
            SUBTITLE.to_string(),
            heavy,
            String::new(),
            format!("Reference ID: #{}", meta.reference_id),
            format!("Timestamp: {}", meta.generated_at.format("%Y-%m-%d %H:%M:%S %Z")),
            format!("Scanner Engine: {}", self.engine_label),
            String::new(),
            border.clone(),
        ];

        let boxed = [
            format!("VERDICT: {}", verdict.label()),
            format!("Confidence Score: {}%", verdict.confidence_display()),
            format!("Status: {}", safety.headline()),
            format!("Fill: rgb{:?}  Ink: rgb{:?}", palette.fill, palette.ink),
        ];
        lines.extend(boxed.into_iter().map(|line| {
            let pad = inner.saturating_sub(line.chars().count());
            format!("| {line}{} |", " ".repeat(pad))
        }));
        lines.push(border);
        lines.push(String::new());

        lines.push(CONTENT_HEADING.to_string());
        let body = content_body(mode, raw_input, verdict);
        lines.extend(
            wrap(&body, PAGE_WIDTH - CONTENT_INDENT.len())
                .into_iter()
                .map(|line| if line.is_empty() { line } else { format!("{CONTENT_INDENT}{line}") }),
        );
        lines.push(String::new());

        lines.push("-".repeat(PAGE_WIDTH));
        lines.push(DISCLAIMER.to_string());

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }
}

fn content_body(mode: ScanMode, raw_input: &str, verdict: &VerdictRecord) -> String {
    match mode {
        ScanMode::Image => match verdict.extracted_text() {
            Some(text) => format!("OCR Text: {text}"),
            None => IMAGE_PLACEHOLDER.to_string(),
        },
        ScanMode::Url | ScanMode::Text => raw_input.to_string(),
    }
}
