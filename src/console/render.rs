use crate::{
    classifier::ServiceStatus,
    domain::{verdict::badge_label, ChatMessage, ScanHistoryEntry, Sender},
    scan::CompletedScan,
};

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";
const OCR_PREVIEW_CHARS: usize = 160;
const HISTORY_PREVIEW_CHARS: usize = 24;

pub fn result_panel(scan: &CompletedScan) -> String {
    let verdict = &scan.verdict;
    let safety = verdict.safety();
    let mut out = format!(
        "[{}] {} ({})\nCONFIDENCE: {}%",
        scan.mode.as_str().to_uppercase(),
        safety.headline(),
        verdict.label(),
        verdict.confidence_display()
    );
    if let Some(note) = verdict.note.as_deref() {
        out.push_str("\nNOTE: ");
        out.push_str(note);
    }
    if let Some(text) = verdict.extracted_text() {
        out.push_str("\nOCR EXTRACT: ");
        out.push_str(&truncate(text, OCR_PREVIEW_CHARS));
    }
    out
}

pub fn history_panel(entries: &[ScanHistoryEntry]) -> String {
    if entries.is_empty() {
        return "No recent scans.".to_string();
    }
    entries
        .iter()
        .map(|entry| {
            format!(
                "{:<5} {:>5}  {:<width$}  {}",
                entry.mode.as_str().to_uppercase(),
                entry.timestamp,
                truncate(&entry.content_preview, HISTORY_PREVIEW_CHARS),
                badge_label(&entry.verdict_label),
                width = HISTORY_PREVIEW_CHARS + 3,
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn chat_line(message: &ChatMessage) -> String {
    let who = match message.sender {
        Sender::User => "you",
        Sender::Bot => "bot",
    };
    format!("{who}> {}", emphasize(&message.text))
}

pub fn status_line(status: &ServiceStatus) -> String {
    let system = status.system.as_deref().unwrap_or("classifier");
    if status.is_online() {
        format!("{system} is online ({} endpoints)", status.endpoints.len())
    } else {
        format!(
            "{system} reported status {}",
            status.status.as_deref().unwrap_or("unknown")
        )
    }
}

/// `**x**` becomes bold; an unmatched marker is left as-is.
fn emphasize(text: &str) -> String {
    let parts: Vec<&str> = text.split("**").collect();
    if parts.len() % 2 == 0 {
        return text.to_string();
    }
    parts
        .iter()
        .enumerate()
        .map(|(i, part)| {
            if i % 2 == 1 {
                format!("{BOLD}{part}{RESET}")
            } else {
                part.to_string()
            }
        })
        .collect()
}

fn truncate(text: &str, max: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}
