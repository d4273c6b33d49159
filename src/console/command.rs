use std::path::PathBuf;

use crate::domain::ScanMode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Mode(ScanMode),
    Input(String),
    File(PathBuf),
    Scan(Option<String>),
    Result,
    History,
    ClearHistory,
    Report(Option<PathBuf>),
    Status,
    Chat(String),
    Transcript,
    ResetChat,
    Quit,
    Invalid(String),
}

impl Command {
    /// Lines without a leading `/` go to the assistant. Blank lines yield `None`.
    pub fn parse(line: &str) -> Option<Command> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        let Some(body) = line.strip_prefix('/') else {
            return Some(Command::Chat(line.to_string()));
        };

        let (name, rest) = match body.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (body, ""),
        };
        let arg = (!rest.is_empty()).then(|| rest.to_string());

        let command = match name.to_ascii_lowercase().as_str() {
            "help" | "?" => Command::Help,
            "mode" => match rest.parse::<ScanMode>() {
                Ok(mode) => Command::Mode(mode),
                Err(_) => Command::Invalid("usage: /mode url|text|image".into()),
            },
            "input" => match arg {
                Some(text) => Command::Input(text),
                None => Command::Invalid("usage: /input <url or message>".into()),
            },
            "file" => match arg {
                Some(path) => Command::File(PathBuf::from(path)),
                None => Command::Invalid("usage: /file <path to screenshot>".into()),
            },
            "scan" => Command::Scan(arg),
            "result" => Command::Result,
            "history" => Command::History,
            "clear" | "clear-history" => Command::ClearHistory,
            "report" => Command::Report(arg.map(PathBuf::from)),
            "status" => Command::Status,
            "chat" => match arg {
                Some(text) => Command::Chat(text),
                None => Command::Transcript,
            },
            "reset-chat" => Command::ResetChat,
            "quit" | "exit" => Command::Quit,
            other => Command::Invalid(format!("unknown command /{other}; try /help")),
        };
        Some(command)
    }
}

pub const HELP: &str = "\
Scanner
  /mode url|text|image   switch scan mode (clears input, file and result)
  /input <value>         set the URL or message to scan
  /file <path>           select a screenshot (image mode)
  /scan [value]          scan the pending input, optionally setting it first
  /result                show the current result
  /history               recent activity (last 5 scans)
  /clear                 clear recent activity
  /report [path]         export a report for the current result
  /status                check the classifier service
Assistant
  <message>              ask the assistant anything
  /chat                  show the conversation
  /reset-chat            start a new conversation
  /quit                  leave";
