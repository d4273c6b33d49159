use std::{io, path::Path, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use futures::stream::{FuturesUnordered, StreamExt};
use reqwest::Client;
use tokio::task::{JoinError, JoinHandle};

use crate::{
    assistant::ChatSession,
    classifier::{ClassifierError, HttpClassifier, ServiceStatus},
    config::AppConfig,
    console::{render, spawn_line_reader, Command, LineReceiver, HELP},
    domain::{ChatMessage, ScanMode, SelectedFile, VerdictRecord},
    history::{FileSlotStore, HistoryCache},
    infrastructure::{directories::ResolvedPaths, shutdown::Shutdown},
    report::ReportSynthesizer,
    scan::{ScanDesk, ScanError, CONNECTIVITY_ERROR},
};

/// How long a scan still in flight at shutdown may take to land in history.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

type ScanTask = JoinHandle<Result<Option<VerdictRecord>, ScanError>>;
type StatusTask = JoinHandle<Result<ServiceStatus, ClassifierError>>;

pub struct ShieldConsoleApp {
    paths: ResolvedPaths,
    desk: Arc<ScanDesk>,
    chat: ChatSession,
    classifier: Arc<HttpClassifier>,
    synthesizer: ReportSynthesizer,
    shutdown: Shutdown,
}

/// Background work started from the prompt; results are printed as they land.
#[derive(Default)]
struct InFlight {
    replies: FuturesUnordered<JoinHandle<ChatMessage>>,
    scans: FuturesUnordered<ScanTask>,
    status_checks: FuturesUnordered<StatusTask>,
}

enum Flow {
    Continue,
    Quit,
}

impl ShieldConsoleApp {
    pub fn initialize(config: AppConfig, paths: ResolvedPaths, shutdown: Shutdown) -> Result<Self> {
        let timezone = config.timezone;

        let http_client = Client::builder()
            .user_agent(format!("cybershield-client/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build HTTP client")?;
        let classifier = Arc::new(HttpClassifier::new(http_client, config.classifier.clone()));

        let store = FileSlotStore::new(&paths.data_dir);
        let history = HistoryCache::load(Box::new(store), config.directories.history_slot.clone());
        if !history.is_empty() {
            tracing::info!(target: "history", entries = history.len(), "recent activity restored");
        }

        let desk = Arc::new(ScanDesk::new(classifier.clone(), history, timezone));
        let chat = ChatSession::new(config.chat.reply_delay);
        let synthesizer = ReportSynthesizer::new(config.report.engine_label.clone(), timezone);

        tracing::info!(target: "lifecycle", report = %paths.report_path.display(), "console initialized");

        Ok(Self {
            paths,
            desk,
            chat,
            classifier,
            synthesizer,
            shutdown,
        })
    }

    pub async fn run(self) -> Result<()> {
        let input = spawn_line_reader(io::BufReader::new(io::stdin()))
            .context("failed to start stdin reader")?;
        self.run_with(input).await
    }

    async fn run_with(self, mut input: LineReceiver) -> Result<()> {
        let mut shutdown_listener = self.shutdown.subscribe();
        let mut in_flight = InFlight::default();

        println!("CYBERSHIELD AI  (type /help for commands)");
        if let Some(greeting) = self.chat.messages().first() {
            println!("{}", render::chat_line(greeting));
        }
        println!("mode: {}", self.desk.mode());

        loop {
            tokio::select! {
                _ = shutdown_listener.notified() => {
                    tracing::info!(target: "lifecycle", "shutdown requested");
                    break;
                }
                Some(reply) = in_flight.replies.next(), if !in_flight.replies.is_empty() => {
                    match reply {
                        Ok(message) => println!("{}", render::chat_line(&message)),
                        Err(err) => tracing::error!(target: "assistant", error = %err, "reply task failed"),
                    }
                }
                Some(done) = in_flight.scans.next(), if !in_flight.scans.is_empty() => {
                    self.report_scan(done);
                }
                Some(checked) = in_flight.status_checks.next(), if !in_flight.status_checks.is_empty() => {
                    report_status(checked);
                }
                line = input.recv() => {
                    let Some(line) = line else {
                        tracing::info!(target: "lifecycle", "stdin closed");
                        break;
                    };
                    let line = line.context("failed to read stdin")?;
                    let Some(command) = Command::parse(&line) else {
                        continue;
                    };
                    match self.dispatch(command, &mut in_flight).await {
                        Ok(Flow::Continue) => {}
                        Ok(Flow::Quit) => break,
                        Err(err) => {
                            tracing::error!(target: "lifecycle", error = %err, "command failed");
                            println!("error: {err:#}");
                        }
                    }
                }
            }
        }

        self.shutdown.trigger();
        self.drain_scans(&mut in_flight.scans).await;
        tracing::info!(target: "lifecycle", "console closed");
        Ok(())
    }

    async fn dispatch(&self, command: Command, in_flight: &mut InFlight) -> Result<Flow> {
        match command {
            Command::Help => println!("{HELP}"),
            Command::Mode(mode) => {
                self.desk.switch_mode(mode);
                println!("mode: {mode}");
            }
            Command::Input(text) => self.desk.set_input(text),
            Command::File(path) => self.select_file(&path).await?,
            Command::Scan(input) => {
                if let Some(input) = input {
                    self.desk.set_input(input);
                }
                if self.desk.is_busy() {
                    println!("a scan is already running");
                } else {
                    let desk = self.desk.clone();
                    in_flight.scans.push(tokio::spawn(async move { desk.scan().await }));
                    println!("ANALYZING...");
                }
            }
            Command::Result => match self.desk.current_result() {
                Some(scan) => println!("{}", render::result_panel(&scan)),
                None => match self.desk.last_error() {
                    Some(error) => println!("{error}"),
                    None => println!("{}", self.pending_summary()),
                },
            },
            Command::History => println!("{}", render::history_panel(&self.desk.history())),
            Command::ClearHistory => {
                self.desk.clear_history()?;
                println!("recent activity cleared");
            }
            Command::Report(path) => self.export_report(path.as_deref()).await?,
            Command::Status => {
                let classifier = self.classifier.clone();
                in_flight
                    .status_checks
                    .push(tokio::spawn(async move { classifier.status().await }));
                println!("checking classifier...");
            }
            Command::Chat(text) => {
                if let Some(handle) = self.chat.send(&text) {
                    in_flight.replies.push(handle);
                }
            }
            Command::Transcript => {
                tracing::debug!(target: "assistant", messages = self.chat.len(), "transcript shown");
                for message in self.chat.messages() {
                    println!("{}", render::chat_line(&message));
                }
                if self.chat.is_typing() {
                    println!("bot> ...");
                }
            }
            Command::ResetChat => {
                self.chat.reset();
                println!("conversation reset");
            }
            Command::Quit => return Ok(Flow::Quit),
            Command::Invalid(message) => println!("{message}"),
        }
        Ok(Flow::Continue)
    }

    fn report_scan(&self, done: Result<Result<Option<VerdictRecord>, ScanError>, JoinError>) {
        match done {
            Ok(Ok(Some(_))) => match self.desk.current_result() {
                Some(scan) => println!("{}", render::result_panel(&scan)),
                None => println!("scan finished after a mode switch; see /history"),
            },
            Ok(Ok(None)) => {}
            Ok(Err(ScanError::Busy)) => println!("a scan is already running"),
            Ok(Err(ScanError::Classifier(_))) => println!("{CONNECTIVITY_ERROR}"),
            Err(err) => tracing::error!(target: "scan", error = %err, "scan task failed"),
        }
    }

    /// Lets an in-flight scan record its verdict, bounded by [`SHUTDOWN_GRACE`].
    async fn drain_scans(&self, scans: &mut FuturesUnordered<ScanTask>) {
        if scans.is_empty() {
            return;
        }
        tracing::info!(target: "lifecycle", pending = scans.len(), "waiting for scans in flight");
        let drained = tokio::time::timeout(SHUTDOWN_GRACE, async {
            while let Some(done) = scans.next().await {
                self.report_scan(done);
            }
        })
        .await;
        if drained.is_err() {
            tracing::warn!(
                target: "lifecycle",
                "scan did not finish within {:?}; leaving without it",
                SHUTDOWN_GRACE
            );
        }
    }

    fn pending_summary(&self) -> String {
        let pending = match self.desk.mode() {
            ScanMode::Image => self.desk.selected_file_name(),
            ScanMode::Url | ScanMode::Text => Some(self.desk.input()).filter(|input| !input.is_empty()),
        };
        match pending {
            Some(pending) => format!("Awaiting scan: {pending}"),
            None => "Awaiting input...".to_string(),
        }
    }

    async fn select_file(&self, path: &Path) -> Result<()> {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        println!("selected {name} ({} bytes)", bytes.len());
        self.desk.select_file(SelectedFile::new(name, bytes));
        Ok(())
    }

    async fn export_report(&self, path: Option<&Path>) -> Result<()> {
        let Some(document) = self.desk.report(&self.synthesizer) else {
            println!("nothing to export yet; run a scan first");
            return Ok(());
        };
        let target = path.unwrap_or(&self.paths.report_path);
        tokio::fs::write(target, document)
            .await
            .with_context(|| format!("failed to write report to {}", target.display()))?;
        println!("report saved to {}", target.display());
        Ok(())
    }
}

fn report_status(checked: Result<Result<ServiceStatus, ClassifierError>, JoinError>) {
    match checked {
        Ok(Ok(status)) => println!("{}", render::status_line(&status)),
        Ok(Err(err)) => {
            tracing::warn!(target: "classifier", error = %err, "status check failed");
            println!("{CONNECTIVITY_ERROR}");
        }
        Err(err) => tracing::error!(target: "classifier", error = %err, "status task failed"),
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;
    use url::Url;

    use super::*;
    use crate::config::env::{
        ChatConfig, ClassifierConfig, DirectoryConfig, LoggingConfig, ReportConfig,
    };

    fn app_in(dir: &Path, shutdown: Shutdown) -> ShieldConsoleApp {
        app_with_classifier(dir, shutdown, Url::parse("http://127.0.0.1:9").unwrap(), Duration::from_millis(200))
    }

    fn app_with_classifier(dir: &Path, shutdown: Shutdown, base_url: Url, timeout: Duration) -> ShieldConsoleApp {
        let config = AppConfig {
            classifier: ClassifierConfig { base_url, timeout },
            directories: DirectoryConfig {
                logs_dir: dir.join("logs").display().to_string(),
                data_dir: dir.display().to_string(),
                history_slot: "scanHistory".into(),
            },
            logging: LoggingConfig { level: "info".into() },
            timezone: chrono_tz::Asia::Kolkata,
            chat: ChatConfig {
                reply_delay: Duration::from_millis(10),
            },
            report: ReportConfig {
                filename: "CyberShield_Report.txt".into(),
                engine_label: "Neural Net v2.4 (Indian Context)".into(),
            },
        };
        let paths = ResolvedPaths {
            logs_dir: dir.join("logs"),
            data_dir: dir.to_path_buf(),
            report_path: dir.join("CyberShield_Report.txt"),
        };
        ShieldConsoleApp::initialize(config, paths, shutdown).unwrap()
    }

    #[tokio::test]
    async fn shutdown_stops_the_console_while_a_read_is_pending() {
        let dir = tempfile::tempdir().unwrap();
        let shutdown = Shutdown::new();
        let app = app_in(dir.path(), shutdown.clone());

        // The sender stays alive, so input neither arrives nor closes.
        let (_stdin, input) = mpsc::channel(1);
        shutdown.trigger();

        let stopped = tokio::time::timeout(Duration::from_secs(5), app.run_with(input)).await;
        assert!(matches!(stopped, Ok(Ok(()))));
    }

    #[tokio::test]
    async fn quit_command_ends_the_session_and_signals_shutdown() {
        let dir = tempfile::tempdir().unwrap();
        let shutdown = Shutdown::new();
        let mut listener = shutdown.subscribe();
        let app = app_in(dir.path(), shutdown);

        let (stdin, input) = mpsc::channel(4);
        stdin.send(Ok("/mode text".to_string())).await.unwrap();
        stdin.send(Ok("/quit".to_string())).await.unwrap();

        let stopped = tokio::time::timeout(Duration::from_secs(5), app.run_with(input)).await;
        assert!(matches!(stopped, Ok(Ok(()))));
        listener.notified().await;
    }

    #[tokio::test]
    async fn slow_status_check_does_not_hold_up_the_prompt() {
        let dir = tempfile::tempdir().unwrap();
        // Accepts connections but never answers them.
        let silent = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = Url::parse(&format!("http://{}", silent.local_addr().unwrap())).unwrap();
        let app = app_with_classifier(dir.path(), Shutdown::new(), base, Duration::from_secs(60));

        let (stdin, input) = mpsc::channel(4);
        stdin.send(Ok("/status".to_string())).await.unwrap();
        stdin.send(Ok("/quit".to_string())).await.unwrap();

        let stopped = tokio::time::timeout(Duration::from_secs(5), app.run_with(input)).await;
        assert!(matches!(stopped, Ok(Ok(()))));
    }

    #[tokio::test]
    async fn closed_input_ends_the_session() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_in(dir.path(), Shutdown::new());
        let (stdin, input) = mpsc::channel::<io::Result<String>>(1);
        drop(stdin);

        let stopped = tokio::time::timeout(Duration::from_secs(5), app.run_with(input)).await;
        assert!(matches!(stopped, Ok(Ok(()))));
    }
}
