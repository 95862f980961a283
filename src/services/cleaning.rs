use camino::{Utf8Path, Utf8PathBuf};
use std::future::Future;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;

/// How a single cleaner invocation ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanStatus {
    Cleaned,
    /// Nonzero exit; `-1` when the process was killed by a signal
    Failed { exit_code: i32 },
    /// The cleaner could not be started at all
    LaunchFailed { reason: String },
}

/// One line of operator-facing output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportLine {
    Info(String),
    Error(String),
}

/// Result of running the cleaner against one plugin file
#[derive(Debug, Clone)]
pub struct CleanOutcome {
    pub path: Utf8PathBuf,
    pub status: CleanStatus,
    pub stdout_lines: Vec<String>,
    pub stderr_lines: Vec<String>,
    pub duration: Duration,
}

impl CleanOutcome {
    pub fn success(&self) -> bool {
        self.status == CleanStatus::Cleaned
    }

    /// Render the outcome as operator reports.
    ///
    /// Non-blank stdout lines come first as info. A success ends with
    /// `CLEANING DONE <path>`; a failure is followed by
    /// `CLEANING ERROR <code> <path>` and then every non-blank stderr line,
    /// all as errors.
    pub fn report_lines(&self) -> Vec<ReportLine> {
        let mut lines: Vec<ReportLine> = non_blank(&self.stdout_lines)
            .map(|line| ReportLine::Info(line.to_string()))
            .collect();

        match &self.status {
            CleanStatus::Cleaned => {
                lines.push(ReportLine::Info(format!("CLEANING DONE {}", self.path)));
            }
            CleanStatus::Failed { exit_code } => {
                lines.push(ReportLine::Error(format!(
                    "CLEANING ERROR {} {}",
                    exit_code, self.path
                )));
                lines.extend(non_blank(&self.stderr_lines).map(|l| ReportLine::Error(l.to_string())));
            }
            CleanStatus::LaunchFailed { reason } => {
                lines.push(ReportLine::Error(format!(
                    "CLEANING ERROR {}: {}",
                    self.path, reason
                )));
            }
        }

        lines
    }

    /// Write the reports to the log, one event per line
    pub fn emit(&self) {
        for line in self.report_lines() {
            match line {
                ReportLine::Info(text) => tracing::info!("{}", text),
                ReportLine::Error(text) => tracing::error!("{}", text),
            }
        }
    }
}

fn non_blank(lines: &[String]) -> impl Iterator<Item = &str> {
    lines
        .iter()
        .map(String::as_str)
        .filter(|line| !line.trim().is_empty())
}

fn split_output(bytes: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(bytes)
        .lines()
        .map(str::to_string)
        .collect()
}

/// Something that cleans one plugin file.
///
/// Implementations must never fail the run: problems are reported through
/// the returned [`CleanOutcome`].
pub trait PluginCleaner: Send + Sync {
    fn clean(&self, esp_path: &Utf8Path) -> impl Future<Output = CleanOutcome> + Send;
}

/// Runs `tes3cmd clean <plugin>` and captures both output streams.
#[derive(Debug, Clone)]
pub struct Tes3cmdCleaner {
    tool: String,
}

impl Tes3cmdCleaner {
    /// `tool` is either a bare command name looked up on `PATH` or a path
    pub fn new(tool: impl Into<String>) -> Self {
        Self { tool: tool.into() }
    }

    pub async fn run(&self, esp_path: &Utf8Path) -> CleanOutcome {
        tracing::debug!("Executing: {} clean {}", self.tool, esp_path);
        let start = Instant::now();

        let output = Command::new(&self.tool)
            .arg("clean")
            .arg(esp_path.as_str())
            .stdin(Stdio::null())
            .output()
            .await;

        let duration = start.elapsed();

        match output {
            Ok(output) => {
                let exit_code = output.status.code().unwrap_or(-1);
                tracing::debug!(
                    "{} completed in {:.2}s with exit code {}",
                    self.tool,
                    duration.as_secs_f32(),
                    exit_code
                );

                CleanOutcome {
                    path: esp_path.to_path_buf(),
                    status: if output.status.success() {
                        CleanStatus::Cleaned
                    } else {
                        CleanStatus::Failed { exit_code }
                    },
                    stdout_lines: split_output(&output.stdout),
                    stderr_lines: split_output(&output.stderr),
                    duration,
                }
            }
            Err(e) => CleanOutcome {
                path: esp_path.to_path_buf(),
                status: CleanStatus::LaunchFailed {
                    reason: format!("failed to launch {}: {}", self.tool, e),
                },
                stdout_lines: Vec::new(),
                stderr_lines: Vec::new(),
                duration,
            },
        }
    }
}

impl PluginCleaner for Tes3cmdCleaner {
    async fn clean(&self, esp_path: &Utf8Path) -> CleanOutcome {
        self.run(esp_path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(status: CleanStatus, stdout: &[&str], stderr: &[&str]) -> CleanOutcome {
        CleanOutcome {
            path: Utf8PathBuf::from("/data/Foo.esp"),
            status,
            stdout_lines: stdout.iter().map(|s| s.to_string()).collect(),
            stderr_lines: stderr.iter().map(|s| s.to_string()).collect(),
            duration: Duration::from_millis(5),
        }
    }

    #[test]
    fn test_success_reports() {
        let result = outcome(
            CleanStatus::Cleaned,
            &["Cleaning Foo.esp", "", "   ", "Cleaned 3 records"],
            &["ignored warning"],
        );

        assert!(result.success());
        assert_eq!(
            result.report_lines(),
            vec![
                ReportLine::Info("Cleaning Foo.esp".to_string()),
                ReportLine::Info("Cleaned 3 records".to_string()),
                ReportLine::Info("CLEANING DONE /data/Foo.esp".to_string()),
            ]
        );
    }

    #[test]
    fn test_failure_reports() {
        let result = outcome(
            CleanStatus::Failed { exit_code: 2 },
            &["Loading Foo.esp"],
            &["", "Master not found: Bar.esm"],
        );

        assert!(!result.success());
        assert_eq!(
            result.report_lines(),
            vec![
                ReportLine::Info("Loading Foo.esp".to_string()),
                ReportLine::Error("CLEANING ERROR 2 /data/Foo.esp".to_string()),
                ReportLine::Error("Master not found: Bar.esm".to_string()),
            ]
        );
    }

    #[test]
    fn test_launch_failure_reports() {
        let result = outcome(
            CleanStatus::LaunchFailed {
                reason: "failed to launch tes3cmd: not found".to_string(),
            },
            &[],
            &[],
        );
        let lines = result.report_lines();
        assert_eq!(lines.len(), 1);
        assert!(matches!(&lines[0], ReportLine::Error(text) if text.contains("/data/Foo.esp")));
    }

    #[test]
    fn test_split_output_handles_crlf_and_invalid_utf8() {
        let lines = split_output(b"one\r\ntwo\n\xff three\n");
        assert_eq!(lines, vec!["one", "two", "\u{fffd} three"]);
    }

    #[tokio::test]
    async fn test_missing_tool_is_launch_failure() {
        let cleaner = Tes3cmdCleaner::new("/nonexistent/omw-cleaner-test/tes3cmd");
        let result = cleaner.clean(Utf8Path::new("/data/Foo.esp")).await;
        assert!(matches!(result.status, CleanStatus::LaunchFailed { .. }));
        assert_eq!(result.path, Utf8PathBuf::from("/data/Foo.esp"));
    }
}
