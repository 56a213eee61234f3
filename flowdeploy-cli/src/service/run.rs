//! Pipeline run sinks
//!
//! A [`RunContext`] is the host pipeline's view of one run: a log stream the
//! operator reads and a place to attach the deployment report.

use flowdeploy_core::domain::report::DeploymentReport;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// File name of the JSON report artifact
pub const REPORT_FILE: &str = "deploy-report.json";
/// File name of the HTML summary artifact
pub const SUMMARY_FILE: &str = "deploy-summary.html";

/// Host pipeline run of one deploy step
pub trait RunContext {
    /// Write one line to the run's log stream
    fn log_line(&mut self, line: &str);

    /// Persist the report with the run
    ///
    /// Implementations must not leave a partial report behind when this
    /// returns an error.
    fn attach_report(&mut self, report: &DeploymentReport) -> io::Result<()>;
}

/// Run that logs to stdout and stores the report in a directory
pub struct ConsoleRun {
    report_dir: PathBuf,
    attached: Option<PathBuf>,
}

impl ConsoleRun {
    pub fn new(report_dir: impl Into<PathBuf>) -> Self {
        Self {
            report_dir: report_dir.into(),
            attached: None,
        }
    }

    /// Path of the JSON report, once attached
    pub fn attached_report(&self) -> Option<&Path> {
        self.attached.as_deref()
    }
}

impl RunContext for ConsoleRun {
    fn log_line(&mut self, line: &str) {
        println!("{}", line);
    }

    fn attach_report(&mut self, report: &DeploymentReport) -> io::Result<()> {
        // Render everything before touching the disk.
        let json = serde_json::to_string_pretty(report).map_err(io::Error::other)?;
        let html = report.summary_html();

        fs::create_dir_all(&self.report_dir)?;

        let summary_path = self.report_dir.join(SUMMARY_FILE);
        let report_path = self.report_dir.join(REPORT_FILE);

        let summary_tmp = stage_file(&summary_path, html.as_bytes())?;
        let report_tmp = match stage_file(&report_path, json.as_bytes()) {
            Ok(tmp) => tmp,
            Err(e) => {
                let _ = fs::remove_file(&summary_tmp);
                return Err(e);
            }
        };

        if let Err(e) = fs::rename(&summary_tmp, &summary_path) {
            let _ = fs::remove_file(&summary_tmp);
            let _ = fs::remove_file(&report_tmp);
            return Err(e);
        }
        // The JSON report is the artifact consumers look for; it goes last.
        if let Err(e) = fs::rename(&report_tmp, &report_path) {
            let _ = fs::remove_file(&report_tmp);
            let _ = fs::remove_file(&summary_path);
            return Err(e);
        }
        sync_dir(&self.report_dir)?;

        tracing::debug!("Report attached at {}", report_path.display());
        self.attached = Some(report_path);
        Ok(())
    }
}

/// Write `content` to a hidden sibling of `path` and return the sibling
fn stage_file(path: &Path, content: &[u8]) -> io::Result<PathBuf> {
    let parent = path
        .parent()
        .ok_or_else(|| io::Error::other("path has no parent"))?;
    let tmp_path = parent.join(format!(
        ".{}.tmp-{}-{}",
        path.file_name().and_then(|v| v.to_str()).unwrap_or("report"),
        std::process::id(),
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0),
    ));

    let written = fs::OpenOptions::new()
        .create_new(true)
        .write(true)
        .open(&tmp_path)
        .and_then(|mut file| {
            file.write_all(content)?;
            file.sync_all()
        });
    match written {
        Ok(()) => Ok(tmp_path),
        Err(e) => {
            let _ = fs::remove_file(&tmp_path);
            Err(e)
        }
    }
}

#[cfg(unix)]
fn sync_dir(dir: &Path) -> io::Result<()> {
    fs::File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}
