use std::fs::{OpenOptions, create_dir_all};
use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::{DateTime, Utc};
use serde::Serialize;

use xmlseed_generate::{GenerateOptions, GenerationReport};

use super::{RegistryError, RegistryResult};

/// Metadata captured at run start.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub schema_path: PathBuf,
    pub schema_version: String,
    pub schema_fingerprint: Option<String>,
    pub settings_path: Option<PathBuf>,
    pub run_dir: PathBuf,
    pub out: Option<PathBuf>,
    pub options: GenerateOptions,
}

/// JSON config written to each run directory.
#[derive(Debug, Serialize)]
pub struct RunConfig {
    pub run_id: String,
    pub started_at: String,
    pub schema_path: String,
    pub schema_version: String,
    pub schema_fingerprint: Option<String>,
    pub settings_path: Option<String>,
    pub output_path: String,
    pub options: GenerateOptions,
    pub git: GitInfo,
}

/// Git metadata for reproducibility.
#[derive(Debug, Serialize)]
pub struct GitInfo {
    pub commit: Option<String>,
    pub dirty: Option<bool>,
}

/// Paths for run artifacts.
#[derive(Debug, Clone)]
pub struct RunPaths {
    pub root: PathBuf,
    pub logs_path: PathBuf,
    pub report_path: PathBuf,
    /// Where the sample document goes: `--out` when given, else `sample.xml`.
    pub output_path: PathBuf,
}

pub fn start_run(ctx: &RunContext) -> RegistryResult<RunPaths> {
    let timestamp = ctx.started_at.format("%Y-%m-%dT%H-%M-%SZ").to_string();
    let run_root = ctx
        .run_dir
        .join(format!("{timestamp}__run_{}", ctx.run_id));

    create_dir(&run_root)?;

    let config_path = run_root.join("config.json");
    let logs_path = run_root.join("logs.ndjson");
    let report_path = run_root.join("report.json");
    let output_path = match &ctx.out {
        Some(out) => {
            if let Some(parent) = out.parent()
                && !parent.as_os_str().is_empty()
            {
                create_dir(parent)?;
            }
            out.clone()
        }
        None => run_root.join("sample.xml"),
    };

    let config = RunConfig {
        run_id: ctx.run_id.clone(),
        started_at: ctx.started_at.to_rfc3339(),
        schema_path: ctx.schema_path.display().to_string(),
        schema_version: ctx.schema_version.clone(),
        schema_fingerprint: ctx.schema_fingerprint.clone(),
        settings_path: ctx
            .settings_path
            .as_ref()
            .map(|path| path.display().to_string()),
        output_path: output_path.display().to_string(),
        options: ctx.options.clone(),
        git: collect_git_info(),
    };

    write_json(&config_path, &config)?;

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&logs_path)
        .map_err(|source| RegistryError::Open {
            path: logs_path.clone(),
            source,
        })?;

    Ok(RunPaths {
        root: run_root,
        logs_path,
        report_path,
        output_path,
    })
}

pub fn write_report(paths: &RunPaths, report: &GenerationReport) -> RegistryResult<()> {
    write_json(&paths.report_path, report)
}

pub fn collect_git_info() -> GitInfo {
    let commit = Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .and_then(|output| {
            if output.status.success() {
                Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
            } else {
                None
            }
        })
        .filter(|value| !value.is_empty());

    let dirty = Command::new("git")
        .args(["status", "--porcelain"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .map(|output| !output.stdout.is_empty());

    GitInfo { commit, dirty }
}

fn create_dir(path: &Path) -> RegistryResult<()> {
    create_dir_all(path).map_err(|source| RegistryError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> RegistryResult<()> {
    let file = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(path)
        .map_err(|source| RegistryError::Open {
            path: path.to_path_buf(),
            source,
        })?;
    serde_json::to_writer_pretty(file, value).map_err(|source| RegistryError::Encode {
        path: path.to_path_buf(),
        source,
    })
}
