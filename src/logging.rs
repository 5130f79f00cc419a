use anyhow::{Context, Result};
use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming};
use std::fs;
use std::path::Path;

pub fn init(log_dir: &Path) -> Result<LoggerHandle> {
    fs::create_dir_all(log_dir)
        .with_context(|| format!("creating log directory {}", log_dir.display()))?;
    let handle = Logger::try_with_env_or_str("info")
        .context("parsing RUST_LOG filter")?
        .log_to_file(FileSpec::default().directory(log_dir).basename("taskpad"))
        .rotate(
            Criterion::Size(1024 * 1024),
            Naming::Numbers,
            Cleanup::KeepLogFiles(3),
        )
        .append()
        .start()
        .context("starting file logger")?;
    Ok(handle)
}
