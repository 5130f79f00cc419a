use crate::model::Project;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const STORE_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct StoreFile {
    version: u32,
    projects: Vec<Project>,
}

pub fn data_dir() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("", "", "taskpad").context("locating data directory")?;
    Ok(dirs.data_dir().to_path_buf())
}

pub fn store_path() -> Result<PathBuf> {
    Ok(data_dir()?.join("projects.json"))
}

pub fn log_dir() -> Result<PathBuf> {
    Ok(data_dir()?.join("logs"))
}

pub fn load_projects(path: &Path) -> Option<Vec<Project>> {
    if !path.exists() {
        debug!("no store file at {:?}, starting fresh", path);
        return None;
    }
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(err) => {
            warn!("unreadable store file {:?}: {}", path, err);
            return None;
        }
    };
    let store: StoreFile = match serde_json::from_str(&data) {
        Ok(store) => store,
        Err(err) => {
            warn!("rejecting malformed store file {:?}: {}", path, err);
            return None;
        }
    };
    if store.version != STORE_VERSION {
        warn!(
            "rejecting store file {:?}: unsupported version {} (expected {})",
            path, store.version, STORE_VERSION
        );
        return None;
    }
    Some(store.projects)
}

pub fn save_projects(path: &Path, projects: &[Project]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("creating {:?}", parent))?;
    }
    let store = StoreFile {
        version: STORE_VERSION,
        projects: projects.to_vec(),
    };
    let serialized = serde_json::to_string_pretty(&store).context("serializing projects")?;
    fs::write(path, serialized).with_context(|| format!("writing {:?}", path))?;
    debug!("saved {} project(s) to {:?}", projects.len(), path);
    Ok(())
}
