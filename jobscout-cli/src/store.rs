//! State file
//!
//! Loads the client state as JSON between invocations. Several invocations
//! may run at once, so writes never replace the file wholesale: each one
//! takes an exclusive lock on a sidecar `.lock` file, reloads the snapshot,
//! changes only what it owns and writes the result back.
//!
//! Task-backed flows first [`claim`] their slot. The claim is persisted
//! right away, so a later run in another terminal takes the slot over and
//! the earlier run's [`commit`] is refused.

use anyhow::{Context, Result};
use fs2::FileExt;
use jobscout_client::{ClientState, Flow, StateSnapshot};
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

/// A run's ownership of one flow in the state file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Claim {
    flow: Flow,
    session: Uuid,
}

impl Claim {
    pub fn flow(&self) -> Flow {
        self.flow
    }
}

/// Loads the client state, starting empty when the file does not exist yet
pub fn load(path: &Path) -> Result<ClientState> {
    Ok(ClientState::from_snapshot(read(path)?))
}

/// Makes the calling run the only one allowed to write `flow`
pub fn claim(path: &Path, flow: Flow) -> Result<Claim> {
    let claim = Claim {
        flow,
        session: Uuid::new_v4(),
    };
    update(path, |snapshot| snapshot.claim(flow, claim.session))?;
    debug!("Claimed {} as session {}", flow, claim.session);
    Ok(claim)
}

/// Writes the flow value of `state` if `claim` still owns the flow
///
/// Returns `false` and leaves the file untouched when a newer run claimed
/// the flow in the meantime.
pub fn commit(path: &Path, claim: &Claim, state: &ClientState) -> Result<bool> {
    let source = state.snapshot();
    let mut committed = false;
    update(path, |snapshot| {
        committed = snapshot.commit(claim.flow, claim.session, &source);
    })?;
    Ok(committed)
}

/// Applies `change` to the saved snapshot under the file lock
pub fn update(path: &Path, change: impl FnOnce(&mut StateSnapshot)) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let _lock = lock(path)?;
    let mut snapshot = read(path)?;
    change(&mut snapshot);
    write(path, &snapshot)
}

/// Holds an exclusive lock until the returned file is dropped
fn lock(path: &Path) -> Result<File> {
    let lock_path = sidecar(path, "lock");
    let file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(&lock_path)
        .with_context(|| format!("Failed to open lock file {}", lock_path.display()))?;
    FileExt::lock_exclusive(&file)
        .with_context(|| format!("Failed to lock {}", lock_path.display()))?;
    Ok(file)
}

fn read(path: &Path) -> Result<StateSnapshot> {
    if !path.exists() {
        debug!("No state file at {}, starting fresh", path.display());
        return Ok(StateSnapshot::default());
    }

    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read state file {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| {
        format!(
            "State file {} is corrupt; delete it to start over",
            path.display()
        )
    })
}

// Readers do not lock, so the file is replaced by a rename
fn write(path: &Path, snapshot: &StateSnapshot) -> Result<()> {
    let text = serde_json::to_string_pretty(snapshot).context("Failed to encode state")?;
    let tmp = sidecar(path, "tmp");
    fs::write(&tmp, text).with_context(|| format!("Failed to write {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("Failed to write state file {}", path.display()))?;

    debug!("Saved state to {}", path.display());
    Ok(())
}

fn sidecar(path: &Path, extension: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}
