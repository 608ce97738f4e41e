//! Persistent set of channels where the bot engages unconditionally.

use crate::error::Result;
use anyhow::Context as _;

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt as _;
use tokio::sync::RwLock;

/// Channel ids the bot always responds in, backed by a flat line-oriented
/// file: one channel id per line, loaded at startup, appended on add and
/// rewritten in full on remove.
#[derive(Debug)]
pub struct ActiveChannelSet {
    path: PathBuf,
    inner: RwLock<HashSet<u64>>,
}

impl ActiveChannelSet {
    /// Load the set from `path`. A missing file is an empty set.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let mut channels = HashSet::new();

        match std::fs::read_to_string(&path) {
            Ok(contents) => {
                for line in contents.lines() {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    match line.parse::<u64>() {
                        Ok(id) => {
                            channels.insert(id);
                        }
                        Err(error) => {
                            tracing::warn!(%error, line, "skipping malformed channel line");
                        }
                    }
                }
            }
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {}
            Err(error) => {
                return Err(anyhow::Error::new(error)
                    .context(format!("failed to read {}", path.display()))
                    .into());
            }
        }

        tracing::info!(count = channels.len(), path = %path.display(), "active channels loaded");

        Ok(Self {
            path,
            inner: RwLock::new(channels),
        })
    }

    /// Snapshot of the current set, for the engagement classifier.
    pub async fn snapshot(&self) -> HashSet<u64> {
        self.inner.read().await.clone()
    }

    pub async fn contains(&self, channel_id: u64) -> bool {
        self.inner.read().await.contains(&channel_id)
    }

    /// Toggle a channel's membership. Returns true when the channel is now
    /// active. The write lock is held across the file update so the file and
    /// the in-memory set cannot diverge under concurrent toggles.
    pub async fn toggle(&self, channel_id: u64) -> Result<bool> {
        let mut inner = self.inner.write().await;

        if inner.remove(&channel_id) {
            rewrite(&self.path, &inner).await?;
            Ok(false)
        } else {
            inner.insert(channel_id);
            append(&self.path, channel_id).await?;
            Ok(true)
        }
    }
}

async fn append(path: &Path, channel_id: u64) -> Result<()> {
    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .with_context(|| format!("failed to open {}", path.display()))?;

    file.write_all(format!("{channel_id}\n").as_bytes())
        .await
        .with_context(|| format!("failed to append to {}", path.display()))?;

    Ok(())
}

async fn rewrite(path: &Path, channels: &HashSet<u64>) -> Result<()> {
    let mut contents = String::new();
    for id in channels {
        contents.push_str(&format!("{id}\n"));
    }

    tokio::fs::write(path, contents)
        .await
        .with_context(|| format!("failed to rewrite {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join("musebot-channel-tests");
        std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
        dir.join(name)
    }

    #[tokio::test]
    async fn test_missing_file_is_empty_set() {
        let path = temp_path("missing.txt");
        let _ = std::fs::remove_file(&path);

        let set = ActiveChannelSet::load(&path).expect("load should succeed");
        assert!(set.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn test_toggle_persists_and_reloads() {
        let path = temp_path("toggle.txt");
        let _ = std::fs::remove_file(&path);

        let set = ActiveChannelSet::load(&path).expect("load should succeed");
        assert!(set.toggle(111).await.expect("toggle on"));
        assert!(set.toggle(222).await.expect("toggle on"));
        assert!(!set.toggle(111).await.expect("toggle off"));

        let reloaded = ActiveChannelSet::load(&path).expect("reload should succeed");
        assert!(!reloaded.contains(111).await);
        assert!(reloaded.contains(222).await);
    }

    #[tokio::test]
    async fn test_malformed_lines_are_skipped() {
        let path = temp_path("malformed.txt");
        std::fs::write(&path, "123\nnot-a-number\n\n456\n").expect("write fixture");

        let set = ActiveChannelSet::load(&path).expect("load should succeed");
        let snapshot = set.snapshot().await;
        assert_eq!(snapshot.len(), 2);
        assert!(snapshot.contains(&123));
        assert!(snapshot.contains(&456));
    }
}
