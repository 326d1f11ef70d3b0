//! Download control: remove, pause, unpause and delete.

use serde_json::json;

use crate::error::Result;
use crate::types::Gid;
use crate::utils;

use super::Aria2Client;

impl Aria2Client {
    /// Remove a download
    ///
    /// An active download is stopped first; aria2 then emits `downloadStop`,
    /// which releases anyone waiting on it with `DownloadError::Stopped`.
    pub async fn remove(&self, gid: &Gid) -> Result<()> {
        self.call_unit("aria2.remove", vec![json!(gid)]).await
    }

    /// Remove a download without contacting BitTorrent trackers first
    pub async fn force_remove(&self, gid: &Gid) -> Result<()> {
        self.call_unit("aria2.forceRemove", vec![json!(gid)]).await
    }

    /// Pause a download
    ///
    /// Paused downloads stay in the waiting queue until unpaused.
    pub async fn pause(&self, gid: &Gid) -> Result<()> {
        self.call_unit("aria2.pause", vec![json!(gid)]).await
    }

    /// Pause every active and waiting download
    pub async fn pause_all(&self) -> Result<()> {
        self.call_unit("aria2.pauseAll", vec![]).await
    }

    /// Pause a download without contacting BitTorrent trackers first
    pub async fn force_pause(&self, gid: &Gid) -> Result<()> {
        self.call_unit("aria2.forcePause", vec![json!(gid)]).await
    }

    /// Force-pause every active and waiting download
    pub async fn force_pause_all(&self) -> Result<()> {
        self.call_unit("aria2.forcePauseAll", vec![]).await
    }

    /// Move a paused download back to the waiting state
    pub async fn unpause(&self, gid: &Gid) -> Result<()> {
        self.call_unit("aria2.unpause", vec![json!(gid)]).await
    }

    /// Unpause every paused download
    pub async fn unpause_all(&self) -> Result<()> {
        self.call_unit("aria2.unpauseAll", vec![]).await
    }

    /// Remove a download and delete its files
    ///
    /// Only the removal can fail. File paths are those reported by aria2, so
    /// deletion only has an effect when aria2 shares this host's filesystem;
    /// listing or deleting failures are logged and ignored.
    pub async fn delete(&self, gid: &Gid) -> Result<()> {
        self.remove(gid).await?;

        match self.get_files(gid).await {
            Ok(files) => {
                let removed = utils::remove_files(files.into_iter().map(|f| f.path)).await;
                tracing::debug!(gid = %gid, removed, "deleted download files");
            }
            Err(e) => {
                tracing::warn!(gid = %gid, error = %e, "could not list files of removed download");
            }
        }
        Ok(())
    }
}
