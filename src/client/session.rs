//! Download results, session persistence and remote shutdown.

use serde_json::json;

use crate::error::Result;
use crate::types::Gid;

use super::Aria2Client;

impl Aria2Client {
    /// Drop completed, errored and removed downloads from aria2's memory
    pub async fn purge_download_results(&self) -> Result<()> {
        self.call_unit("aria2.purgeDownloadResult", vec![]).await
    }

    /// Drop one completed, errored or removed download from aria2's memory
    pub async fn remove_download_result(&self, gid: &Gid) -> Result<()> {
        self.call_unit("aria2.removeDownloadResult", vec![json!(gid)]).await
    }

    /// Save the session to the file named by aria2's `save-session` option
    pub async fn save_session(&self) -> Result<()> {
        self.call_unit("aria2.saveSession", vec![]).await
    }

    /// Shut down the remote aria2 process
    ///
    /// This does not close the client; call [`close`](Self::close) for that.
    pub async fn shutdown(&self) -> Result<()> {
        tracing::info!("requesting aria2 shutdown");
        self.call_unit("aria2.shutdown", vec![]).await
    }

    /// Shut down aria2 without unregistering from BitTorrent trackers first
    pub async fn force_shutdown(&self) -> Result<()> {
        tracing::info!("requesting forced aria2 shutdown");
        self.call_unit("aria2.forceShutdown", vec![]).await
    }
}
