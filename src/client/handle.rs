//! A client bound to a single download.

use crate::error::Result;
use crate::types::{File, Gid, Options, Status};

use super::Aria2Client;

/// One download on a specific client
///
/// Obtained from [`Aria2Client::gid`]. Cheap to clone.
#[derive(Clone, Debug)]
pub struct GidHandle {
    client: Aria2Client,
    gid: Gid,
}

impl GidHandle {
    pub(crate) fn new(client: Aria2Client, gid: Gid) -> Self {
        Self { client, gid }
    }

    /// The download handle
    pub fn gid(&self) -> &Gid {
        &self.gid
    }

    /// Block until the download reaches a terminal state
    pub async fn wait(&self) -> Result<()> {
        self.client.wait_for_download(&self.gid).await
    }

    /// Progress of the download, restricted to `keys` when non-empty
    pub async fn tell_status(&self, keys: &[&str]) -> Result<Status> {
        self.client.tell_status(&self.gid, keys).await
    }

    /// Files of the download
    pub async fn get_files(&self) -> Result<Vec<File>> {
        self.client.get_files(&self.gid).await
    }

    /// Options of the download
    pub async fn get_options(&self) -> Result<Options> {
        self.client.get_options(&self.gid).await
    }

    /// Remove the download
    pub async fn remove(&self) -> Result<()> {
        self.client.remove(&self.gid).await
    }

    /// Remove the download without contacting trackers
    pub async fn force_remove(&self) -> Result<()> {
        self.client.force_remove(&self.gid).await
    }

    /// Remove the download and delete its files
    pub async fn delete(&self) -> Result<()> {
        self.client.delete(&self.gid).await
    }

    /// Pause the download
    pub async fn pause(&self) -> Result<()> {
        self.client.pause(&self.gid).await
    }

    /// Unpause the download
    pub async fn unpause(&self) -> Result<()> {
        self.client.unpause(&self.gid).await
    }
}

impl std::fmt::Display for GidHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.gid, f)
    }
}
