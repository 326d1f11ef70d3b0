//! Queries: download status, queue inspection and global information.

use serde_json::json;

use crate::error::{Error, Result};
use crate::types::{
    File, FileServers, Gid, Peer, PositionHow, SessionInfo, Stats, Status, Uri, VersionInfo,
};

use super::{Aria2Client, push_keys};

impl Aria2Client {
    /// Progress of a download
    ///
    /// With a non-empty `keys` only those fields are returned; the others keep
    /// their defaults.
    pub async fn tell_status(&self, gid: &Gid, keys: &[&str]) -> Result<Status> {
        let mut params = vec![json!(gid)];
        push_keys(&mut params, keys);
        self.call("aria2.tellStatus", params).await
    }

    /// URIs used by a download
    pub async fn get_uris(&self, gid: &Gid) -> Result<Vec<Uri>> {
        self.call("aria2.getUris", vec![json!(gid)]).await
    }

    /// Files of a download
    pub async fn get_files(&self, gid: &Gid) -> Result<Vec<File>> {
        self.call("aria2.getFiles", vec![json!(gid)]).await
    }

    /// Peers of a BitTorrent download
    pub async fn get_peers(&self, gid: &Gid) -> Result<Vec<Peer>> {
        self.call("aria2.getPeers", vec![json!(gid)]).await
    }

    /// Servers currently connected for each file of an HTTP(S)/FTP/SFTP download
    pub async fn get_servers(&self, gid: &Gid) -> Result<Vec<FileServers>> {
        self.call("aria2.getServers", vec![json!(gid)]).await
    }

    /// Active downloads
    pub async fn tell_active(&self, keys: &[&str]) -> Result<Vec<Status>> {
        let mut params = Vec::new();
        push_keys(&mut params, keys);
        self.call("aria2.tellActive", params).await
    }

    /// Waiting downloads, including paused ones
    ///
    /// A non-negative `offset` returns the range `[offset, offset + num)` from
    /// the front of the queue. A negative offset counts from the back
    /// (`-1` is the last download) and the result is in reverse order.
    pub async fn tell_waiting(&self, offset: i64, num: u32, keys: &[&str]) -> Result<Vec<Status>> {
        let mut params = vec![json!(offset), json!(num)];
        push_keys(&mut params, keys);
        self.call("aria2.tellWaiting", params).await
    }

    /// Stopped downloads, with the same offset rules as [`tell_waiting`](Self::tell_waiting)
    pub async fn tell_stopped(&self, offset: i64, num: u32, keys: &[&str]) -> Result<Vec<Status>> {
        let mut params = vec![json!(offset), json!(num)];
        push_keys(&mut params, keys);
        self.call("aria2.tellStopped", params).await
    }

    /// Move a download within the waiting queue and return its new position
    ///
    /// Destinations before the start or past the end clamp to the queue bounds.
    pub async fn change_position(&self, gid: &Gid, pos: i64, how: PositionHow) -> Result<i64> {
        let params = vec![json!(gid), json!(pos), json!(how)];
        self.call("aria2.changePosition", params).await
    }

    /// Remove `del_uris` from and append `add_uris` to the file at
    /// `file_index` (1-based)
    ///
    /// Returns `(deleted, added)`.
    pub async fn change_uri(
        &self,
        gid: &Gid,
        file_index: u32,
        del_uris: Vec<String>,
        add_uris: Vec<String>,
    ) -> Result<(u64, u64)> {
        self.change_uri_at(gid, file_index, del_uris, add_uris, None).await
    }

    /// Like [`change_uri`](Self::change_uri), inserting the new URIs at
    /// `position` (0-based, counted after the removal) in the waiting URI list
    pub async fn change_uri_at(
        &self,
        gid: &Gid,
        file_index: u32,
        del_uris: Vec<String>,
        add_uris: Vec<String>,
        position: Option<u32>,
    ) -> Result<(u64, u64)> {
        let mut params = vec![json!(gid), json!(file_index), json!(del_uris), json!(add_uris)];
        if let Some(position) = position {
            params.push(json!(position));
        }

        let reply: Vec<u64> = self.call("aria2.changeUri", params).await?;
        match reply.as_slice() {
            [deleted, added] => Ok((*deleted, *added)),
            other => Err(Error::InvalidResponse(format!(
                "aria2.changeUri returned {} values, expected 2",
                other.len()
            ))),
        }
    }

    /// Overall download/upload speeds and queue sizes
    pub async fn get_global_stats(&self) -> Result<Stats> {
        self.call("aria2.getGlobalStat", vec![]).await
    }

    /// aria2 version and enabled features
    pub async fn get_version(&self) -> Result<VersionInfo> {
        self.call("aria2.getVersion", vec![]).await
    }

    /// Current session ID
    pub async fn get_session_info(&self) -> Result<SessionInfo> {
        self.call("aria2.getSessionInfo", vec![]).await
    }
}
