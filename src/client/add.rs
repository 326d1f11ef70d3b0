//! Download submission: URIs, torrents and metalinks.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::json;

use crate::error::{Error, Result};
use crate::types::{Gid, Options};

use super::{Aria2Client, push_options};

impl Aria2Client {
    /// Add a download from URIs pointing to the same resource
    ///
    /// Mixing URIs of different resources may fail or corrupt the download
    /// without aria2 complaining. A BitTorrent magnet URI must be the only
    /// element.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use aria2_dl::*;
    /// # async fn example(client: Aria2Client) -> Result<()> {
    /// let options = Options::new().with("dir", "/srv/downloads");
    /// let gid = client
    ///     .add_uri(utils::uris(["https://example.com/file.iso"]), Some(options))
    ///     .await?;
    /// println!("queued as {gid}");
    /// # Ok(())
    /// # }
    /// ```
    pub async fn add_uri(&self, uris: Vec<String>, options: Option<Options>) -> Result<Gid> {
        self.add_uri_at(uris, options, None).await
    }

    /// Add a download at `position` in the waiting queue
    ///
    /// A position past the end of the queue appends.
    pub async fn add_uri_at(
        &self,
        uris: Vec<String>,
        options: Option<Options>,
        position: Option<u32>,
    ) -> Result<Gid> {
        let mut params = vec![json!(uris)];
        push_options(&mut params, options.as_ref(), position)?;

        let gid: Gid = self.call("aria2.addUri", params).await?;
        non_empty(gid, "aria2.addUri")
    }

    /// Add a BitTorrent download from the contents of a .torrent file
    ///
    /// `web_seeds` are extra URIs for a single-file torrent (or base URIs for
    /// a multi-file one).
    pub async fn add_torrent(
        &self,
        torrent: &[u8],
        web_seeds: Vec<String>,
        options: Option<Options>,
    ) -> Result<Gid> {
        self.add_torrent_at(torrent, web_seeds, options, None).await
    }

    /// Add a BitTorrent download at `position` in the waiting queue
    pub async fn add_torrent_at(
        &self,
        torrent: &[u8],
        web_seeds: Vec<String>,
        options: Option<Options>,
        position: Option<u32>,
    ) -> Result<Gid> {
        let mut params = vec![json!(STANDARD.encode(torrent)), json!(web_seeds)];
        push_options(&mut params, options.as_ref(), position)?;

        let gid: Gid = self.call("aria2.addTorrent", params).await?;
        non_empty(gid, "aria2.addTorrent")
    }

    /// Add the downloads described by a metalink document
    ///
    /// Returns one handle per download the metalink produced, in reply order.
    pub async fn add_metalink(
        &self,
        metalink: &[u8],
        options: Option<Options>,
    ) -> Result<Vec<Gid>> {
        self.add_metalink_at(metalink, options, None).await
    }

    /// Add the downloads of a metalink document at `position` in the waiting queue
    pub async fn add_metalink_at(
        &self,
        metalink: &[u8],
        options: Option<Options>,
        position: Option<u32>,
    ) -> Result<Vec<Gid>> {
        let mut params = vec![json!(STANDARD.encode(metalink))];
        push_options(&mut params, options.as_ref(), position)?;

        let gids: Vec<Gid> = self.call("aria2.addMetalink", params).await?;
        tracing::debug!(count = gids.len(), "metalink added");
        Ok(gids)
    }
}

fn non_empty(gid: Gid, method: &str) -> Result<Gid> {
    if gid.is_empty() {
        return Err(Error::InvalidResponse(format!("{method} returned an empty GID")));
    }
    tracing::debug!(gid = %gid, method, "download added");
    Ok(gid)
}
