//! Waiting for downloads and submit-and-wait.

use std::time::Duration;

use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};
use crate::types::{Gid, Options, Status};

use super::Aria2Client;

impl Aria2Client {
    /// Block until `gid` reaches a terminal state
    ///
    /// Returns `Ok(())` on `downloadComplete`, and
    /// `DownloadError::Stopped` / `DownloadError::Errored` on `downloadStop` /
    /// `downloadError`. A terminal event that arrived before this call is not
    /// replayed, so waiting on an already finished download blocks until the
    /// client is closed.
    ///
    /// Terminal events only arrive through the client's notification intake
    /// ([`notifier`](Self::notifier)); with nothing feeding it this waits
    /// until [`close`](Self::close).
    pub async fn wait_for_download(&self, gid: &Gid) -> Result<()> {
        self.register_waiter(gid)?.wait().await
    }

    /// Submit a download and wait for it to finish
    ///
    /// Never cancelled, so without a notification source (see
    /// [`Aria2Client::new`]) this never returns; see
    /// [`run_download`](Self::run_download).
    pub async fn download(&self, uris: Vec<String>, options: Option<Options>) -> Result<Status> {
        let cancel = CancellationToken::new();
        self.run_download(uris, options, &cancel).await
    }

    /// Submit a download and wait for it to finish, cancelling after `timeout`
    pub async fn run_download_with_timeout(
        &self,
        uris: Vec<String>,
        options: Option<Options>,
        timeout: Duration,
    ) -> Result<Status> {
        let cancel = CancellationToken::new();
        let deadline = {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                tokio::time::sleep(timeout).await;
                cancel.cancel();
            })
        };

        let result = self.run_download(uris, options, &cancel).await;
        deadline.abort();
        result
    }

    /// Submit a download, wait for a terminal event and return the final status
    ///
    /// The sequence is:
    /// 1. submit with `aria2.addUri`; a submission failure is returned as is,
    ///    without waiting or fetching status,
    /// 2. wait for `downloadComplete`, `downloadStop` or `downloadError`,
    ///    racing against `cancel`,
    /// 3. on a terminal event, fetch and return the status. A stopped or
    ///    errored download is not an error here: inspect `Status::status`
    ///    and `Status::error_code`,
    /// 4. on cancellation, remove the download (deleting its files when
    ///    `download.delete_files_on_cancel` is set) and return
    ///    `Error::Cancelled`. Cleanup failures are logged only.
    ///
    /// Step 2 relies on aria2's notifications reaching the client (see
    /// [`Aria2Client::new`]). Without them only `cancel` or
    /// [`close`](Self::close) ends the wait.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use aria2_dl::*;
    /// # use tokio_util::sync::CancellationToken;
    /// # async fn example(client: Aria2Client) -> Result<()> {
    /// let cancel = CancellationToken::new();
    /// let status = client
    ///     .run_download(utils::uris(["https://example.com/file.iso"]), None, &cancel)
    ///     .await?;
    /// println!("{} finished as {:?}", status.gid, status.status);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn run_download(
        &self,
        uris: Vec<String>,
        options: Option<Options>,
        cancel: &CancellationToken,
    ) -> Result<Status> {
        let gid = self.add_uri(uris, options).await?;

        // A terminal event dispatched before this point is missed
        let waiter = self.register_waiter(&gid)?;

        let (mut done_tx, done_rx) = oneshot::channel();
        tokio::spawn(async move {
            tokio::select! {
                // Dropping the waiter here removes its registry entry
                _ = done_tx.closed() => {}
                outcome = waiter.wait() => {
                    done_tx.send(outcome).ok();
                }
            }
        });

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::info!(gid = %gid, "download cancelled, removing it");
                self.remove_cancelled(&gid).await;
                Err(Error::Cancelled { gid })
            }
            outcome = done_rx => {
                match outcome {
                    Ok(Ok(())) => tracing::debug!(gid = %gid, "download complete"),
                    Ok(Err(Error::Download(e))) => {
                        tracing::debug!(gid = %gid, outcome = %e, "download ended unsuccessfully");
                    }
                    Ok(Err(e)) => return Err(e),
                    Err(_) => return Err(Error::ConnectionClosed),
                }

                let keys: Vec<&str> = self
                    .config
                    .download
                    .status_keys
                    .iter()
                    .map(String::as_str)
                    .collect();
                self.tell_status(&gid, &keys).await
            }
        }
    }

    async fn remove_cancelled(&self, gid: &Gid) {
        let result = if self.config.download.delete_files_on_cancel {
            self.delete(gid).await
        } else {
            self.remove(gid).await
        };

        if let Err(e) = result {
            tracing::warn!(gid = %gid, error = %e, "failed to remove cancelled download");
        }
    }
}
