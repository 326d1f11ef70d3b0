//! Per-download and global options.

use serde_json::json;

use crate::error::Result;
use crate::types::{Gid, Options};

use super::Aria2Client;

impl Aria2Client {
    /// Options of a download
    ///
    /// Options without a default value that were never set are not returned.
    pub async fn get_options(&self, gid: &Gid) -> Result<Options> {
        self.call("aria2.getOption", vec![json!(gid)]).await
    }

    /// Change options of a download
    ///
    /// Changing most options of an active download makes aria2 restart it.
    pub async fn change_options(&self, gid: &Gid, options: &Options) -> Result<()> {
        let params = vec![json!(gid), serde_json::to_value(options)?];
        self.call_unit("aria2.changeOption", params).await
    }

    /// Global options, which also serve as the template for new downloads
    pub async fn get_global_options(&self) -> Result<Options> {
        self.call("aria2.getGlobalOption", vec![]).await
    }

    /// Change global options
    pub async fn change_global_options(&self, options: &Options) -> Result<()> {
        let params = vec![serde_json::to_value(options)?];
        self.call_unit("aria2.changeGlobalOption", params).await
    }
}
