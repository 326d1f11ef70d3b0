//! Core types for aria2-dl

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::utils::{string_u64, string_u64_opt};

/// Opaque download handle (GID) issued by aria2
///
/// Stable for the lifetime of the download and used as the join key between
/// notifications and waiters.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Gid(String);

impl Gid {
    /// Create a new Gid
    pub fn new(gid: impl Into<String>) -> Self {
        Self(gid.into())
    }

    /// Borrow the handle as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if aria2 returned an empty handle
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for Gid {
    fn from(gid: String) -> Self {
        Self(gid)
    }
}

impl From<&str> for Gid {
    fn from(gid: &str) -> Self {
        Self(gid.to_string())
    }
}

impl From<Gid> for String {
    fn from(gid: Gid) -> Self {
        gid.0
    }
}

impl AsRef<str> for Gid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Gid {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Gid {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl std::fmt::Display for Gid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Kind of lifecycle notification pushed by aria2
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// `aria2.onDownloadStart`
    #[serde(rename = "downloadStart")]
    Start,
    /// `aria2.onDownloadPause`
    #[serde(rename = "downloadPause")]
    Pause,
    /// `aria2.onDownloadStop`
    #[serde(rename = "downloadStop")]
    Stop,
    /// `aria2.onDownloadComplete`
    #[serde(rename = "downloadComplete")]
    Complete,
    /// `aria2.onDownloadError`
    #[serde(rename = "downloadError")]
    Error,
    /// `aria2.onBtDownloadComplete`
    #[serde(rename = "btDownloadComplete")]
    BtComplete,
}

impl EventKind {
    /// Every recognized event kind
    pub const ALL: [EventKind; 6] = [
        EventKind::Start,
        EventKind::Pause,
        EventKind::Stop,
        EventKind::Complete,
        EventKind::Error,
        EventKind::BtComplete,
    ];

    /// Boundary tag used by subscribers (e.g. "downloadComplete")
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Start => "downloadStart",
            EventKind::Pause => "downloadPause",
            EventKind::Stop => "downloadStop",
            EventKind::Complete => "downloadComplete",
            EventKind::Error => "downloadError",
            EventKind::BtComplete => "btDownloadComplete",
        }
    }

    /// JSON-RPC notification method carrying this kind
    pub fn method(&self) -> &'static str {
        match self {
            EventKind::Start => "aria2.onDownloadStart",
            EventKind::Pause => "aria2.onDownloadPause",
            EventKind::Stop => "aria2.onDownloadStop",
            EventKind::Complete => "aria2.onDownloadComplete",
            EventKind::Error => "aria2.onDownloadError",
            EventKind::BtComplete => "aria2.onBtDownloadComplete",
        }
    }

    /// Map a notification method name to its kind
    pub fn from_method(method: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.method() == method)
    }

    /// Terminal kinds are the last notification a download emits
    ///
    /// `btDownloadComplete` is not terminal: a torrent keeps seeding afterwards.
    pub fn is_terminal(&self) -> bool {
        matches!(self, EventKind::Stop | EventKind::Complete | EventKind::Error)
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EventKind {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| crate::error::Error::InvalidResponse(format!("unknown event kind: {s}")))
    }
}

/// Lifecycle event delivered to listeners
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadEvent {
    /// What happened
    pub kind: EventKind,
    /// The download it happened to
    pub gid: Gid,
    /// Additional handles carried by the notification, if any
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related: Vec<Gid>,
}

impl DownloadEvent {
    /// Create an event for a single download
    pub fn new(kind: EventKind, gid: impl Into<Gid>) -> Self {
        Self {
            kind,
            gid: gid.into(),
            related: Vec::new(),
        }
    }
}

/// State of a download as reported by `aria2.tellStatus`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadState {
    /// Currently downloading or seeding
    Active,
    /// Queued, not started
    Waiting,
    /// Paused
    Paused,
    /// Stopped because of an error
    Error,
    /// Stopped and completed
    Complete,
    /// Removed by the user
    Removed,
}

impl DownloadState {
    /// Returns true if aria2 will not make further progress on the download
    pub fn is_finished(&self) -> bool {
        matches!(
            self,
            DownloadState::Error | DownloadState::Complete | DownloadState::Removed
        )
    }
}

/// Progress and metadata of a download (`aria2.tellStatus`)
///
/// Every field is optional on the wire because callers may restrict the
/// returned keys.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Status {
    /// Download handle
    pub gid: Gid,
    /// Current state
    pub status: Option<DownloadState>,
    /// Total length in bytes
    #[serde(with = "string_u64")]
    pub total_length: u64,
    /// Completed length in bytes
    #[serde(with = "string_u64")]
    pub completed_length: u64,
    /// Uploaded length in bytes
    #[serde(with = "string_u64")]
    pub upload_length: u64,
    /// Hex bitfield of downloaded pieces
    pub bitfield: Option<String>,
    /// Download speed in bytes per second
    #[serde(with = "string_u64")]
    pub download_speed: u64,
    /// Upload speed in bytes per second
    #[serde(with = "string_u64")]
    pub upload_speed: u64,
    /// BitTorrent info hash
    pub info_hash: Option<String>,
    /// Number of seeders connected (BitTorrent)
    #[serde(with = "string_u64_opt")]
    pub num_seeders: Option<u64>,
    /// "true" if the local endpoint is a seeder (BitTorrent)
    pub seeder: Option<String>,
    /// Piece length in bytes
    #[serde(with = "string_u64")]
    pub piece_length: u64,
    /// Number of pieces
    #[serde(with = "string_u64")]
    pub num_pieces: u64,
    /// Number of peers/servers connected
    #[serde(with = "string_u64")]
    pub connections: u64,
    /// Last error code reported for this download
    pub error_code: Option<String>,
    /// Human-readable message for `error_code`
    pub error_message: Option<String>,
    /// Downloads auto-generated from this one (e.g. metalink, torrent from magnet)
    pub followed_by: Vec<Gid>,
    /// Reverse link of `followed_by`
    pub following: Option<Gid>,
    /// Parent download for BitTorrent metadata downloads
    pub belongs_to: Option<Gid>,
    /// Directory files are saved to
    pub dir: Option<PathBuf>,
    /// Files of this download
    pub files: Vec<File>,
    /// BitTorrent metadata
    pub bittorrent: Option<BitTorrentInfo>,
    /// Number of verified bytes while hash checking
    #[serde(with = "string_u64_opt")]
    pub verified_length: Option<u64>,
    /// "true" if the download waits for hash checking
    pub verify_integrity_pending: Option<String>,
}

impl Status {
    /// Progress as a percentage (0.0 to 100.0), 0 when the length is unknown
    pub fn progress_percent(&self) -> f64 {
        if self.total_length == 0 {
            return 0.0;
        }
        (self.completed_length as f64 / self.total_length as f64) * 100.0
    }

    /// Returns true if aria2 reports the download as complete
    pub fn is_complete(&self) -> bool {
        self.status == Some(DownloadState::Complete)
    }
}

/// BitTorrent metadata attached to a status
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BitTorrentInfo {
    /// Announce URIs, grouped by tier
    pub announce_list: Vec<Vec<String>>,
    /// Torrent comment
    pub comment: Option<String>,
    /// Creation time (seconds since epoch)
    pub creation_date: Option<i64>,
    /// "single" or "multi"
    pub mode: Option<String>,
    /// Torrent info dictionary
    pub info: Option<TorrentName>,
}

/// `info` section of [`BitTorrentInfo`]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TorrentName {
    /// Name from the info dictionary
    pub name: String,
}

/// A file belonging to a download (`aria2.getFiles`)
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct File {
    /// 1-based file index
    #[serde(with = "string_u64")]
    pub index: u64,
    /// File path on the aria2 host
    pub path: PathBuf,
    /// File size in bytes
    #[serde(with = "string_u64")]
    pub length: u64,
    /// Completed length in bytes
    #[serde(with = "string_u64")]
    pub completed_length: u64,
    /// "true" if the file is selected for download
    pub selected: String,
    /// URIs for this file
    pub uris: Vec<Uri>,
}

impl File {
    /// Returns true if aria2 selected this file for download
    pub fn is_selected(&self) -> bool {
        self.selected == "true"
    }
}

/// Use state of a URI
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UriStatus {
    /// The URI is in use
    Used,
    /// The URI is waiting in the queue
    Waiting,
}

/// A source URI (`aria2.getUris`)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Uri {
    /// The URI
    pub uri: String,
    /// Whether the URI is in use
    pub status: UriStatus,
}

/// A BitTorrent peer (`aria2.getPeers`)
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Peer {
    /// Percent-encoded peer ID
    pub peer_id: String,
    /// Peer IP address
    pub ip: String,
    /// Peer port
    #[serde(with = "string_u64")]
    pub port: u64,
    /// Hex bitfield of the peer's pieces
    pub bitfield: String,
    /// "true" if aria2 is choking the peer
    pub am_choking: String,
    /// "true" if the peer is choking aria2
    pub peer_choking: String,
    /// Download speed from this peer in bytes per second
    #[serde(with = "string_u64")]
    pub download_speed: u64,
    /// Upload speed to this peer in bytes per second
    #[serde(with = "string_u64")]
    pub upload_speed: u64,
    /// "true" if the peer is a seeder
    pub seeder: String,
}

/// Servers connected for one file (`aria2.getServers`)
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileServers {
    /// 1-based file index
    #[serde(with = "string_u64")]
    pub index: u64,
    /// Connected servers
    pub servers: Vec<Server>,
}

/// A connected HTTP(S)/FTP/SFTP server
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Server {
    /// Original URI
    pub uri: String,
    /// URI currently used (may differ after redirects)
    pub current_uri: String,
    /// Download speed in bytes per second
    #[serde(with = "string_u64")]
    pub download_speed: u64,
}

/// Global statistics (`aria2.getGlobalStat`)
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Stats {
    /// Overall download speed in bytes per second
    #[serde(with = "string_u64")]
    pub download_speed: u64,
    /// Overall upload speed in bytes per second
    #[serde(with = "string_u64")]
    pub upload_speed: u64,
    /// Number of active downloads
    #[serde(with = "string_u64")]
    pub num_active: u64,
    /// Number of waiting downloads
    #[serde(with = "string_u64")]
    pub num_waiting: u64,
    /// Number of stopped downloads in the current session (capped)
    #[serde(with = "string_u64")]
    pub num_stopped: u64,
    /// Number of stopped downloads in the current session (uncapped)
    #[serde(with = "string_u64")]
    pub num_stopped_total: u64,
}

/// aria2 version information (`aria2.getVersion`)
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VersionInfo {
    /// Version string
    pub version: String,
    /// Enabled features
    pub enabled_features: Vec<String>,
}

/// Session information (`aria2.getSessionInfo`)
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionInfo {
    /// Session ID, generated each time aria2 is invoked
    pub session_id: String,
}

/// Download options, keyed by aria2 option name (e.g. "dir", "max-download-limit")
///
/// aria2 transports every option value as a string.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Options(HashMap<String, String>);

impl Options {
    /// Create an empty option set
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    /// Set an option
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    /// Read an option
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Returns true if no option is set
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of options set
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Options {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// How `aria2.changePosition` interprets its offset
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PositionHow {
    /// Relative to the beginning of the queue
    #[serde(rename = "POS_SET")]
    Set,
    /// Relative to the current position
    #[serde(rename = "POS_CUR")]
    Cur,
    /// Relative to the end of the queue
    #[serde(rename = "POS_END")]
    End,
}
