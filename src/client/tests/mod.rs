#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::test_helpers::{
    create_test_client, create_test_client_with_config, wait_until_registered,
};
use super::*;
use crate::error::DownloadError;
use crate::types::{DownloadState, PositionHow};
use std::time::Duration;

mod orchestration;

const GID: &str = "2089b05ecca3d829";

/// Receive one value or fail the test after a second
async fn recv_within<T>(rx: &mut tokio::sync::mpsc::UnboundedReceiver<T>) -> T {
    tokio::time::timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("timed out waiting for listener")
        .expect("listener channel closed")
}
