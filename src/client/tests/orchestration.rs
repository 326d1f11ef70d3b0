use super::*;

#[tokio::test]
async fn test_run_download_returns_final_status_on_complete() {
    let (client, transport) = create_test_client().await;
    transport.accept_download(GID);

    let task = {
        let client = client.clone();
        tokio::spawn(async move {
            client
                .run_download(vec!["http://example.com/a.iso".into()], None, &CancellationToken::new())
                .await
        })
    };

    wait_until_registered(&client, GID).await;
    client
        .push_notification(Notification::new(EventKind::Complete, GID))
        .await
        .unwrap();

    let status = task.await.unwrap().unwrap();
    assert_eq!(status.gid, GID);
    assert_eq!(status.status, Some(DownloadState::Complete));
    assert_eq!(transport.call_count("aria2.tellStatus"), 1);
    assert_eq!(transport.call_count("aria2.remove"), 0);
    assert!(client.registry().is_empty());
}

#[tokio::test]
async fn test_run_download_returns_status_for_errored_download() {
    let (client, transport) = create_test_client().await;
    transport.accept_download(GID).reply(
        "aria2.tellStatus",
        json!({"gid": GID, "status": "error", "errorCode": "3", "errorMessage": "Resource not found"}),
    );

    let task = {
        let client = client.clone();
        tokio::spawn(async move {
            client
                .download(vec!["http://example.com/missing".into()], None)
                .await
        })
    };

    wait_until_registered(&client, GID).await;
    client
        .push_notification(Notification::new(EventKind::Error, GID))
        .await
        .unwrap();

    let status = task.await.unwrap().unwrap();
    assert_eq!(status.status, Some(DownloadState::Error));
    assert_eq!(status.error_code.as_deref(), Some("3"));
}

#[tokio::test]
async fn test_submission_failure_skips_wait_and_status() {
    let (client, transport) = create_test_client().await;
    transport.fail("aria2.addUri", 1, "No URI to download.");

    let result = tokio::time::timeout(
        Duration::from_secs(1),
        client.run_download(vec![], None, &CancellationToken::new()),
    )
    .await
    .expect("submission failure must return immediately");

    match result {
        Err(Error::Rpc { code, message }) => {
            assert_eq!(code, 1);
            assert!(message.contains("No URI"));
        }
        other => panic!("expected RPC error, got {other:?}"),
    }
    assert_eq!(transport.call_count("aria2.tellStatus"), 0);
    assert!(client.registry().is_empty(), "no waiter may be registered");
}

#[tokio::test]
async fn test_cancel_before_terminal_event_returns_cancelled() {
    let (client, transport) = create_test_client().await;
    transport.accept_download(GID);
    let cancel = CancellationToken::new();

    let task = {
        let client = client.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move {
            client
                .run_download(vec!["http://example.com/a.iso".into()], None, &cancel)
                .await
        })
    };

    wait_until_registered(&client, GID).await;
    cancel.cancel();

    let err = task.await.unwrap().unwrap_err();
    assert!(err.is_cancelled());
    match &err {
        Error::Cancelled { gid } => assert_eq!(gid, GID),
        other => panic!("expected cancellation, got {other:?}"),
    }

    // The remote finishing afterwards changes nothing
    client
        .push_notification(Notification::new(EventKind::Complete, GID))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;

    assert_eq!(transport.call_count("aria2.tellStatus"), 0);
    assert_eq!(transport.calls_to("aria2.remove"), vec![vec![json!(GID)]]);
    assert_eq!(transport.call_count("aria2.getFiles"), 1);
}

#[tokio::test]
async fn test_cancel_without_file_deletion_only_removes() {
    let mut config = Config::default();
    config.download.delete_files_on_cancel = false;
    let (client, transport) = create_test_client_with_config(config).await;
    transport.accept_download(GID);

    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = client
        .run_download(vec!["http://example.com/a.iso".into()], None, &cancel)
        .await
        .unwrap_err();
    assert!(err.is_cancelled());
    assert_eq!(transport.call_count("aria2.remove"), 1);
    assert_eq!(transport.call_count("aria2.getFiles"), 0);
}

#[tokio::test]
async fn test_cancel_cleanup_failure_is_swallowed() {
    let (client, transport) = create_test_client().await;
    transport
        .accept_download(GID)
        .fail("aria2.remove", 1, "Active Download not found for GID#2089b05ecca3d829");

    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = client
        .run_download(vec!["http://example.com/a.iso".into()], None, &cancel)
        .await
        .unwrap_err();
    assert!(
        matches!(err, Error::Cancelled { .. }),
        "cleanup failure must not replace the cancellation error, got {err:?}"
    );
}

#[tokio::test]
async fn test_run_download_with_timeout_cancels_at_deadline() {
    let (client, transport) = create_test_client().await;
    transport.accept_download(GID);

    let err = client
        .run_download_with_timeout(
            vec!["http://example.com/slow.iso".into()],
            None,
            Duration::from_millis(20),
        )
        .await
        .unwrap_err();
    assert!(err.is_cancelled());
    assert_eq!(transport.call_count("aria2.remove"), 1);
}

#[tokio::test]
async fn test_status_fetch_failure_is_propagated() {
    let (client, transport) = create_test_client().await;
    transport
        .accept_download(GID)
        .fail("aria2.tellStatus", 1, "GID 2089b05ecca3d829 is not found");

    let task = {
        let client = client.clone();
        tokio::spawn(async move {
            client
                .download(vec!["http://example.com/a.iso".into()], None)
                .await
        })
    };

    wait_until_registered(&client, GID).await;
    client
        .push_notification(Notification::new(EventKind::Complete, GID))
        .await
        .unwrap();

    assert!(matches!(
        task.await.unwrap(),
        Err(Error::Rpc { code: 1, .. })
    ));
}

#[tokio::test]
async fn test_configured_status_keys_are_requested() {
    let mut config = Config::default();
    config.download.status_keys = vec!["gid".into(), "status".into()];
    let (client, transport) = create_test_client_with_config(config).await;
    transport.accept_download(GID);

    let task = {
        let client = client.clone();
        tokio::spawn(async move {
            client
                .download(vec!["http://example.com/a.iso".into()], None)
                .await
        })
    };
    wait_until_registered(&client, GID).await;
    client
        .push_notification(Notification::new(EventKind::Complete, GID))
        .await
        .unwrap();
    task.await.unwrap().unwrap();

    assert_eq!(
        transport.calls_to("aria2.tellStatus"),
        vec![vec![json!(GID), json!(["gid", "status"])]]
    );
}

#[tokio::test]
async fn test_wait_for_download_outcomes() {
    let (client, _transport) = create_test_client().await;

    for (kind, expected) in [
        (EventKind::Complete, None),
        (EventKind::Stop, Some("download_stopped")),
        (EventKind::Error, Some("download_errored")),
    ] {
        let handle = client.gid(format!("gid-{kind}"));
        let waiter = {
            let handle = handle.clone();
            tokio::spawn(async move { handle.wait().await })
        };

        wait_until_registered(&client, handle.gid().as_str()).await;
        client
            .push_notification(Notification::new(kind, handle.gid().clone()))
            .await
            .unwrap();

        let result = waiter.await.unwrap();
        assert_eq!(result.err().map(|e| e.error_code()), expected, "kind {kind}");
    }
}

#[tokio::test]
async fn test_close_releases_pending_waiters() {
    let (client, _transport) = create_test_client().await;

    let waiter = {
        let client = client.clone();
        tokio::spawn(async move { client.wait_for_download(&Gid::from(GID)).await })
    };
    wait_until_registered(&client, GID).await;

    client.close().await.unwrap();
    assert!(matches!(
        waiter.await.unwrap(),
        Err(Error::ConnectionClosed)
    ));
    assert!(client.is_closed());
    assert!(matches!(
        client.get_version().await,
        Err(Error::ConnectionClosed)
    ));
}

#[tokio::test]
async fn test_stopped_download_is_not_an_error_for_run_download() {
    let (client, transport) = create_test_client().await;
    transport.accept_download(GID).reply(
        "aria2.tellStatus",
        json!({"gid": GID, "status": "removed"}),
    );

    let task = {
        let client = client.clone();
        tokio::spawn(async move {
            client
                .download(vec!["http://example.com/a.iso".into()], None)
                .await
        })
    };
    wait_until_registered(&client, GID).await;
    client
        .push_notification(Notification::new(EventKind::Stop, GID))
        .await
        .unwrap();

    let status = task.await.unwrap().unwrap();
    assert_eq!(status.status, Some(DownloadState::Removed));
}

#[tokio::test]
async fn test_abandoned_waits_leave_no_registry_entry() {
    let (client, _transport) = create_test_client().await;

    for i in 0..100 {
        let gid = Gid::from(format!("g{i}"));
        let result =
            tokio::time::timeout(Duration::from_millis(1), client.wait_for_download(&gid)).await;
        assert!(result.is_err());
    }

    assert!(client.registry().is_empty(), "{} entries leaked", client.registry().len());
}

#[tokio::test]
async fn test_cancelled_download_releases_its_waiter() {
    let (client, transport) = create_test_client().await;
    transport.accept_download(GID);
    let cancel = CancellationToken::new();

    let task = {
        let client = client.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move {
            client
                .run_download(vec!["http://example.com/a.iso".into()], None, &cancel)
                .await
        })
    };
    wait_until_registered(&client, GID).await;
    cancel.cancel();
    assert!(task.await.unwrap().unwrap_err().is_cancelled());

    tokio::time::timeout(Duration::from_secs(1), async {
        while !client.registry().is_empty() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("wait task kept its registry entry after cancellation");
}

#[tokio::test]
async fn test_registration_after_close_fails_immediately() {
    let (client, _transport) = create_test_client().await;
    client.close().await.unwrap();

    // A registration racing past the closed check must not hang
    assert!(matches!(
        client.register_waiter(&Gid::from(GID)),
        Err(Error::ConnectionClosed)
    ));
    let result =
        tokio::time::timeout(Duration::from_secs(1), client.wait_for_download(&Gid::from(GID)))
            .await
            .expect("wait after close must not block");
    assert!(matches!(result, Err(Error::ConnectionClosed)));
    assert!(client.registry().is_empty());
}
