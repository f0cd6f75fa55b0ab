use super::*;

#[tokio::test]
async fn caller_transport_is_used_and_never_shut_down() {
    let server = MockServer::start().await;
    mount_discovery(&server, TODOS_DISCOVERY).await;
    mount_document(&server, "/a/todos", "{}").await;

    let dir = TempDir::new().unwrap();
    let transport = Arc::new(CountingTransport::new());
    let downloader = ApiDocsDownloader::new(test_config(&server, &dir))
        .unwrap()
        .with_transport(transport.clone());

    assert!(downloader.run().await.unwrap().all_fulfilled());
    assert_eq!(transport.clients.load(Ordering::SeqCst), 1);
    assert_eq!(transport.shutdowns.load(Ordering::SeqCst), 0);
    assert!(!transport.inner.is_shut_down());
}

#[tokio::test]
async fn caller_transport_survives_failed_run() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/a/resource_groups"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let transport = Arc::new(PooledTransport::from_client(reqwest::Client::new()));
    let downloader = ApiDocsDownloader::new(test_config(&server, &dir))
        .unwrap()
        .with_transport(transport.clone());

    assert!(matches!(
        downloader.run().await,
        Err(Error::HttpStatus(_))
    ));
    assert!(!transport.is_shut_down());
    assert!(transport.client().is_ok());
}

#[tokio::test]
async fn closed_caller_transport_fails_the_run() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let transport = Arc::new(PooledTransport::from_client(reqwest::Client::new()));
    transport.shutdown().await;

    let downloader = ApiDocsDownloader::new(test_config(&server, &dir))
        .unwrap()
        .with_transport(transport);
    assert!(matches!(
        downloader.run().await,
        Err(Error::TransportClosed)
    ));
}

#[tokio::test]
async fn owned_transport_is_recreated_for_each_run() {
    let server = MockServer::start().await;
    mount_discovery(&server, r#"{"groups":[]}"#).await;

    let dir = TempDir::new().unwrap();
    let downloader = ApiDocsDownloader::new(test_config(&server, &dir)).unwrap();

    // The per-run pool is shut down after each run, so a second run needs a new one
    assert!(downloader.run().await.unwrap().is_empty());
    assert!(downloader.run().await.unwrap().is_empty());
}
