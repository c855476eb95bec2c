//! Integration tests for the Binance SDK
//!
//! Exercises the full flow against local servers: factory-built clients
//! talking to a mock REST API, listen key sessions, and user data streams.

mod common;

use std::sync::Arc;
use std::time::Duration;

use binance_sdk::prelude::*;
use binance_ws::MockTransport;
use common::*;
use httpmock::prelude::*;
use serde_json::json;
use tokio::time::timeout;

// =============================================================================
// REST through the factory
// =============================================================================

#[tokio::test]
async fn test_signed_call_carries_key_timestamp_and_signature() {
    init_tracing();
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/v3/account")
                .header("X-MBX-APIKEY", API_KEY)
                .query_param("recvWindow", "5000")
                .query_param_exists("timestamp")
                .query_param_exists("signature");
            then.status(200).json_body(json!({"canTrade": true, "balances": []}));
        })
        .await;

    let factory = ClientFactory::with_defaults().unwrap();
    let client = factory
        .create_client(&server.base_url(), Credentials::new(API_KEY, SECRET))
        .unwrap()
        .with_recv_window(5000);

    let account = client.account().account().await.unwrap();
    assert_eq!(account["canTrade"], true);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_each_client_sends_its_own_key() {
    init_tracing();
    let server = MockServer::start_async().await;
    let mut mocks = Vec::new();
    for i in 0..3 {
        let key = format!("key-{i}");
        mocks.push(
            server
                .mock_async(move |when, then| {
                    when.method(GET)
                        .path("/api/v3/historicalTrades")
                        .header("X-MBX-APIKEY", key.as_str());
                    then.status(200).json_body(json!([]));
                })
                .await,
        );
    }

    let factory = ClientFactory::with_defaults().unwrap();
    for i in 0..3 {
        let client = factory
            .create_client(
                &server.base_url(),
                Credentials::new(format!("key-{i}"), format!("secret-{i}")),
            )
            .unwrap();
        client
            .market()
            .historical_trades("BTCUSDT", Some(1), None)
            .await
            .unwrap();
    }

    for mock in &mocks {
        mock.assert_async().await;
    }
}

#[tokio::test]
async fn test_signed_call_without_secret_never_sent() {
    init_tracing();
    // No mocks registered: a request that got through would fail as a 404
    let server = MockServer::start_async().await;
    let factory = ClientFactory::with_defaults().unwrap();
    let client = factory
        .create_client(&server.base_url(), Credentials::new(API_KEY, ""))
        .unwrap();

    let order = Params::new()
        .with("symbol", "BTCUSDT")
        .with("side", "BUY")
        .with("type", "MARKET")
        .with("quantity", "0.001");
    let err = client.trading().new_order_test(order).await.unwrap_err();

    assert!(
        matches!(err, RestError::Authentication(AuthError::MissingSecretKey)),
        "got {err:?}"
    );
    assert_eq!(factory.pool().in_flight(), 0);
}

#[tokio::test]
async fn test_fifty_clients_share_one_pool() {
    init_tracing();
    let server = MockServer::start_async().await;
    let ping = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v3/ping");
            then.status(200)
                .json_body(json!({}))
                .delay(Duration::from_millis(20));
        })
        .await;

    let factory =
        ClientFactory::new(PoolConfig::new().with_max_requests(8).with_max_requests_per_host(4))
            .unwrap();
    let clients: Vec<_> = (0..50)
        .map(|i| {
            factory
                .create_client(&server.base_url(), Credentials::new(format!("k{i}"), "s"))
                .unwrap()
        })
        .collect();

    for client in &clients {
        assert!(Arc::ptr_eq(client.pool(), factory.pool()));
    }

    let pings = clients.iter().map(|c| async move { c.market().ping().await });
    let results = futures_util::future::join_all(pings).await;
    assert!(results.iter().all(|r| r.is_ok()));

    assert_eq!(factory.pool().in_flight(), 0);
    ping.assert_calls_async(50).await;
}

// =============================================================================
// User data streams
// =============================================================================

#[tokio::test]
async fn test_user_stream_end_to_end() {
    init_tracing();
    let rest = MockServer::start_async().await;
    let start = rest
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/v3/userDataStream")
                .header("X-MBX-APIKEY", API_KEY);
            then.status(200).json_body(json!({ "listenKey": LISTEN_KEY }));
        })
        .await;
    let close = rest
        .mock_async(|when, then| {
            when.method(DELETE)
                .path("/api/v3/userDataStream")
                .query_param("listenKey", LISTEN_KEY);
            then.status(200).json_body(json!({}));
        })
        .await;
    let streams = StreamServer::start(vec![ACCOUNT_POSITION_EVENT, BALANCE_UPDATE_EVENT]).await;

    let factory = ClientFactory::with_defaults().unwrap();
    let client = factory
        .create_client(&rest.base_url(), Credentials::new(API_KEY, SECRET))
        .unwrap();
    let mut session = UserStreamSession::spot(client);
    let key = session.create().await.unwrap();

    let streaming = factory.create_streaming_client_at(&streams.base_url).unwrap();
    let mut stream = streaming.open_user_stream(&key).await.unwrap();
    assert_eq!(factory.pool().open_streams(), 1);
    assert_eq!(factory.pool().in_flight(), 0);

    let first = timeout(Duration::from_secs(5), stream.recv()).await.unwrap();
    assert_eq!(first, Some(StreamEvent::Message(ACCOUNT_POSITION_EVENT.to_string())));
    let second = timeout(Duration::from_secs(5), stream.recv()).await.unwrap();
    assert_eq!(second, Some(StreamEvent::Message(BALANCE_UPDATE_EVENT.to_string())));

    timeout(Duration::from_secs(5), stream.cancel()).await.unwrap();
    assert_eq!(factory.pool().open_streams(), 0);

    let served = timeout(Duration::from_secs(5), streams.finished()).await.unwrap();
    assert_eq!(served.path, format!("/ws/{}", LISTEN_KEY));
    assert!(served.client_closed);

    assert_eq!(session.close().await.unwrap(), SessionState::Closed);
    assert_eq!(session.close().await.unwrap(), SessionState::Closed);

    start.assert_async().await;
    close.assert_async().await;
}

#[tokio::test]
async fn test_silent_stream_times_out() {
    init_tracing();
    let streams = StreamServer::start(Vec::new()).await;
    let factory = ClientFactory::with_defaults()
        .unwrap()
        .with_stream_options(StreamOptions::new().with_idle_timeout(Duration::from_millis(200)));

    let streaming = factory.create_streaming_client_at(&streams.base_url).unwrap();
    let mut stream = streaming
        .open_user_stream(&ListenKey::new("expired-key"))
        .await
        .unwrap();

    let event = timeout(Duration::from_secs(5), stream.recv()).await.unwrap();
    assert_eq!(
        event,
        Some(StreamEvent::Disconnected(DisconnectReason::IdleTimeout))
    );

    let served = timeout(Duration::from_secs(5), streams.finished()).await.unwrap();
    assert!(served.client_closed);
    assert_eq!(factory.pool().open_streams(), 0);
}

#[tokio::test]
async fn test_market_stream_path() {
    init_tracing();
    let streams = StreamServer::start(vec![r#"{"e":"trade","s":"BTCUSDT","p":"0.001"}"#]).await;
    let factory = ClientFactory::with_defaults().unwrap();

    let streaming = factory.create_streaming_client_at(&streams.base_url).unwrap();
    let mut stream = streaming.open_market("btcusdt@trade").await.unwrap();
    let event = timeout(Duration::from_secs(5), stream.recv()).await.unwrap();
    assert!(event.unwrap().as_message().unwrap().contains("BTCUSDT"));

    stream.cancel().await;
    let served = timeout(Duration::from_secs(5), streams.finished()).await.unwrap();
    assert_eq!(served.path, "/ws/btcusdt@trade");
}

#[tokio::test]
async fn test_failed_handshake_releases_permit() {
    init_tracing();
    let factory = ClientFactory::with_defaults()
        .unwrap()
        .with_stream_options(StreamOptions::new().with_connect_timeout(Duration::from_secs(2)));
    let streaming = factory.create_streaming_client_at("ws://127.0.0.1:1/ws").unwrap();

    let err = streaming.open_market("btcusdt@trade").await.unwrap_err();
    assert!(matches!(err, SdkError::Transport(_)), "got {err:?}");
    assert!(err.is_transport());
    assert_eq!(factory.pool().in_flight(), 0);
    assert_eq!(factory.pool().open_streams(), 0);
}

#[tokio::test]
async fn test_stream_slot_follows_reader() {
    let factory = ClientFactory::with_defaults().unwrap();
    let streaming = factory.create_test_streaming_client().unwrap();

    let mut transport = MockTransport::new("wss://mock.test/ws/key");
    transport.push_response(BALANCE_UPDATE_EVENT);
    transport.push_close();

    let mut stream = streaming.open_transport(transport).await.unwrap();
    let mut events = Vec::new();
    while let Some(event) = stream.recv().await {
        events.push(event);
    }

    assert_eq!(events.len(), 2);
    assert_eq!(
        events[1],
        StreamEvent::Disconnected(DisconnectReason::ServerClosed)
    );
    // the slot is released by the reader before its channel closes
    assert_eq!(factory.pool().open_streams(), 0);
}
