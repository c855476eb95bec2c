//! Common test utilities: credentials, fixtures and a local stream server

#![allow(dead_code)]

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::{accept_hdr_async, tungstenite::Message};

pub const API_KEY: &str = "vmPUZE6mv9SD5VNHk4HlWFsOr6aKE2zvsw0MuIgwCIPy6utIco14y7Ju91duEh8A";
pub const SECRET: &str = "NhqPtmdSJYdKjVHjA7PZj4Mge3R5YNiP1e3UZjInClVN65XAbvqqM6A7H5fATj0j";

/// Listen key as returned by `POST /api/v3/userDataStream`
pub const LISTEN_KEY: &str = "pqia91ma19a5s61cv6a81va65sdf19v8a65a1a5s61cv6a81va65sdf19v8a65a1";

/// Sample account update pushed on a user data stream
pub const ACCOUNT_POSITION_EVENT: &str = r#"{
    "e": "outboundAccountPosition",
    "E": 1564034571105,
    "u": 1564034571073,
    "B": [{"a": "ETH", "f": "10000.000000", "l": "0.000000"}]
}"#;

/// Sample balance update
pub const BALANCE_UPDATE_EVENT: &str =
    r#"{"e":"balanceUpdate","E":1573200697110,"a":"BTC","d":"100.00000000","T":1573200697068}"#;

/// Install a test subscriber once; `RUST_LOG` controls the output
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// What a [`StreamServer`] observed
#[derive(Debug)]
pub struct ServedStream {
    /// Request path of the handshake
    pub path: String,
    /// Whether the client sent a close frame
    pub client_closed: bool,
}

/// Single-connection WebSocket server
pub struct StreamServer {
    /// `ws://127.0.0.1:<port>/ws`
    pub base_url: String,
    done: oneshot::Receiver<ServedStream>,
}

impl StreamServer {
    /// Accept one connection, push `messages`, then wait for the client to close
    pub async fn start(messages: Vec<&'static str>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (done_tx, done) = oneshot::channel();

        tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            let (path_tx, path_rx) = oneshot::channel();
            let record_path =
                move |req: &Request, resp: Response| -> Result<Response, ErrorResponse> {
                    let _ = path_tx.send(req.uri().path().to_string());
                    Ok(resp)
                };
            let mut ws = accept_hdr_async(socket, record_path).await.unwrap();
            let path = path_rx.await.unwrap_or_default();

            for message in messages {
                ws.send(Message::Text(message.to_string())).await.unwrap();
            }

            let mut client_closed = false;
            while let Some(Ok(message)) = ws.next().await {
                if message.is_close() {
                    client_closed = true;
                    break;
                }
            }
            let _ = done_tx.send(ServedStream { path, client_closed });
        });

        Self {
            base_url: format!("ws://{}/ws", addr),
            done,
        }
    }

    /// Wait for the connection to end
    pub async fn finished(self) -> ServedStream {
        self.done.await.unwrap()
    }
}
