// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the TCP transport against a local mock miner.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use avalon_lib::protocol::{Endpoint, MAX_RESPONSE_BYTES, Protocol, RETRY_DELAY, TcpClient};
use avalon_lib::response::Scalar;
use avalon_lib::types::WorkMode;
use avalon_lib::{Command, Error, Miner, MinerBuilder, ProtocolError};
use parking_lot::Mutex;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

// ============================================================================
// Mock miner
// ============================================================================

/// Accepts connections, reads one command line and answers with whatever
/// the handler returns. A `None` answer keeps the socket open without
/// replying.
struct MockMinerServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
    connections: Arc<AtomicUsize>,
}

impl MockMinerServer {
    async fn start<F>(handler: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let connections = Arc::new(AtomicUsize::new(0));
        let handler = Arc::new(handler);

        let server_requests = Arc::clone(&requests);
        let server_connections = Arc::clone(&connections);
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                server_connections.fetch_add(1, Ordering::SeqCst);
                let requests = Arc::clone(&server_requests);
                let handler = Arc::clone(&handler);

                tokio::spawn(async move {
                    let mut buf = vec![0u8; 4096];
                    let n = socket.read(&mut buf).await.unwrap_or(0);
                    let line = String::from_utf8_lossy(&buf[..n]).to_string();
                    requests.lock().push(line.clone());

                    match (*handler)(&line) {
                        Some(reply) => {
                            let _ = socket.write_all(reply.as_bytes()).await;
                        }
                        None => tokio::time::sleep(Duration::from_secs(10)).await,
                    }
                });
            }
        });

        Self {
            addr,
            requests,
            connections,
        }
    }

    fn endpoint(&self) -> Endpoint {
        Endpoint::new("127.0.0.1").with_port(self.addr.port())
    }

    fn miner(&self) -> MinerBuilder {
        Miner::from_endpoint(self.endpoint())
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }

    fn connections(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }
}

fn closed_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

const SUMMARY: &str = "STATUS=S,When=1700000000,Code=11,Msg=Summary,Description=cgminer 4.11.1|\
SUMMARY,Elapsed=3600,MHS av=6012345.67,Accepted=120,Rejected=1,Hardware Errors=0|\0";

fn miner_reply(line: &str) -> Option<String> {
    let reply = match line {
        "version" => "STATUS=S,Code=22,Msg=CGMiner versions|VERSION,CGMiner=4.11.1,API=3.7,PROD=Avalon Nano3s|",
        "summary" => SUMMARY,
        "stats" => "STATUS=S,Msg=CGMiner stats|STATS=0,ID=AVALON0,Elapsed=3600|",
        "devs" => "STATUS=S,Msg=1 ASC(s)|ASC=0,Name=AVA10,Enabled=Y,Status=Alive,Temperature=45.25|",
        "pools" => "STATUS=S,Msg=2 Pool(s)|POOL=0,URL=stratum+tcp://a:3333,Status=Alive|POOL=1,URL=stratum+tcp://b:3333,Status=Alive|",
        "estats" => "STATUS=S,Msg=CGMiner stats|STATS=0,ID=AVALON0,MM ID0=Ver[Nano3s] ITemp[41] OTemp[55.5] Fan1[1440] FanR[30%] PS[0 1195 1210 8 0 1203 139] LED[1] LEDUser[1-50-50-64-32-0] WORKMODE[1]|",
        line if line.starts_with("ascset|") => "STATUS=S,Code=119,Msg=ASC 0 set OK|",
        line if line.starts_with("setpool|") => "STATUS=I,Code=118,Msg=Set info success|",
        _ => "STATUS=E,Code=14,Msg=Invalid command|",
    };
    Some(reply.to_string())
}

// ============================================================================
// TcpClient Tests
// ============================================================================

mod tcp_client {
    use super::*;

    #[tokio::test]
    async fn full_request_and_reply() {
        let server = MockMinerServer::start(miner_reply).await;
        let client = TcpClient::new(server.endpoint());

        let reply = client.send("summary").await.unwrap();

        assert!(reply.starts_with("STATUS=S"));
        assert!(reply.ends_with("Hardware Errors=0|"));
        assert_eq!(server.requests(), ["summary"]);
        assert_eq!(server.connections(), 1);
    }

    #[tokio::test]
    async fn empty_reply_is_not_retried() {
        let server = MockMinerServer::start(|_| Some(String::new())).await;
        let client = TcpClient::new(server.endpoint());

        assert_eq!(client.send("summary").await, Some(String::new()));
        assert_eq!(server.connections(), 1);
    }

    #[tokio::test]
    async fn silent_peer_is_retried_until_exhausted() {
        let server = MockMinerServer::start(|_| None).await;
        let client = TcpClient::new(
            server
                .endpoint()
                .with_timeout(Duration::from_millis(200))
                .with_retries(2),
        );

        let started = Instant::now();
        let err = client.send_raw("summary").await.unwrap_err();

        assert!(matches!(
            err,
            ProtocolError::RetriesExhausted { attempts: 3, ref last }
                if matches!(**last, ProtocolError::Timeout(200))
        ));
        assert_eq!(server.connections(), 3);
        assert!(started.elapsed() >= RETRY_DELAY * 2);
    }

    #[tokio::test]
    async fn refused_endpoint_gives_no_reply() {
        let client = TcpClient::new(
            Endpoint::new("127.0.0.1")
                .with_port(closed_port())
                .with_timeout(Duration::from_secs(1))
                .with_retries(2),
        );

        let started = Instant::now();
        assert_eq!(client.send("version").await, None);
        assert!(started.elapsed() >= RETRY_DELAY * 2);
    }

    #[tokio::test]
    async fn oversized_reply_is_truncated() {
        let server =
            MockMinerServer::start(|_| Some("x".repeat(MAX_RESPONSE_BYTES + 50_000))).await;
        let client = TcpClient::new(server.endpoint());

        let reply = client.send("stats").await.unwrap();
        assert_eq!(reply.len(), MAX_RESPONSE_BYTES);
    }
}

// ============================================================================
// Miner Tests
// ============================================================================

mod miner {
    use super::*;

    #[tokio::test]
    async fn summary_over_tcp() {
        let server = MockMinerServer::start(miner_reply).await;
        let miner = server.miner().build().unwrap();

        let summary = miner.summary().await.unwrap();

        assert_eq!(summary.status_code(), Some("S"));
        let fields = summary.first("SUMMARY").unwrap();
        assert_eq!(fields["Elapsed"], Scalar::Int(3600));
        assert_eq!(fields["Hardware Errors"], Scalar::Int(0));
    }

    #[tokio::test]
    async fn settings_over_tcp() {
        let server = MockMinerServer::start(miner_reply).await;
        let miner = server
            .miner()
            .with_web_credentials("admin", "s3cret")
            .build()
            .unwrap();

        let mode = miner.set_work_mode(WorkMode::High).await;
        let pool = miner
            .set_pool(2, "stratum+tcp://b:3333", "wallet.nano", "x")
            .await;

        assert!(mode.success);
        assert!(pool.success);
        assert_eq!(pool.message, "Set info success");
        assert_eq!(
            server.requests(),
            [
                "ascset|0,workmode,set,2",
                "setpool|admin,s3cret,1,stratum+tcp://b:3333,wallet.nano,x"
            ]
        );
    }

    #[tokio::test]
    async fn unknown_command_is_rejected() {
        struct Coin;

        impl Command for Coin {
            fn name(&self) -> &'static str {
                "coin"
            }

            fn parameter(&self) -> Option<String> {
                None
            }
        }

        let server = MockMinerServer::start(miner_reply).await;
        let miner = server.miner().build().unwrap();

        let result = miner.command(&Coin).await;
        assert!(!result.success);
        assert_eq!(result.message, "Invalid command");
        assert!(matches!(
            result.into_result(),
            Err(Error::CommandRejected(msg)) if msg == "Invalid command"
        ));

        let raw = miner.send_raw("coin").await.unwrap();
        assert!(raw.contains("Code=14"));
    }

    #[tokio::test]
    async fn snapshot_over_tcp() {
        let server = MockMinerServer::start(miner_reply).await;
        let miner = server.miner().build().unwrap();

        let snapshot = miner.snapshot().await;

        assert!(snapshot.version.is_some());
        assert!(snapshot.summary.is_some());
        assert!(snapshot.stats.is_some());
        assert!(snapshot.devs.is_some());
        assert_eq!(snapshot.pools.as_ref().map(|p| p.len()), Some(2));
        assert_eq!(snapshot.estats.temperature("OTemp"), Some(55.5));
        assert_eq!(snapshot.estats.fan("FanR"), Some(30));
        assert_eq!(snapshot.estats.selected_work_mode(), Some(WorkMode::Mid));
        assert_eq!(server.connections(), 6);
    }

    #[tokio::test]
    async fn unreachable_miner_snapshot() {
        let miner = Miner::tcp("127.0.0.1")
            .with_port(closed_port())
            .with_retries(0)
            .build()
            .unwrap();

        let snapshot = miner.snapshot().await;
        assert!(!snapshot.is_reachable());

        let result = miner.reboot().await;
        assert!(!result.success);
        assert_eq!(result.message, "No response from miner");
    }
}
