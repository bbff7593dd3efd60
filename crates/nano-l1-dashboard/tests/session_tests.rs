/*
[INPUT]:  Scripted feed frames from an in-process WebSocket server
[OUTPUT]: End-to-end verification of DashboardSession snapshots and supervision
[POS]:    Integration test layer - session, reducer and feed together
[UPDATE]: When changing session lifecycle or published snapshot semantics
*/

mod common;

use std::time::Duration;

use rstest::rstest;
use tokio_util::sync::CancellationToken;

use nano_l1_dashboard::{DashboardSession, FeedStatus, ReconnectConfig};
use nano_l1_feed::PriceLevel;

use common::{
    FeedServer, RECV_TIMEOUT, book_update_frame, refused_endpoint, start_stalled_listener,
    trades_frame, wait_for,
};

fn reconnect_enabled() -> ReconnectConfig {
    ReconnectConfig {
        enabled: true,
        max_retries: 3,
        resume_state: true,
    }
}

#[tokio::test]
async fn trades_fold_into_position_and_pnl() {
    let server = FeedServer::start().await;
    let mut session = DashboardSession::new(server.url.clone(), ReconnectConfig::default());
    let mut snapshots = session.subscribe_snapshots();
    session.connect().await.unwrap();

    server.send_text(&trades_frame(&[(100.0, 2.0, "buy")]));
    let snapshot = wait_for(&mut snapshots, |s| s.trade_count == 1).await;
    assert_eq!(snapshot.position, 2.0);
    assert_eq!(snapshot.pnl_tail, vec![0.0, -200.0]);

    server.send_text(&trades_frame(&[(110.0, 1.0, "sell")]));
    let snapshot = wait_for(&mut snapshots, |s| s.trade_count == 2).await;
    assert_eq!(snapshot.position, 1.0);
    assert_eq!(snapshot.pnl_tail, vec![0.0, -200.0, -90.0]);
    assert_eq!(snapshot.recent_trades[0].price, 110.0);
    assert!(snapshot.book.is_none());

    session.close().await;
}

#[tokio::test]
async fn book_updates_replace_the_whole_snapshot() {
    let server = FeedServer::start().await;
    let mut session = DashboardSession::new(server.url.clone(), ReconnectConfig::default());
    let mut snapshots = session.subscribe_snapshots();
    session.connect().await.unwrap();

    server.send_text(&book_update_frame(99.0, 101.0));
    let snapshot = wait_for(&mut snapshots, |s| s.book.is_some()).await;
    assert_eq!(snapshot.spread(), 2.0);

    server.send_text(r#"{"eventType":"book_update","data":{"bestBid":{"price":98.5,"qty":4}}}"#);
    let snapshot = wait_for(&mut snapshots, |s| {
        s.book.as_ref().is_some_and(|book| book.best_bid.price == 98.5)
    })
    .await;
    let book = snapshot.book.as_ref().unwrap();
    assert_eq!(book.best_ask, PriceLevel::default());
    assert_eq!(book.last_trade_price, None);
    assert_eq!(snapshot.spread(), 0.0);

    session.close().await;
}

#[rstest]
#[case::not_json("not json")]
#[case::missing_event_type(r#"{"data":[]}"#)]
#[case::bad_trade_payload(r#"{"eventType":"trades","data":[{"price":"x","qty":1,"aggressorSide":"buy"}]}"#)]
#[case::unknown_side(r#"{"eventType":"trades","data":[{"price":1,"qty":1,"aggressorSide":"hold"}]}"#)]
#[case::unknown_event(r#"{"eventType":"heartbeat","data":{}}"#)]
#[tokio::test]
async fn ignored_frames_leave_state_untouched(#[case] frame: &str) {
    let server = FeedServer::start().await;
    let mut session = DashboardSession::new(server.url.clone(), ReconnectConfig::default());
    let mut snapshots = session.subscribe_snapshots();
    session.connect().await.unwrap();

    server.send_text(frame);
    server.send_text(&trades_frame(&[(50.0, 1.0, "sell")]));

    let snapshot = wait_for(&mut snapshots, |s| s.trade_count > 0).await;
    assert_eq!(snapshot.trade_count, 1);
    assert_eq!(snapshot.pnl_points, 2);
    assert_eq!(snapshot.position, -1.0);
    assert_eq!(snapshot.pnl, 50.0);

    session.close().await;
}

#[tokio::test]
async fn empty_trade_batches_add_no_pnl_point() {
    let server = FeedServer::start().await;
    let mut session = DashboardSession::new(server.url.clone(), ReconnectConfig::default());
    let mut snapshots = session.subscribe_snapshots();
    session.connect().await.unwrap();

    server.send_text(&trades_frame(&[]));
    server.send_text(&trades_frame(&[(10.0, 1.0, "buy")]));

    let snapshot = wait_for(&mut snapshots, |s| s.trade_count == 1).await;
    assert_eq!(snapshot.pnl_tail, vec![0.0, -10.0]);

    session.close().await;
}

#[tokio::test]
async fn close_stops_updates_and_releases_the_connection() {
    let server = FeedServer::start().await;
    let mut session = DashboardSession::new(server.url.clone(), ReconnectConfig::default());
    let mut snapshots = session.subscribe_snapshots();
    session.connect().await.unwrap();

    server.send_text(&trades_frame(&[(1.0, 1.0, "buy")]));
    wait_for(&mut snapshots, |s| s.trade_count == 1).await;

    for i in 0..50 {
        server.send_text(&trades_frame(&[(2.0 + i as f64, 1.0, "buy")]));
    }
    session.close().await;
    let after_close = snapshots.borrow_and_update().clone();
    session.close().await;
    server.wait_until(1, FeedServer::client_closes).await;

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(!snapshots.has_changed().unwrap());
    assert_eq!(*snapshots.borrow(), after_close);
}

#[tokio::test]
async fn run_reports_disconnect_when_reconnect_is_disabled() {
    let endpoint = refused_endpoint().await;
    let session = DashboardSession::new(endpoint, ReconnectConfig::default());
    let mut status = session.subscribe_status();
    let shutdown = CancellationToken::new();
    let task = tokio::spawn(session.run(shutdown.clone()));

    let disconnected = wait_for(&mut status, |s| matches!(s, FeedStatus::Disconnected { .. })).await;
    let FeedStatus::Disconnected { retry_count, reason } = disconnected else {
        unreachable!();
    };
    assert_eq!(retry_count, 1);
    assert!(reason.is_some());

    shutdown.cancel();
    wait_for(&mut status, |s| *s == FeedStatus::Stopped).await;
    task.await.unwrap();
}

#[tokio::test]
async fn run_stops_while_handshake_is_stalled() {
    let (endpoint, listener) = start_stalled_listener().await;
    let session = DashboardSession::new(endpoint, ReconnectConfig::default());
    let mut status = session.subscribe_status();
    let shutdown = CancellationToken::new();
    let task = tokio::spawn(session.run(shutdown.clone()));

    wait_for(&mut status, |s| *s == FeedStatus::Connecting).await;
    tokio::time::sleep(Duration::from_millis(100)).await;
    shutdown.cancel();

    tokio::time::timeout(RECV_TIMEOUT, task)
        .await
        .expect("run should return once shutdown fires")
        .unwrap();
    assert_eq!(*status.borrow(), FeedStatus::Stopped);

    listener.abort();
}

#[tokio::test]
async fn run_closes_connection_on_shutdown() {
    let server = FeedServer::start().await;
    let session = DashboardSession::new(server.url.clone(), ReconnectConfig::default());
    let mut status = session.subscribe_status();
    let mut snapshots = session.subscribe_snapshots();
    let shutdown = CancellationToken::new();
    let task = tokio::spawn(session.run(shutdown.clone()));

    wait_for(&mut status, |s| *s == FeedStatus::Connected).await;
    server.send_text(&book_update_frame(1.0, 2.0));
    wait_for(&mut snapshots, |s| s.book.is_some()).await;

    shutdown.cancel();
    task.await.unwrap();
    assert_eq!(*status.borrow(), FeedStatus::Stopped);
    server.wait_until(1, FeedServer::client_closes).await;
}

#[tokio::test]
async fn peer_close_without_reconnect_keeps_last_state() {
    let server = FeedServer::start().await;
    let session = DashboardSession::new(server.url.clone(), ReconnectConfig::default());
    let mut status = session.subscribe_status();
    let mut snapshots = session.subscribe_snapshots();
    let shutdown = CancellationToken::new();
    let task = tokio::spawn(session.run(shutdown.clone()));

    wait_for(&mut status, |s| *s == FeedStatus::Connected).await;
    server.send_text(&trades_frame(&[(100.0, 1.0, "buy")]));
    wait_for(&mut snapshots, |s| s.trade_count == 1).await;

    server.close_client();
    wait_for(&mut status, |s| matches!(s, FeedStatus::Disconnected { .. })).await;
    assert_eq!(snapshots.borrow().trade_count, 1);
    assert_eq!(server.connections(), 1);

    shutdown.cancel();
    task.await.unwrap();
}

#[tokio::test]
async fn reconnect_resumes_state_across_connections() {
    let server = FeedServer::start().await;
    let session = DashboardSession::new(server.url.clone(), reconnect_enabled());
    let mut status = session.subscribe_status();
    let mut snapshots = session.subscribe_snapshots();
    let shutdown = CancellationToken::new();
    let task = tokio::spawn(session.run(shutdown.clone()));

    wait_for(&mut status, |s| *s == FeedStatus::Connected).await;
    server.send_text(&trades_frame(&[(100.0, 2.0, "buy")]));
    wait_for(&mut snapshots, |s| s.trade_count == 1).await;

    server.close_client();
    server.wait_until(2, FeedServer::connections).await;
    server.send_text(&trades_frame(&[(110.0, 1.0, "sell")]));

    let snapshot = wait_for(&mut snapshots, |s| s.trade_count == 2).await;
    assert_eq!(snapshot.position, 1.0);
    assert_eq!(snapshot.pnl_tail, vec![0.0, -200.0, -90.0]);

    shutdown.cancel();
    task.await.unwrap();
}

#[tokio::test]
async fn reconnect_without_resume_starts_from_empty_state() {
    let server = FeedServer::start().await;
    let session = DashboardSession::new(
        server.url.clone(),
        ReconnectConfig {
            resume_state: false,
            ..reconnect_enabled()
        },
    );
    let mut status = session.subscribe_status();
    let mut snapshots = session.subscribe_snapshots();
    let shutdown = CancellationToken::new();
    let task = tokio::spawn(session.run(shutdown.clone()));

    wait_for(&mut status, |s| *s == FeedStatus::Connected).await;
    server.send_text(&trades_frame(&[(100.0, 2.0, "buy")]));
    wait_for(&mut snapshots, |s| s.trade_count == 1).await;

    server.close_client();
    wait_for(&mut snapshots, |s| s.trade_count == 0).await;
    server.wait_until(2, FeedServer::connections).await;
    server.send_text(&trades_frame(&[(110.0, 1.0, "sell")]));

    let snapshot = wait_for(&mut snapshots, |s| s.trade_count == 1).await;
    assert_eq!(snapshot.position, -1.0);
    assert_eq!(snapshot.pnl_tail, vec![0.0, 110.0]);

    shutdown.cancel();
    task.await.unwrap();
}
