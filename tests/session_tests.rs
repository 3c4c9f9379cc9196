//! Session Lifecycle Tests
//!
//! These tests run the full session against an in-process loopback
//! server and verify:
//! - The request is written exactly once, after establishment
//! - Report ordering: connect, data, close (close exactly once)
//! - Both read policies against fragmented replies
//! - Failure paths: refused connection, premature close, response timeout

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use kvlink::{
    Config, Endpoint, KvlinkError, ReadPolicy, Session, SessionObserver, SessionState,
};

// =============================================================================
// Helper Functions
// =============================================================================

#[derive(Debug, PartialEq)]
enum Report {
    Connected,
    Data(Vec<u8>),
    Error,
    Close,
}

/// Observer recording every report in arrival order
#[derive(Default)]
struct Recorder {
    reports: Vec<Report>,
}

impl SessionObserver for Recorder {
    fn on_connected(&mut self, _endpoint: &Endpoint) {
        self.reports.push(Report::Connected);
    }

    fn on_data(&mut self, chunk: &[u8]) {
        self.reports.push(Report::Data(chunk.to_vec()));
    }

    fn on_error(&mut self, _error: &KvlinkError) {
        self.reports.push(Report::Error);
    }

    fn on_close(&mut self) {
        self.reports.push(Report::Close);
    }
}

/// Bind a loopback listener and serve exactly one connection with `handler`
fn spawn_server<F>(handler: F) -> (Endpoint, thread::JoinHandle<()>)
where
    F: FnOnce(TcpStream) + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        handler(stream);
    });
    (Endpoint::new("127.0.0.1", port).unwrap(), handle)
}

fn test_config() -> Config {
    Config::builder()
        .connect_timeout_ms(2000)
        .response_timeout_ms(2000)
        .build()
}

// =============================================================================
// Successful Exchange
// =============================================================================

#[test]
fn test_single_reply() {
    let (tx, rx) = mpsc::channel();
    let (endpoint, server) = spawn_server(move |mut stream| {
        let mut buf = [0u8; 1024];
        let n = stream.read(&mut buf).unwrap();
        tx.send(buf[..n].to_vec()).unwrap();

        stream.write_all(b"42").unwrap();

        // Drain until the client closes; any bytes here would be a
        // second request write
        let mut rest = Vec::new();
        let _ = stream.read_to_end(&mut rest);
        tx.send(rest).unwrap();
    });

    let mut recorder = Recorder::default();
    let mut session = Session::open(endpoint, &b"get Teacher"[..], test_config());
    let response = session.run(&mut recorder).unwrap();

    assert_eq!(response.as_bytes(), b"42");
    assert_eq!(session.state(), SessionState::Closed);
    assert_eq!(
        recorder.reports,
        vec![
            Report::Connected,
            Report::Data(b"42".to_vec()),
            Report::Close,
        ]
    );

    // The request arrived intact, once, with nothing after it
    assert_eq!(rx.recv().unwrap(), b"get Teacher");
    assert!(rx.recv().unwrap().is_empty());
    server.join().unwrap();
}

#[test]
fn test_independent_sessions() {
    let (first_endpoint, first_server) = spawn_server(|mut stream| {
        let mut buf = [0u8; 1024];
        let _ = stream.read(&mut buf).unwrap();
        stream.write_all(b"one").unwrap();
    });
    let (second_endpoint, second_server) = spawn_server(|mut stream| {
        let mut buf = [0u8; 1024];
        let _ = stream.read(&mut buf).unwrap();
        stream.write_all(b"two").unwrap();
    });

    // Sessions are owned values; two can coexist without interference
    let mut first = Session::open(first_endpoint, &b"get a"[..], test_config());
    let mut second = Session::open(second_endpoint, &b"get b"[..], test_config());

    let mut recorder = Recorder::default();
    assert_eq!(first.run(&mut recorder).unwrap().as_bytes(), b"one");
    assert_eq!(second.run(&mut recorder).unwrap().as_bytes(), b"two");

    first_server.join().unwrap();
    second_server.join().unwrap();
}

// =============================================================================
// Fragmented Replies (both policies)
// =============================================================================

#[test]
fn test_fragmented_reply_first_chunk_truncates() {
    let (endpoint, server) = spawn_server(|mut stream| {
        let mut buf = [0u8; 1024];
        let _ = stream.read(&mut buf).unwrap();

        stream.write_all(b"hel").unwrap();
        thread::sleep(Duration::from_millis(300));
        // The client has already closed under the first-chunk policy
        let _ = stream.write_all(b"lo");
    });

    let mut recorder = Recorder::default();
    let mut session = Session::open(endpoint, &b"get Teacher"[..], test_config());
    let response = session.run(&mut recorder).unwrap();

    // Historical behavior: the reply is truncated to its first delivery
    assert_eq!(response.as_bytes(), b"hel");
    assert_eq!(
        recorder.reports,
        vec![
            Report::Connected,
            Report::Data(b"hel".to_vec()),
            Report::Close,
        ]
    );
    server.join().unwrap();
}

#[test]
fn test_fragmented_reply_until_close_accumulates() {
    let (endpoint, server) = spawn_server(|mut stream| {
        let mut buf = [0u8; 1024];
        let _ = stream.read(&mut buf).unwrap();

        stream.write_all(b"hel").unwrap();
        thread::sleep(Duration::from_millis(200));
        stream.write_all(b"lo").unwrap();
    });

    let config = Config::builder()
        .connect_timeout_ms(2000)
        .response_timeout_ms(2000)
        .read_policy(ReadPolicy::UntilClose)
        .build();

    let mut recorder = Recorder::default();
    let mut session = Session::open(endpoint, &b"get Teacher"[..], config);
    let response = session.run(&mut recorder).unwrap();

    assert_eq!(response.as_bytes(), b"hello");
    assert_eq!(
        recorder.reports,
        vec![
            Report::Connected,
            Report::Data(b"hel".to_vec()),
            Report::Data(b"lo".to_vec()),
            Report::Close,
        ]
    );
    server.join().unwrap();
}

// =============================================================================
// Failure Paths
// =============================================================================

#[test]
fn test_connection_refused() {
    // Bind then drop to obtain a port with no listener
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let endpoint = Endpoint::new("127.0.0.1", port).unwrap();
    let mut recorder = Recorder::default();
    let mut session = Session::open(endpoint, &b"get Teacher"[..], test_config());
    let err = session.run(&mut recorder).unwrap_err();

    assert!(matches!(err, KvlinkError::Connect(_)));
    // One error report, then the terminal close; no data, no second attempt
    assert_eq!(recorder.reports, vec![Report::Error, Report::Close]);
    assert_eq!(session.state(), SessionState::Closed);
}

#[test]
fn test_premature_close() {
    let (endpoint, server) = spawn_server(|mut stream| {
        let mut buf = [0u8; 1024];
        let _ = stream.read(&mut buf).unwrap();
        // Hang up without sending a byte
    });

    let mut recorder = Recorder::default();
    let mut session = Session::open(endpoint, &b"get Teacher"[..], test_config());
    let err = session.run(&mut recorder).unwrap_err();

    assert!(matches!(err, KvlinkError::PrematureClose));
    assert_eq!(recorder.reports, vec![Report::Connected, Report::Close]);
    assert_eq!(session.state(), SessionState::Closed);
    server.join().unwrap();
}

#[test]
fn test_response_timeout() {
    let (endpoint, server) = spawn_server(|mut stream| {
        let mut buf = [0u8; 1024];
        let _ = stream.read(&mut buf).unwrap();
        // Never reply within the client's deadline
        thread::sleep(Duration::from_millis(800));
    });

    let config = Config::builder()
        .connect_timeout_ms(2000)
        .response_timeout_ms(200)
        .build();

    let mut recorder = Recorder::default();
    let mut session = Session::open(endpoint, &b"get Teacher"[..], config);
    let err = session.run(&mut recorder).unwrap_err();

    assert!(matches!(err, KvlinkError::Timeout(_)));
    assert_eq!(
        recorder.reports,
        vec![Report::Connected, Report::Error, Report::Close]
    );
    server.join().unwrap();
}

// =============================================================================
// Close Idempotence
// =============================================================================

#[test]
fn test_close_idempotent_after_completion() {
    let (endpoint, server) = spawn_server(|mut stream| {
        let mut buf = [0u8; 1024];
        let _ = stream.read(&mut buf).unwrap();
        stream.write_all(b"OK").unwrap();
    });

    let mut recorder = Recorder::default();
    let mut session = Session::open(endpoint, &b"del teacher"[..], test_config());
    session.run(&mut recorder).unwrap();

    let reports_before = recorder.reports.len();
    session.close();
    session.close();
    assert_eq!(recorder.reports.len(), reports_before);

    // A completed session cannot be driven again
    assert!(matches!(
        session.run(&mut recorder),
        Err(KvlinkError::Transport(_))
    ));
    server.join().unwrap();
}
