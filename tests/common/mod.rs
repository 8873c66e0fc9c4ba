use std::io::Read;
use std::net::TcpListener;
use std::sync::mpsc::{self, Receiver};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tiny_http::{Header, Response, Server};

pub struct Captured {
    pub method: String,
    pub url: String,
    pub content_type: Option<String>,
    pub body: serde_json::Value,
}

/// Local registration service answering `replies` requests in order.
pub struct StubServer {
    pub base_url: String,
    pub requests: Receiver<Captured>,
    handle: Option<JoinHandle<()>>,
}

impl StubServer {
    pub fn start(replies: Vec<(u16, &'static str)>) -> Self {
        Self::start_delayed(replies, Duration::ZERO)
    }

    /// Like `start`, but waits `delay` before answering each request.
    pub fn start_delayed(replies: Vec<(u16, &'static str)>, delay: Duration) -> Self {
        let server = Server::http("127.0.0.1:0").expect("bind stub server");
        let port = server
            .server_addr()
            .to_ip()
            .expect("stub server has an IP address")
            .port();
        let (tx, requests) = mpsc::channel();

        let handle = thread::spawn(move || {
            for (status, body) in replies {
                let mut request = match server.recv() {
                    Ok(request) => request,
                    Err(_) => return,
                };
                let mut raw = String::new();
                request
                    .as_reader()
                    .read_to_string(&mut raw)
                    .expect("read request body");
                let content_type = request
                    .headers()
                    .iter()
                    .find(|h| h.field.equiv("Content-Type"))
                    .map(|h| h.value.to_string());
                let _ = tx.send(Captured {
                    method: request.method().to_string(),
                    url: request.url().to_string(),
                    content_type,
                    body: serde_json::from_str(&raw).expect("request body is JSON"),
                });
                let header =
                    Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap();
                let response = Response::from_string(body)
                    .with_status_code(status)
                    .with_header(header);
                thread::sleep(delay);
                let _ = request.respond(response);
            }
        });

        Self {
            base_url: format!("http://127.0.0.1:{}", port),
            requests,
            handle: Some(handle),
        }
    }

    pub fn join(mut self) {
        if let Some(handle) = self.handle.take() {
            handle.join().expect("stub server thread");
        }
    }
}

/// Base URL of a port nothing listens on.
pub fn closed_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind probe");
    let port = listener.local_addr().expect("probe address").port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

/// Base URL of a listener that accepts connections and never answers.
pub fn silent_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind silent listener");
    let port = listener.local_addr().expect("silent listener address").port();
    thread::spawn(move || {
        let mut held = Vec::new();
        for stream in listener.incoming().flatten() {
            held.push(stream);
        }
    });
    format!("http://127.0.0.1:{}", port)
}
