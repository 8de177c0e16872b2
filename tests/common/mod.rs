//! Minimal blocking HTTP/1.1 server for integration tests.
//!
//! Routes (every one serves the same body):
//!
//! - `/file`, `/file.<ext>`: HEAD with length, GET honouring `Range`
//! - `/nolength`: like `/file` but HEAD omits `Content-Length`
//! - `/redirect`: `302` to `/file`
//! - `/missing`: `404`, `/forbidden`: `403`
//! - `/broken`: HEAD like `/file`, GET answers `500`
#![allow(dead_code)]

use std::io::{self, BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

use rangeread::{ClientConfig, HttpClient};

pub struct TestServer {
    addr: SocketAddr,
    state: Arc<State>,
}

struct State {
    body: Vec<u8>,
    ranges: Mutex<Vec<String>>,
}

impl TestServer {
    pub fn start(body: impl Into<Vec<u8>>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind test server");
        let addr = listener.local_addr().expect("local addr");
        let state = Arc::new(State {
            body: body.into(),
            ranges: Mutex::new(Vec::new()),
        });

        let shared = state.clone();
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { continue };
                let state = shared.clone();
                thread::spawn(move || {
                    let _ = handle(stream, &state);
                });
            }
        });

        Self { addr, state }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// `Range` header of every GET received so far, `-` when absent.
    pub fn ranges(&self) -> Vec<String> {
        self.state.ranges.lock().unwrap().clone()
    }

    pub fn body(&self) -> &[u8] {
        &self.state.body
    }
}

/// Client that ignores proxy settings of the test environment.
pub fn client() -> Arc<HttpClient> {
    let config = ClientConfig {
        use_system_proxy: false,
        ..ClientConfig::default()
    };
    Arc::new(HttpClient::with_config(config).expect("build client"))
}

fn handle(mut stream: TcpStream, state: &State) -> io::Result<()> {
    let mut reader = BufReader::new(stream.try_clone()?);

    let mut request_line = String::new();
    reader.read_line(&mut request_line)?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let path = parts.next().unwrap_or_default().to_string();

    let mut range = None;
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':')
            && name.eq_ignore_ascii_case("range")
        {
            range = Some(value.trim().to_string());
        }
    }

    let head = method == "HEAD";
    let len = state.body.len();

    if !head {
        let recorded = range.clone().unwrap_or_else(|| "-".into());
        state.ranges.lock().unwrap().push(recorded);
    }

    match path.as_str() {
        "/redirect" => respond(&mut stream, "302 Found", &[("Location", "/file".into())], b"", head),
        "/missing" => respond(&mut stream, "404 Not Found", &[], b"", head),
        "/forbidden" => respond(&mut stream, "403 Forbidden", &[], b"", head),
        "/broken" if !head => respond(&mut stream, "500 Internal Server Error", &[], b"oops", head),
        "/nolength" if head => write_head(&mut stream, "200 OK", &[("Accept-Ranges", "bytes".into())]),
        _ if head => respond(
            &mut stream,
            "200 OK",
            &[("Accept-Ranges", "bytes".into())],
            &state.body,
            true,
        ),
        _ => match range.as_deref().and_then(parse_range) {
            None => respond(&mut stream, "200 OK", &[], &state.body, false),
            Some((start, _)) if start >= len as u64 => respond(
                &mut stream,
                "416 Range Not Satisfiable",
                &[("Content-Range", format!("bytes */{len}"))],
                b"",
                false,
            ),
            Some((start, end)) => {
                let start = start as usize;
                let end = end.map_or(len - 1, |end| (end as usize).min(len - 1));
                respond(
                    &mut stream,
                    "206 Partial Content",
                    &[("Content-Range", format!("bytes {start}-{end}/{len}"))],
                    &state.body[start..=end],
                    false,
                )
            }
        },
    }
}

fn parse_range(value: &str) -> Option<(u64, Option<u64>)> {
    let spec = value.strip_prefix("bytes=")?;
    let (start, end) = spec.split_once('-')?;
    let start = start.parse().ok()?;
    let end = if end.is_empty() { None } else { Some(end.parse().ok()?) };
    Some((start, end))
}

/// Write a full response. For HEAD the length is advertised but no body is sent.
fn respond(
    stream: &mut TcpStream,
    status: &str,
    headers: &[(&str, String)],
    body: &[u8],
    head: bool,
) -> io::Result<()> {
    let mut out = format!("HTTP/1.1 {status}\r\nContent-Length: {}\r\n", body.len());
    for (name, value) in headers {
        out.push_str(&format!("{name}: {value}\r\n"));
    }
    out.push_str("Connection: close\r\n\r\n");
    stream.write_all(out.as_bytes())?;
    if !head {
        stream.write_all(body)?;
    }
    stream.flush()
}

fn write_head(stream: &mut TcpStream, status: &str, headers: &[(&str, String)]) -> io::Result<()> {
    let mut out = format!("HTTP/1.1 {status}\r\n");
    for (name, value) in headers {
        out.push_str(&format!("{name}: {value}\r\n"));
    }
    out.push_str("Connection: close\r\n\r\n");
    stream.write_all(out.as_bytes())?;
    stream.flush()
}
