//! Reference driver over the [`Connection`] trait: not a real event loop —
//! no sockets, no threads — just the extract → detect → parse → handle
//! sequence an embedding transport is expected to run.

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{info, warn};

use crate::connection::Connection;
use crate::detect::{detect, Grammar};
use crate::framer::{FrameResult, Framer, FramingPolicy};
use crate::value::Record;
use crate::{rfc3164, rfc5424};

/// Which codec/framing pair to use. `Automatic` runs [`detect`] on every
/// extracted record's leading bytes; the others force a fixed pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecPolicy {
    P3164,
    P5424,
    P6587Octet,
    Automatic,
}

fn fixed_pair(policy: CodecPolicy) -> Option<(FramingPolicy, Grammar)> {
    match policy {
        CodecPolicy::P3164 => Some((FramingPolicy::Newline, Grammar::P3164)),
        CodecPolicy::P5424 => Some((FramingPolicy::Newline, Grammar::P5424)),
        CodecPolicy::P6587Octet => Some((FramingPolicy::OctetCount, Grammar::P5424)),
        CodecPolicy::Automatic => None,
    }
}

/// Receives every record the server loop produces, successfully parsed or
/// not. Must be non-blocking or tolerate concurrent invocation —
/// `process_connection` calls it synchronously and in arrival order.
pub trait Handler {
    fn handle(&self, record: &Record);
}

/// Counts records and logs each one via `tracing` — the crate's documented
/// default handler.
#[derive(Default)]
pub struct DefaultHandler {
    count: AtomicU64,
}

impl DefaultHandler {
    pub fn new() -> Self {
        DefaultHandler { count: AtomicU64::new(0) }
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }
}

impl Handler for DefaultHandler {
    fn handle(&self, record: &Record) {
        self.count.fetch_add(1, Ordering::Relaxed);
        match &record.error {
            Some(err) => warn!(client = %record.client, error = %err, "received malformed record"),
            None => info!(client = %record.client, "received record"),
        }
    }
}

/// A parsed transport address: `udp://host:port`, `tcp://host:port`, or
/// `unix://path`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Address {
    Udp { host: String, port: u16 },
    Tcp { host: String, port: u16 },
    Unix { path: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AddrError {
    #[error("address has no recognised scheme")]
    UnknownScheme,
    #[error("address is missing its host or port")]
    Malformed,
}

/// Parses a transport address string. Unlike the source this is grounded
/// on, an unknown scheme is a hard error rather than a silent no-op — a
/// server that can't bind should never start up appearing to succeed.
pub fn parse_transport_addr(s: &str) -> Result<Address, AddrError> {
    if let Some(rest) = s.strip_prefix("udp://") {
        let (host, port) = split_host_port(rest)?;
        return Ok(Address::Udp { host, port });
    }
    if let Some(rest) = s.strip_prefix("tcp://") {
        let (host, port) = split_host_port(rest)?;
        return Ok(Address::Tcp { host, port });
    }
    if let Some(rest) = s.strip_prefix("unix://") {
        if rest.is_empty() {
            return Err(AddrError::Malformed);
        }
        return Ok(Address::Unix { path: rest.to_string() });
    }
    Err(AddrError::UnknownScheme)
}

fn split_host_port(s: &str) -> Result<(String, u16), AddrError> {
    let (host, port) = s.rsplit_once(':').ok_or(AddrError::Malformed)?;
    let port: u16 = port.parse().map_err(|_| AddrError::Malformed)?;
    if host.is_empty() {
        return Err(AddrError::Malformed);
    }
    Ok((host.to_string(), port))
}

/// Holds the server's configuration surface and drives the record loop over
/// any [`Connection`]. Owns no sockets; an embedding application binds the
/// real transport and calls [`Server::process_connection`] per readable
/// event.
pub struct Server {
    handler: Box<dyn Handler>,
    codec: CodecPolicy,
    buffer_size: usize,
    addr: Option<Address>,
}

impl Default for Server {
    fn default() -> Self {
        Server {
            handler: Box::new(DefaultHandler::new()),
            codec: CodecPolicy::Automatic,
            buffer_size: 4096,
            addr: None,
        }
    }
}

impl Server {
    pub fn new() -> Self {
        Server::default()
    }

    pub fn set_handler(&mut self, handler: Box<dyn Handler>) {
        self.handler = handler;
    }

    pub fn set_codec(&mut self, policy: CodecPolicy) {
        self.codec = policy;
    }

    pub fn set_buffer_size(&mut self, n: usize) {
        self.buffer_size = n;
    }

    pub fn set_addr(&mut self, s: &str) -> Result<(), AddrError> {
        self.addr = Some(parse_transport_addr(s)?);
        Ok(())
    }

    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    pub fn addr(&self) -> Option<&Address> {
        self.addr.as_ref()
    }

    /// Drains every complete record currently framable out of `conn`,
    /// parses and hands each to the configured handler in extraction
    /// order, then re-wakes the connection if a trailing partial record
    /// remains buffered (the stream-path leaves it for the next readable
    /// event rather than blocking for it now).
    pub fn process_connection(&self, conn: &mut dyn Connection) {
        let client = conn.remote_addr();
        loop {
            let available = conn.inbound_buffered();
            if available == 0 {
                return;
            }
            let buf = conn.peek(available);
            let (framing, grammar) = fixed_pair(self.codec).unwrap_or_else(|| detect(&buf));
            let framer = Framer::new(framing);
            match framer.extract(&buf) {
                FrameResult::Record { bytes, consumed } => {
                    let record = match grammar {
                        Grammar::P3164 => rfc3164::parse(bytes, &client, || current_year()),
                        Grammar::P5424 => rfc5424::parse(bytes, &client),
                    };
                    self.handler.handle(&record);
                    conn.discard(consumed);
                }
                FrameResult::Incomplete => {
                    if conn.inbound_buffered() > 0 {
                        conn.wake();
                    }
                    return;
                }
                FrameResult::Invalid(err) => {
                    warn!(client = %client, error = %err, "closing connection on framing error");
                    return;
                }
            }
        }
    }
}

fn current_year() -> i32 {
    use chrono::Datelike;
    chrono::Utc::now().year()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::MemoryConnection;

    #[test]
    fn parses_udp_address() {
        assert_eq!(
            parse_transport_addr("udp://0.0.0.0:9000").unwrap(),
            Address::Udp { host: "0.0.0.0".to_string(), port: 9000 }
        );
    }

    #[test]
    fn parses_unix_address() {
        assert_eq!(
            parse_transport_addr("unix:///var/run/syslog.sock").unwrap(),
            Address::Unix { path: "/var/run/syslog.sock".to_string() }
        );
    }

    #[test]
    fn unknown_scheme_is_an_error() {
        assert_eq!(parse_transport_addr("ftp://host:21"), Err(AddrError::UnknownScheme));
    }

    #[test]
    fn process_connection_drains_newline_framed_records() {
        let mut conn = MemoryConnection::new("10.0.0.5:5514");
        conn.feed(b"<34>Oct 11 22:14:15 mymachine su: hi\n");
        let mut server = Server::new();
        server.set_codec(CodecPolicy::P3164);
        let handler = std::sync::Arc::new(DefaultHandler::new());
        server.set_handler(Box::new(SharedHandler(handler.clone())));
        server.process_connection(&mut conn);
        assert_eq!(handler.count(), 1);
        assert_eq!(conn.inbound_buffered(), 0);
    }

    #[test]
    fn process_connection_wakes_on_trailing_partial_record() {
        let mut conn = MemoryConnection::new("10.0.0.5:5514");
        conn.feed(b"<34>Oct 11 22:14:15 mymachine su: hi\nincomplete-tail");
        let server = Server::new();
        server.process_connection(&mut conn);
        assert!(conn.take_woken());
        assert!(conn.inbound_buffered() > 0);
    }

    struct SharedHandler(std::sync::Arc<DefaultHandler>);
    impl Handler for SharedHandler {
        fn handle(&self, record: &Record) {
            self.0.handle(record);
        }
    }
}
