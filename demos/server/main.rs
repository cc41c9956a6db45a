//! Minimal UDP demo of the datagram ingestion path: each datagram is
//! detected and parsed whole, with no framing step (framing only applies
//! to the stream path). Not a production transport — no worker pool, no
//! concurrency, just enough to exercise the core end to end against a
//! real socket.
use std::net::UdpSocket;

use chrono::prelude::*;
use syslog_core::{detect, parse_3164, parse_5424, DefaultHandler, Grammar, Handler};

fn current_year() -> i32 {
    chrono::Utc::now().year()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let socket = UdpSocket::bind("127.0.0.1:9000")?;
    println!("Listening on udp://127.0.0.1:9000...");

    let handler = DefaultHandler::new();
    let mut buf = [0u8; 2048];
    loop {
        let (len, peer) = socket.recv_from(&mut buf)?;
        let datagram = &buf[..len];
        let (_, grammar) = detect(datagram);
        let record = match grammar {
            Grammar::P3164 => parse_3164(datagram, &peer.to_string(), current_year),
            Grammar::P5424 => parse_5424(datagram, &peer.to_string()),
        };
        handler.handle(&record);
    }
}
