// Spins in a busy loop parsing a static record, for interrogating parser
// performance with tools like [flamegraph](https://github.com/flamegraph-rs/flamegraph).
use syslog_core::{detect, parse_3164, parse_5424, Grammar};

fn main() {
    let log: &[u8] = b"<165>1 2003-10-11T22:14:15.003Z mymachine.example.com evntslog - ID47 [exampleSDID@32473 iut=\"3\" eventSource=\"Application\" eventID=\"1011\"] An application event log entry...";

    loop {
        let (_, grammar) = detect(log);
        let _ = match grammar {
            Grammar::P3164 => parse_3164(log, "", || 2024),
            Grammar::P5424 => parse_5424(log, ""),
        };
    }
}
