#[macro_use]
extern crate criterion;

use criterion::Criterion;

use syslog_core::{detect, parse_3164, parse_5424, Framer, FramingPolicy};

const RFC5424_LOG: &[u8] = b"<165>1 2003-10-11T22:14:15.003Z mymachine.example.com evntslog - ID47 [exampleSDID@32473 iut=\"3\" eventSource=\"Application\" eventID=\"1011\"] An application event log entry...";
const RFC3164_LOG: &[u8] = b"<34>Oct 11 22:14:15 mymachine su: 'su root' failed for lonvick on /dev/pts/8";

fn parse_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    group.bench_function("P5424", |b| b.iter(|| parse_5424(RFC5424_LOG, "")));
    group.bench_function("P3164", |b| b.iter(|| parse_3164(RFC3164_LOG, "", || 2024)));
    group.finish();
}

fn detect_bench(c: &mut Criterion) {
    c.bench_function("detect", |b| b.iter(|| detect(RFC5424_LOG)));
}

fn framer_bench(c: &mut Criterion) {
    let mut framed = RFC3164_LOG.to_vec();
    framed.push(b'\n');
    let framer = Framer::new(FramingPolicy::Newline);

    c.bench_function("framer_newline_extract", |b| b.iter(|| framer.extract(&framed)));
}

criterion_group!(benches, parse_bench, detect_bench, framer_bench);
criterion_main!(benches);
