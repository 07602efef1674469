use std::env::args;

use env_logger::init;
use log::debug;
use ufo_instances_cli::make_instances;
use ufo_instances_core::LogSink;

fn main() {
    init();
    let args: Vec<String> = args().skip(1).collect();
    let mut sink = LogSink::default();
    // Failures are reported through the run log; the exit status stays 0.
    if let Err(e) = make_instances(&args, &mut sink) {
        debug!("{e:?}");
        sink.log("Quitting after error.");
    }
}
