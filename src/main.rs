use clap::{App, Arg};
use log::{error, LevelFilter};
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};
use std::path::PathBuf;
use std::process::exit;

use config_relay::{ConfigRelay, ConsoleHost, HostEvent};

mod config_relay;

fn main() {
    let matches = App::new("Fitface Companion Relay")
        .version("0.1")
        .about(
            "Replays one watch-face configuration session: opens the settings \
             page, decodes the returned payload and builds the message for the watch.",
        )
        .arg(
            Arg::with_name("RESPONSE")
                .help("URL-encoded JSON string as returned by the settings page")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("OUTPUT_FILE")
                .help("Where to write the encoded watch message")
                .index(2),
        )
        .arg(Arg::with_name("v").short("v").help("Print extra info"))
        .get_matches();

    let verbosity = if matches.is_present("v") {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    TermLogger::init(
        verbosity,
        ConfigBuilder::default()
            .set_thread_level(LevelFilter::Trace)
            .set_target_level(LevelFilter::Trace)
            .build(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .unwrap();

    let response = matches.value_of("RESPONSE").unwrap().to_string();
    let output = matches.value_of("OUTPUT_FILE").map(PathBuf::from);

    let mut relay = ConfigRelay::new(ConsoleHost::new(output));

    let session = vec![
        HostEvent::Ready,
        HostEvent::ShowConfiguration,
        HostEvent::WebviewClosed { response },
    ];

    for event in session {
        if let Err(e) = relay.handle_event(event) {
            error!(
                "Something went wrong while relaying the configuration:\n{:#}",
                e
            );
            exit(1)
        }
    }
}
