mod cli;
mod load;
mod util;

use std::{
    io::{self, Write},
    path::Path,
    process,
};

use clap::{value_t, App, AppSettings, Arg, ArgMatches};
use log::error;

use cli::report::{ReportOptions, DEFAULT_LINE_WIDTH};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::new().filter_or("ROOMIES_LOG", "warn")).init();
    let matches = App::new("roomies")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Splits the monthly bills between roommates")
        .setting(AppSettings::TrailingVarArg)
        .setting(AppSettings::ArgRequiredElseHelp)
        .arg(
            Arg::with_name("file")
                .short("f")
                .long("file")
                .value_name("FILE")
                .takes_value(true)
                .conflicts_with("TOKENS")
                .help("Reads one report per line of FILE, skipping blank lines and '//' comments"),
        )
        .arg(
            Arg::with_name("no-color")
                .long("no-color")
                .help("Disables colored output"),
        )
        .arg(
            Arg::with_name("collapse-single-share")
                .long("collapse-single-share")
                .help("Omits the shares when a single person pays the whole total"),
        )
        .arg(
            Arg::with_name("width")
                .short("w")
                .long("width")
                .value_name("N")
                .takes_value(true)
                .help("Minimum width of the separator lines [default: 25]"),
        )
        .arg(
            Arg::with_name("TOKENS")
                .multiple(true)
                .allow_hyphen_values(true)
                .required_unless("file")
                .help("date MM/YYYY NAME AMOUNT... -- NAME PERCENT..."),
        )
        .get_matches();
    process::exit(run(&matches));
}

fn run(matches: &ArgMatches) -> i32 {
    if matches.is_present("no-color") {
        util::color::disable();
    }
    let options = ReportOptions {
        collapse_single_share: matches.is_present("collapse-single-share"),
        min_width: if matches.is_present("width") {
            value_t!(matches, "width", usize).unwrap_or_else(|e| e.exit())
        } else {
            DEFAULT_LINE_WIDTH
        },
    };
    if let Some(path) = matches.value_of("file") {
        match load::read_file(Path::new(path), options) {
            Ok(tally) if tally.rejected == 0 => 0,
            Ok(_) => 1,
            Err(e) => {
                eprintln!("Error: {:#}", e);
                2
            }
        }
    } else {
        let tokens = matches
            .values_of("TOKENS")
            .map(|v| v.collect::<Vec<_>>())
            .unwrap_or_default();
        let stdout = io::stdout();
        let mut out = stdout.lock();
        match load::emit(&mut out, &tokens, options).and_then(|ok| out.flush().map(|_| ok)) {
            Ok(true) => 0,
            Ok(false) => 1,
            Err(e) => {
                error!("could not write the report: {}", e);
                2
            }
        }
    }
}
