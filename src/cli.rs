use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process;

use getopts::Options;

use crate::binder::DEFAULT_CONTAINER;
use crate::event::MissingFieldPolicy;

#[derive(Debug, PartialEq, Eq)]
pub struct Args {
    pub address: SocketAddr,
    pub records: PathBuf,
    pub template: Option<PathBuf>,
    pub container: String,
    pub missing: MissingFieldPolicy,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Parsed {
    Help(String),
    Run(Args),
}

fn opts() -> Options {
    let mut opts = Options::new();
    opts.optflag(
        "h",
        "help",
        concat!("Print the help output of ", env!("CARGO_PKG_NAME")),
    );
    opts.optopt(
        "a",
        "address",
        "Socket address (IP and port) to listen on [Default: 127.0.0.1:8080]",
        "SOCKET_ADDRESS",
    );
    opts.optopt(
        "r",
        "records",
        "JSON file with the records to show, re-read on every request",
        "PATH",
    );
    opts.optopt(
        "t",
        "template",
        "HTML page to mount the calendar in [Default: built-in page]",
        "PATH",
    );
    opts.optopt(
        "c",
        "container",
        "Id of the element the calendar renders into [Default: calendar]",
        "ID",
    );
    opts.optopt(
        "m",
        "missing",
        "What to do with records missing a field: skip, placeholder, reject [Default: skip]",
        "POLICY",
    );
    opts
}

pub fn try_parse(args: Vec<String>) -> Result<Parsed, String> {
    let opts = opts();
    let matches = opts.parse(args).map_err(|fail| fail.to_string())?;

    if matches.opt_present("help") {
        return Ok(Parsed::Help(
            opts.usage(&opts.short_usage(env!("CARGO_PKG_NAME"))),
        ));
    }

    let address = matches
        .opt_get_default("address", SocketAddr::from(([127, 0, 0, 1], 8080)))
        .map_err(|err| format!("Provided value for option 'address' is invalid: {err}"))?;

    let records = matches
        .opt_str("records")
        .map(PathBuf::from)
        .ok_or("Missing required option 'records'")?;

    let template = matches.opt_str("template").map(PathBuf::from);

    let container = matches
        .opt_str("container")
        .unwrap_or_else(|| DEFAULT_CONTAINER.to_string());

    let missing = matches
        .opt_get_default("missing", MissingFieldPolicy::default())
        .map_err(|err| format!("Provided value for option 'missing' is invalid: {err}"))?;

    Ok(Parsed::Run(Args {
        address,
        records,
        template,
        container,
        missing,
    }))
}

pub fn parse(args: Vec<String>) -> Args {
    match try_parse(args) {
        Ok(Parsed::Run(args)) => args,
        Ok(Parsed::Help(usage)) => {
            println!("{usage}");
            process::exit(0);
        }
        Err(err) => {
            eprintln!("{err}");
            process::exit(1);
        }
    }
}
