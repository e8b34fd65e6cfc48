use clap::{App, Arg};
use env_logger::Env;
use log::error;
use std::path::Path;
use std::process;

use quern::build::build_site;
use quern::config::Config;

fn main() {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let matches = App::new("quern")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Renders a directory of markdown posts into a static weblog")
        .arg(
            Arg::with_name("directory")
                .help("Directory from which to search upward for quern.yaml")
                .index(1),
        )
        .get_matches();
    let directory = Path::new(matches.value_of("directory").unwrap_or("."));

    let config = match Config::from_directory(directory) {
        Ok(config) => config,
        Err(err) => {
            error!("{}", err);
            process::exit(1);
        }
    };

    if let Err(err) = build_site(&config) {
        error!("{}", err);
        process::exit(1);
    }
}
