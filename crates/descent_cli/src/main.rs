mod cli;
mod commands;

use log::error;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = cli::parse_command_line();
    let result = match matches.subcommand() {
        ("fall", Some(sub)) => commands::run_fall(sub),
        ("race", Some(sub)) => commands::run_race(sub),
        _ => Ok(()),
    };

    if let Err(err) = result {
        error!("{err:#}");
        std::process::exit(1);
    }
}
