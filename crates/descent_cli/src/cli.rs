use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};

pub fn build_app() -> App<'static, 'static> {
    let config_option = Arg::with_name("config")
        .long("config")
        .short("c")
        .takes_value(true)
        .value_name("FILE")
        .help("JSON file overriding the default constants");

    let output_option = Arg::with_name("output")
        .long("output")
        .short("o")
        .takes_value(true)
        .value_name("FILE")
        .help("Write JSON here instead of stdout");

    let fall_subcommand = SubCommand::with_name("fall")
        .about("Object falling from a tower on the rotating Earth")
        .arg(config_option.clone())
        .arg(output_option.clone())
        .arg(
            Arg::with_name("stepper")
                .long("stepper")
                .short("s")
                .takes_value(true)
                .possible_values(&["rk4", "tsit5"])
                .help("Solver used between frames"),
        );

    let race_subcommand = SubCommand::with_name("race")
        .about("Fastest-descent race between the comparison curves")
        .arg(config_option)
        .arg(output_option)
        .arg(
            Arg::with_name("summary")
                .long("summary")
                .help("Only write arrival times and the ranking"),
        );

    App::new("descent")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Exports animation frames for the descent demonstrations")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .subcommand(fall_subcommand)
        .subcommand(race_subcommand)
}

pub fn parse_command_line() -> ArgMatches<'static> {
    build_app().get_matches()
}
