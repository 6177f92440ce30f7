mod builder;
mod help;
mod logger;
mod run;
mod supervisor;
mod target;
mod ticker;
mod toolchain;

use clap::{App, AppSettings, Arg, ArgMatches};
use std::ffi::OsString;
use std::time::Duration;

fn main() {
    let matches = cli().get_matches();

    // Info logs by default so that every restart is visible
    let verbosity = if matches.is_present("quiet") {
        0
    } else {
        2 + matches.occurrences_of("verbose")
    };
    if let Err(err) = logger::init(verbosity) {
        eprintln!("rerun: {}", err);
    }

    if let Err(err) = run::main(options(&matches)) {
        log::error!("{:#}", err);
        std::process::exit(1);
    }
}

fn cli() -> App<'static, 'static> {
    App::new("rerun")
        .version(std::env!("CARGO_PKG_VERSION"))
        .author(std::env!("CARGO_PKG_AUTHORS"))
        .about(std::env!("CARGO_PKG_DESCRIPTION"))
        .setting(AppSettings::TrailingVarArg)
        .after_help(help::AFTER_HELP)
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .multiple(true)
                .help("Print debug logs"),
        )
        .arg(
            Arg::with_name("quiet")
                .short("q")
                .long("quiet")
                .conflicts_with("verbose")
                .help("Only print errors"),
        )
        .arg(
            Arg::with_name("compiler")
                .long("compiler")
                .takes_value(true)
                .value_name("go")
                .default_value("go")
                .help("Path to the go executable, or its name in the PATH"),
        )
        .arg(
            Arg::with_name("interval")
                .long("interval")
                .takes_value(true)
                .value_name("ms")
                .default_value("1000")
                .validator(|value| match value.parse::<u64>() {
                    Ok(ms) if ms > 0 => Ok(()),
                    _ => Err("the interval must be a positive number of milliseconds".into()),
                })
                .help("Time between two builds"),
        )
        .arg(
            Arg::with_name("always-start")
                .long("always-start")
                .help("Start the program even if the first build had nothing to rebuild"),
        )
        .arg(
            Arg::with_name("COMMAND")
                .required(true)
                .multiple(true)
                .help("Import path of the main package, followed by the arguments of the program"),
        )
}

fn options(matches: &ArgMatches) -> run::Options {
    // COMMAND is required so clap already rejected an empty one
    let mut args: Vec<OsString> = matches
        .values_of_os("COMMAND")
        .map(|values| values.map(OsString::from).collect())
        .unwrap_or_default();
    let import_path = if args.is_empty() {
        String::new()
    } else {
        args.remove(0).to_string_lossy().into_owned()
    };
    let interval = matches
        .value_of("interval")
        .and_then(|ms| ms.parse().ok())
        .unwrap_or(1000);
    run::Options {
        compiler: matches.value_of("compiler").unwrap_or("go").to_string(),
        interval: Duration::from_millis(interval),
        always_start: matches.is_present("always-start"),
        import_path,
        args,
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::OsString;
    use std::time::Duration;

    fn options(args: &[&str]) -> super::run::Options {
        let matches = super::cli().get_matches_from_safe(args).unwrap();
        super::options(&matches)
    }

    #[test]
    fn defaults() {
        let options = options(&["rerun", "example.com/hello"]);
        assert_eq!(options.import_path, "example.com/hello");
        assert_eq!(options.compiler, "go");
        assert_eq!(options.interval, Duration::from_secs(1));
        assert!(!options.always_start);
        assert!(options.args.is_empty());
    }

    #[test]
    fn program_arguments_are_forwarded() {
        let options = options(&[
            "rerun",
            "--interval",
            "250",
            "--always-start",
            "example.com/server",
            "-addr",
            ":8080",
            "--verbose",
        ]);
        assert_eq!(options.import_path, "example.com/server");
        assert_eq!(options.interval, Duration::from_millis(250));
        assert!(options.always_start);
        let expected: Vec<OsString> = vec!["-addr".into(), ":8080".into(), "--verbose".into()];
        assert_eq!(options.args, expected);
    }

    #[test]
    fn usage_errors() {
        assert!(super::cli().get_matches_from_safe(&["rerun"]).is_err());
        assert!(super::cli()
            .get_matches_from_safe(&["rerun", "--interval", "0", "example.com/hello"])
            .is_err());
    }
}
