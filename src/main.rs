use ascii_mosaic::cli::{
    handle_config_action, list_subsets, run_convert, Args, CliError, Command,
};
use ascii_mosaic::config::Config;
use clap::Parser;

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn run(args: Args) -> Result<(), CliError> {
    match args.command {
        Command::Convert(convert) => {
            let config = Config::load(args.config.as_deref())?;
            run_convert(&convert, &config)
        }
        Command::Config { action } => handle_config_action(action, args.config.as_deref()),
        Command::Subsets => {
            list_subsets();
            Ok(())
        }
    }
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
