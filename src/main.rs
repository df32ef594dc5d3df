extern crate clap;

use anyhow::Context;
use partition_batch::{config, BatchError, Config, KernelKind};
use std::path::Path;

fn create_clap_parser<'a>(color_choice: clap::ColorChoice) -> clap::Command<'a> {
    clap::Command::new("partition-batch")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Partitioned batch compute: scatter a dataset, compute per chunk, gather and reduce")
        .color(color_choice)
        .arg(clap::Arg::new("kernel").required(true).index(1)
            .possible_values(["geometric", "numeric"])
            .help("kernel applied to every chunk"))
        .arg(clap::Arg::new("config").long("config").takes_value(true).value_name("FILE")
            .help("configuration file (.toml or .json)"))
        .arg(clap::Arg::new("processes").short('n').long("processes").takes_value(true).value_name("P")
            .help("number of cooperating processes, coordinator included"))
        .arg(clap::Arg::new("size").short('s').long("size").takes_value(true).value_name("S")
            .help("number of dataset elements"))
        .arg(clap::Arg::new("seed").long("seed").takes_value(true).value_name("N")
            .help("seed of dataset synthesis"))
        .arg(clap::Arg::new("min").long("min").takes_value(true).value_name("V")
            .help("smallest synthesized value (numeric kernel)"))
        .arg(clap::Arg::new("max").long("max").takes_value(true).value_name("V")
            .help("largest synthesized value (numeric kernel)"))
        .arg(clap::Arg::new("json").long("json").help("print the report as JSON"))
        .arg(clap::Arg::new("verbose").short('v').multiple_occurrences(true)
            .help("more logging, repeat for debug output"))
}

fn parse_arg<T>(matches: &clap::ArgMatches, name: &str, target: &mut T) -> anyhow::Result<()>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    if let Some(raw) = matches.value_of(name) {
        *target = raw.parse().with_context(|| format!("invalid --{} value {:?}", name, raw))?;
    }
    Ok(())
}

fn build_config(matches: &clap::ArgMatches) -> anyhow::Result<Config> {
    let mut config = match matches.value_of("config") {
        Some(path) => Config::load_from_file(Path::new(path))?,
        None => Config::default(),
    };
    config.apply_environment_overrides()?;

    if let Some(kernel) = matches.value_of("kernel") {
        config.kernel = kernel.parse::<KernelKind>().map_err(anyhow::Error::msg)?;
    }
    parse_arg(matches, "processes", &mut config.num_processes)?;
    parse_arg(matches, "size", &mut config.dataset_size)?;
    parse_arg(matches, "seed", &mut config.random_seed)?;
    parse_arg(matches, "min", &mut config.value_min)?;
    parse_arg(matches, "max", &mut config.value_max)?;
    let verbosity = matches.occurrences_of("verbose").min(u64::from(u8::MAX)) as u8;
    config.verbosity = config.verbosity.max(verbosity);

    Ok(config)
}

fn execute(matches: &clap::ArgMatches) -> anyhow::Result<()> {
    let config = build_config(matches)?;
    partition_batch::init(config.verbosity);
    config::check(&config)?;

    let report = partition_batch::run(&config)?;
    if matches.is_present("json") {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report);
    }
    Ok(())
}

pub fn main() {
    let matches = create_clap_parser(clap::ColorChoice::Auto).get_matches();

    if let Err(err) = execute(&matches) {
        match err.downcast_ref::<BatchError>() {
            Some(partition_err) if matches!(partition_err, BatchError::Partition { .. }) => {
                eprintln!("Quitting. {}", partition_err);
            }
            _ => eprintln!("Error: {:#}", err),
        }
        std::process::exit(1);
    }
}
