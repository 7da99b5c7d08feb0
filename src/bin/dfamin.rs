use std::path::{Path, PathBuf};

use anyhow::{ensure, Context};
use clap::{value_parser, Arg, ArgMatches, Command};
use dfamin::{jflap, prelude::*, random};
use tracing::{debug, info, trace};
use tracing_subscriber::{prelude::*, EnvFilter};

fn cli() -> Command {
    Command::new("dfamin")
        .about("Minimization of deterministic finite automata stored in the JFLAP format")
        .subcommand_required(true)
        .arg(
            Arg::new("verbosity")
                .short('v')
                .long("verbosity")
                .num_args(0..=1)
                .require_equals(true)
                .value_parser(["info", "debug", "trace"])
                .default_missing_value("info"),
        )
        .subcommand(
            Command::new("minimize")
                .about("minimizes the automaton in the given file and writes the result next to it")
                .arg(
                    Arg::new("algorithm")
                        .short('a')
                        .long("algorithm")
                        .help("moore (partition refinement) or table (table filling)")
                        .value_parser(|s: &str| s.parse::<MinimizationAlgorithm>())
                        .default_value("moore"),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .help("where to write the minimized automaton, defaults to <stem>.min.jff")
                        .value_parser(value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("input")
                        .required(true)
                        .value_parser(value_parser!(PathBuf)),
                ),
        )
        .subcommand(
            Command::new("generate")
                .about("generates a random complete automaton in which every state is reachable")
                .arg(
                    Arg::new("states")
                        .short('n')
                        .long("states")
                        .required(true)
                        .value_parser(value_parser!(u64).range(1..)),
                )
                .arg(
                    Arg::new("symbols")
                        .short('s')
                        .long("symbols")
                        .help("comma separated list of symbols")
                        .default_value("a,b"),
                )
                .arg(
                    Arg::new("output")
                        .required(true)
                        .value_parser(value_parser!(PathBuf)),
                ),
        )
}

fn setup_logging(matches: &ArgMatches) {
    let filter = match matches
        .try_get_one::<String>("verbosity")
        .ok()
        .flatten()
    {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    let stderr_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(stderr_log.with_filter(filter))
        .init();

    trace!("logging is set up");
}

/// Places the output next to the input, replacing everything after the last dot of the file
/// name with `min.jff`.
fn default_output(input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = name.rfind('.').map_or(name.as_str(), |dot| &name[..dot]);
    input.with_file_name(format!("{stem}.min.jff"))
}

fn minimize(matches: &ArgMatches) -> anyhow::Result<()> {
    let input = matches
        .get_one::<PathBuf>("input")
        .context("no input file given")?;
    let algorithm = matches
        .get_one::<MinimizationAlgorithm>("algorithm")
        .copied()
        .unwrap_or_default();
    let output = matches
        .get_one::<PathBuf>("output")
        .cloned()
        .unwrap_or_else(|| default_output(input));

    let dfa = jflap::load(input).context("could not read the input automaton")?;
    println!("original automaton:\n{}", dfa.colored_transition_table());

    let start = std::time::Instant::now();
    let minimal = dfa
        .minimize_with(algorithm)
        .with_context(|| format!("could not minimize {}", input.display()))?;
    info!(
        "minimization with {algorithm} took {}µs",
        start.elapsed().as_micros()
    );
    println!("minimized automaton:\n{}", minimal.colored_transition_table());

    jflap::save(&minimal, &output).context("could not write the minimized automaton")?;
    println!(
        "reduced {} to {} states, written to {}",
        dfa.size(),
        minimal.size(),
        output.display()
    );
    Ok(())
}

fn generate(matches: &ArgMatches) -> anyhow::Result<()> {
    let size = usize::try_from(
        *matches
            .get_one::<u64>("states")
            .context("number of states is missing")?,
    )?;
    let output = matches
        .get_one::<PathBuf>("output")
        .context("no output file given")?;
    let symbols = matches
        .get_one::<String>("symbols")
        .map_or("a,b", |s| s.as_str());
    let alphabet: Alphabet = symbols
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    ensure!(
        size == 1 || !alphabet.is_empty(),
        "an automaton with {size} states needs at least one symbol"
    );

    debug!("generating automaton with {size} states over {}", alphabet.show());
    let dfa = random::generate_random_dfa(size, alphabet);
    jflap::save(&dfa, output).context("could not write the generated automaton")?;
    println!("{dfa}");
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();

    setup_logging(&matches);

    match matches.subcommand() {
        Some(("minimize", sub_matches)) => minimize(sub_matches),
        Some(("generate", sub_matches)) => generate(sub_matches),
        _ => unreachable!("clap enforces a subcommand"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        cli().debug_assert();
    }

    #[test]
    fn output_names() {
        assert_eq!(
            default_output(Path::new("tests/gen.jff")),
            PathBuf::from("tests/gen.min.jff")
        );
        assert_eq!(
            default_output(Path::new("a.b.jff")),
            PathBuf::from("a.b.min.jff")
        );
        assert_eq!(
            default_output(Path::new("automaton")),
            PathBuf::from("automaton.min.jff")
        );
    }

    #[test]
    fn parses_arguments() {
        let matches = cli()
            .try_get_matches_from(["dfamin", "-v=debug", "minimize", "-a", "table", "in.jff"])
            .unwrap();
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "minimize");
        assert_eq!(
            sub.get_one::<MinimizationAlgorithm>("algorithm"),
            Some(&MinimizationAlgorithm::TableFilling)
        );
        assert!(cli()
            .try_get_matches_from(["dfamin", "minimize", "-a", "fast", "in.jff"])
            .is_err());
        assert!(cli()
            .try_get_matches_from(["dfamin", "generate", "-n", "0", "out.jff"])
            .is_err());
    }

    #[test]
    fn generate_and_minimize() {
        let dir = tempfile::tempdir().unwrap();
        let generated = dir.path().join("gen.jff");
        let matches = cli()
            .try_get_matches_from([
                "dfamin",
                "generate",
                "-n",
                "12",
                "-s",
                "x, y",
                generated.to_str().unwrap(),
            ])
            .unwrap();
        generate(matches.subcommand_matches("generate").unwrap()).unwrap();

        let matches = cli()
            .try_get_matches_from(["dfamin", "minimize", generated.to_str().unwrap()])
            .unwrap();
        minimize(matches.subcommand_matches("minimize").unwrap()).unwrap();

        let original = jflap::load(&generated).unwrap();
        let minimal = jflap::load(dir.path().join("gen.min.jff")).unwrap();
        assert!(minimal.size() <= original.size());
        assert_eq!(
            minimal.alphabet().universe().collect::<Vec<_>>(),
            vec!["x", "y"]
        );
        assert_eq!(original.equivalent(&minimal), Ok(true));
    }
}
