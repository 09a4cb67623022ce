use std::env;
use std::process;
use std::str::FromStr;
use std::time::Duration;

use clap::{App, Arg, ArgMatches};
use log::debug;
use prettytable::{Cell, Row, Table};
use separator::Separatable;

use sokoban_astar::config::{HeuristicKind, Limits};
use sokoban_astar::solver::{AStarSolver, SearchStats};
use sokoban_astar::LoadLevel;

fn main() {
    env_logger::init();

    let matches = App::new("sokoban-astar")
        .author("martin-t")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::with_name("heuristic")
                .short("e")
                .long("heuristic")
                .takes_value(true)
                .possible_values(&["greedy", "nearest", "misplaced"])
                .default_value("greedy")
                .help("lower bound used to guide the search"),
        )
        .arg(
            Arg::with_name("max-states")
                .short("s")
                .long("max-states")
                .takes_value(true)
                .help("stop after exploring this many states [default: 100000]"),
        )
        .arg(
            Arg::with_name("timeout")
                .short("t")
                .long("timeout")
                .takes_value(true)
                .help("stop after this many seconds [default: 60]"),
        )
        .arg(
            Arg::with_name("memory-mb")
                .short("m")
                .long("memory-mb")
                .takes_value(true)
                .help("approximate memory limit of the search tables [default: 512]"),
        )
        .arg(Arg::with_name("file").required(true))
        .get_matches();

    let defaults = Limits::default();
    let limits = Limits {
        max_states: parsed_arg(&matches, "max-states", defaults.max_states),
        timeout: Duration::from_secs(parsed_arg(
            &matches,
            "timeout",
            defaults.timeout.as_secs(),
        )),
        memory_limit: parsed_arg(&matches, "memory-mb", defaults.memory_limit / 1024 / 1024)
            .saturating_mul(1024 * 1024),
        ..defaults
    };
    let heuristic: HeuristicKind = parsed_arg(&matches, "heuristic", HeuristicKind::Greedy);
    let path = matches.value_of("file").unwrap_or_default();

    let state = path.load_level().unwrap_or_else(|err| {
        let current_dir = env::current_dir().unwrap_or_default();
        eprintln!(
            "Can't load level {} in {}: {}",
            path,
            current_dir.display(),
            err
        );
        process::exit(1);
    });
    debug!("Loaded level:\n{}", state);

    let mut solver = AStarSolver::new(heuristic.build(), limits).unwrap_or_else(|err| {
        eprintln!("Invalid configuration: {}", err);
        process::exit(1);
    });

    println!("Solving {} using {}...", path, heuristic);
    let outcome = solver.solve(&state);

    match outcome.path() {
        Some(path) => {
            println!("Found solution:");
            for state in path {
                println!("{}", state);
            }
        }
        None => println!("No solution"),
    }
    if let Some(moves) = outcome.moves() {
        println!("{}", moves);
        println!("Moves: {}", moves.move_cnt());
        println!("Pushes: {}", moves.push_cnt());
    }
    println!("{}", solver.termination_reason());

    stats_table(&solver.stats(), outcome.elapsed()).printstd();
}

/// Parses an optional argument, clap prints the error and exits if it's malformed.
fn parsed_arg<T: FromStr>(matches: &ArgMatches<'_>, name: &str, default: T) -> T {
    match matches.value_of(name) {
        Some(value) => value.parse().unwrap_or_else(|_| {
            clap::Error::value_validation_auto(format!(
                "Invalid value for '{}': {}",
                name, value
            ))
            .exit()
        }),
        None => default,
    }
}

fn stats_table(stats: &SearchStats, elapsed: Duration) -> Table {
    let mut table = Table::new();
    let mut add = |name: &str, value: String| {
        table.add_row(Row::new(vec![Cell::new(name), Cell::new(&value)]));
    };

    add("States explored", stats.states_explored.separated_string());
    add("States generated", stats.states_generated.separated_string());
    add("Max depth", stats.max_depth.separated_string());
    add("Frontier", stats.frontier_size.separated_string());
    add("Closed", stats.closed_size.separated_string());
    add("Cleanups", stats.cleanups.separated_string());
    add("Heuristic", stats.heuristic.clone());
    add(
        "Heuristic cache",
        stats
            .cache
            .map_or_else(|| "-".to_string(), |cache| cache.to_string()),
    );
    add(
        "Elapsed",
        format!("{} ms", (elapsed.as_millis() as u64).separated_string()),
    );

    table
}
