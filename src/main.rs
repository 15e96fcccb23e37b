// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

pub mod parser;

use anyhow::Error;
use clap::{App, Arg, ArgMatches};
use config::{Aggregation, Config};
use controller::entities_table;
use engine::{Engine, ErrorKind, PipelineReport};
use log::LevelFilter;
use movie_lens::MovieLensController;
use parser::Statement;
use prettytable::{cell, format::consts::FORMAT_NO_LINESEP, row, table, Table};
use simplelog::{TermLogger, TerminalMode};

macro_rules! prompt {
    ($ed:ident) => {{
        use rustyline::error::ReadlineError;

        match $ed.readline(PROMPT) {
            Ok(line) => {
                $ed.add_history_entry(line.as_str());
                Ok(line)
            }

            Err(ReadlineError::Interrupted) => {
                continue;
            }

            Err(ReadlineError::Eof) => {
                println!("Exiting...Good bye!");
                break;
            }

            Err(e) => Err(e),
        }
    }};
}

const VERSION: &str = env!("CARGO_PKG_VERSION");
const PROMPT: &str = ">> ";

fn cli() -> App<'static, 'static> {
    App::new("item-similarity")
        .version(VERSION)
        .about("Item to item recommendations over a user ratings matrix")
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("FILE")
                .help("TOML configuration file")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("items")
                .long("items")
                .value_name("FILE")
                .help("Comma separated item file, overrides source.items")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("ratings")
                .long("ratings")
                .value_name("FILE")
                .help("Tab separated rating file, overrides source.ratings")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("top")
                .short("n")
                .long("top")
                .value_name("N")
                .help("Amount of recommendations per query")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("aggregation")
                .short("a")
                .long("aggregation")
                .value_name("POLICY")
                .help("How repeated ratings collapse: first, last or mean")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("preview")
                .short("p")
                .long("preview")
                .help("Print the first rows of every pipeline stage"),
        )
        .arg(
            Arg::with_name("query")
                .short("q")
                .long("query")
                .value_name("TITLE")
                .help("Answer a single query and exit")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .multiple(true)
                .help("Increase logging verbosity"),
        )
}

fn load_config(matches: &ArgMatches) -> Result<Config, Error> {
    let mut config = match matches.value_of("config") {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    if let Some(items) = matches.value_of("items") {
        config.source.items = items.into();
    }

    if let Some(ratings) = matches.value_of("ratings") {
        config.source.ratings = ratings.into();
    }

    if let Some(top) = matches.value_of("top") {
        config.engine.top_n = top.parse()?;
    }

    if let Some(aggregation) = matches.value_of("aggregation") {
        config.engine.aggregation = aggregation.parse::<Aggregation>()?;
    }

    if matches.is_present("preview") {
        config.engine.keep_previews = true;
    }

    Ok(config)
}

fn log_level(config: &Config, verbosity: u64) -> LevelFilter {
    match verbosity {
        0 => config.log_level.parse().unwrap_or(LevelFilter::Info),
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn report_table(report: &PipelineReport) -> Table {
    let mut table = table![
        ["items kept", report.items],
        ["items dropped", report.drops.items_dropped()],
        ["ratings kept", report.ratings],
        ["ratings dropped", report.drops.ratings_dropped()],
        ["joined rows", report.joined],
        ["users", report.users],
        ["titles", report.titles]
    ];

    table.set_format(*FORMAT_NO_LINESEP);
    table
}

fn print_previews(engine: &Engine) {
    if let Some(previews) = engine.previews() {
        println!("Items:");
        println!("{}", entities_table(&previews.items));
        println!("Ratings:");
        println!("{}", entities_table(&previews.ratings));
        println!("Merged:");
        println!("{}", entities_table(&previews.joined));
    }
}

fn print_recommendations(engine: &Engine, title: &str, n: usize) {
    match engine.recommend_scored(title, n) {
        Ok(ranked) if ranked.is_empty() => println!("No other titles to compare '{}' with", title),

        Ok(ranked) => {
            println!("Recommendations for '{}':", title);

            let mut table = Table::new();
            for (pos, recommended) in ranked.iter().enumerate() {
                table.add_row(row![
                    pos + 1,
                    recommended.title(),
                    format!("{:.4}", recommended.score())
                ]);
            }

            table.set_format(*FORMAT_NO_LINESEP);
            println!("{}", table);
        }

        Err(e) => {
            println!("{}", e);

            let similar = engine.search(title);
            if !similar.is_empty() {
                println!("Did you mean one of: {}", similar.join(", "));
            }
        }
    }
}

fn query_prompt(engine: &Engine) -> Result<(), Error> {
    let mut rl = rustyline::Editor::<()>::new();
    let top_n = engine.config().top_n;

    println!("Enter a title with its year in brackets, ex. Toy Story (1995)");

    loop {
        let line: String = prompt!(rl)?;

        match line.trim() {
            "?" | "h" | "help" => {
                println!("Query help:");
                println!("<title>                       Recommend {} titles similar to <title>", top_n);
                println!("recommend(\"<title>\", <n>)     Recommend <n> titles similar to <title>");
                println!("similarity(\"<a>\", \"<b>\")      Similarity between two titles");
                println!("search(\"<text>\")              Titles containing <text>");
                println!("stats                         Pipeline summary");
                println!("v | version                   Show version");
                println!("q | quit                      Quit");
            }

            "q" | "quit" => {
                println!("Bye!");
                break;
            }

            "v" | "version" => {
                println!("version: {}", VERSION);
            }

            "stats" => {
                println!("{}", report_table(engine.report()));
            }

            empty if empty.is_empty() => {}

            line => match parser::parse_line(line) {
                Statement::Recommend(title, n) => {
                    print_recommendations(engine, &title, n.unwrap_or(top_n))
                }

                Statement::Similarity(a, b) => match engine.similarity_between(&a, &b) {
                    Ok(sim) => println!("Similarity is {:.4}", sim),
                    Err(e) => println!("{}", e),
                },

                Statement::Search(fragment) => {
                    let found = engine.search(&fragment);
                    if found.is_empty() {
                        println!("No titles containing '{}'", fragment);
                    }

                    for title in found {
                        println!("{}", title);
                    }
                }
            },
        }
    }

    Ok(())
}

fn main() -> Result<(), Error> {
    let matches = cli().get_matches();
    let config = load_config(&matches)?;

    let level = log_level(&config, matches.occurrences_of("verbose"));
    if let Err(e) = TermLogger::init(level, simplelog::Config::default(), TerminalMode::Stderr) {
        eprintln!("Couldn't initialize logger: {:?}", e);
    }

    log::debug!("Using configuration {:?}", config);
    let controller = MovieLensController::with_config(&config.source)?;

    let mut engine = match Engine::with_controller(&controller, &config.engine) {
        Ok(engine) => engine,
        Err(e) => match e.downcast_ref::<ErrorKind>() {
            Some(ErrorKind::EmptyResult(stage)) => {
                println!("Nothing left after the {} stage. Exiting...", stage);
                return Ok(());
            }
            _ => return Err(e),
        },
    };

    print_previews(&engine);
    log::info!("Ready, {} titles known", engine.similarity().len());

    engine.begin_queries();
    let result = match matches.value_of("query") {
        Some(title) => {
            print_recommendations(&engine, title, config.engine.top_n);
            Ok(())
        }

        None => query_prompt(&engine),
    };

    engine.finish();
    result
}
