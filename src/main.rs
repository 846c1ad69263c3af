use clap::{Parser as ClapParser, Subcommand};
use selector_lang::cli::{self, CheckOptions, CliError, EvalOptions, RunOptions};
use std::io::{self, Read};
use tracing::Level;

#[derive(ClapParser)]
#[command(name = "selector")]
#[command(about = "Selector - check, evaluate and compile SQL-92 style message selectors")]
#[command(version)]
struct Cli {
    /// Log more (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the tokens of a selector
    Tokens {
        /// The selector expression
        expr: String,
    },

    /// Parse and type check a selector
    Check {
        /// The selector expression
        expr: String,

        /// JSON object mapping identifiers to bool, string, arith or any
        #[arg(short, long)]
        types: Option<String>,
    },

    /// Evaluate a selector against a JSON object of message properties
    Eval {
        /// The selector expression
        expr: String,

        /// JSON properties (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// JSON object mapping identifiers to bool, string, arith or any
        #[arg(short, long)]
        types: Option<String>,
    },

    /// Print the term program of a selector
    Compile {
        /// The selector expression
        expr: String,

        /// JSON object mapping identifiers to bool, string, arith or any
        #[arg(short, long)]
        types: Option<String>,
    },

    /// Run a compiled term program against a JSON object of message properties
    Run {
        /// The term program
        program: String,

        /// JSON properties (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,
    },

    /// List documentation categories
    Docs,

    /// Show documentation for a specific category
    Doc {
        /// Category name (use 'selector docs' to list categories)
        category: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    let result = match cli.command {
        Commands::Tokens { expr } => {
            for line in cli::execute_tokens(&expr) {
                println!("{}", line);
            }
            Ok(())
        }
        Commands::Check { expr, types } => {
            cli::execute_check(&CheckOptions { expr, types }).map(|result| {
                println!("{}", result.canonical);
                println!("type: {}", result.root_type);
            })
        }
        Commands::Eval { expr, input, types } => read_input(input).and_then(|input| {
            cli::execute_eval(&EvalOptions { expr, input, types })
                .map(|matched| println!("{}", matched))
        }),
        Commands::Compile { expr, types } => cli::execute_compile(&CheckOptions { expr, types })
            .map(|program| println!("{}", program)),
        Commands::Run { program, input } => read_input(input).and_then(|input| {
            cli::execute_run(&RunOptions { program, input }).map(|matched| println!("{}", matched))
        }),
        Commands::Docs => {
            print!("{}", cli::get_docs_overview());
            Ok(())
        }
        Commands::Doc { category } => match cli::get_doc_category(&category) {
            Ok(content) => {
                print!("{}", content);
                Ok(())
            }
            Err(e) => Err(e),
        },
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn read_input(input: Option<String>) -> Result<Option<String>, CliError> {
    Ok(match input {
        Some(s) => Some(s),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer).map_err(CliError::Io)?;
            Some(buffer)
        }
        None => None,
    })
}
