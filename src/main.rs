use clap::{Args, Parser as ClapParser, Subcommand};
use mapping_expr::DEFAULT_MAX_DEPTH;
use mapping_expr::ParseOptions;
use mapping_expr::cli::{self, CliError, Mode, RunOptions};
use std::io::{self, Read};
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(name = "mapx")]
#[command(about = "mapx - parse mapping expressions and JSON descriptors with embedded templates")]
#[command(version)]
struct Cli {
    /// Maximum nesting depth accepted by the parser
    #[arg(long, global = true, env = "MAPX_MAX_DEPTH", default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Input {
    /// Text to parse (reads from stdin if not provided)
    text: Option<String>,

    /// Treat the input as a bare expression instead of a document
    #[arg(short, long)]
    resolver: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the parse result as JSON
    Parse {
        #[command(flatten)]
        input: Input,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Validate only; prints "ok" or the error
    Check {
        #[command(flatten)]
        input: Input,
    },

    /// Print the input back in canonical form
    Format {
        #[command(flatten)]
        input: Input,

        /// Indent JSON documents
        #[arg(short, long)]
        pretty: bool,
    },

    /// Print the token stream
    Tokens {
        /// Text to tokenize (reads from stdin if not provided)
        text: Option<String>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let parse = ParseOptions::new().with_max_depth(cli.max_depth);

    let result = match cli.command {
        Commands::Parse { input, pretty } => run_parse(input, pretty, parse),
        Commands::Check { input } => run_options(input, false, parse)
            .and_then(|options| cli::execute_check(&options))
            .map(|()| println!("ok")),
        Commands::Format { input, pretty } => run_options(input, pretty, parse)
            .and_then(|options| cli::execute_format(&options))
            .map(|source| println!("{}", source)),
        Commands::Tokens { text } => read_input(text)
            .and_then(|text| cli::execute_tokens(&text))
            .map(|tokens| println!("{}", tokens)),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run_parse(input: Input, pretty: bool, parse: ParseOptions) -> Result<(), CliError> {
    let options = run_options(input, pretty, parse)?;
    let output = cli::execute_parse(&options)?;
    println!("{}", output.json);
    if !output.success {
        std::process::exit(1);
    }
    Ok(())
}

fn run_options(input: Input, pretty: bool, parse: ParseOptions) -> Result<RunOptions, CliError> {
    Ok(RunOptions {
        text: read_input(input.text)?,
        mode: if input.resolver {
            Mode::Resolver
        } else {
            Mode::Document
        },
        pretty,
        parse,
    })
}

fn read_input(text: Option<String>) -> Result<String, CliError> {
    match text {
        Some(s) => Ok(s),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
        None => Err(CliError::NoInput),
    }
}
