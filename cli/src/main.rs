mod test_runner;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use codespan_reporting::diagnostic::Diagnostic;
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};

use assembler::{MessageReader, ReaderConfig, SwiftMessage};
use swiftmsg::SwiftBlock;

const SUBCOMMANDS: &[&str] = &["parse", "test", "help"];

#[derive(Parser)]
#[command(name = "swiftmsg", version, about = "SWIFT FIN message parser")]
struct Cli {
    /// Disable colored error output
    #[arg(long, global = true)]
    no_color: bool,

    /// Log parser activity (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Reader configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a FIN message file
    Parse(ParseArgs),

    /// Run .test.fin fixture files
    Test(TestArgs),
}

#[derive(clap::Args)]
struct ParseArgs {
    /// FIN message file to parse
    file: String,

    /// Parse only, print nothing on success (exit 0 if valid)
    #[arg(long)]
    check: bool,

    /// Dump the typed messages
    #[arg(long)]
    ast: bool,

    /// List the blocks of every message
    #[arg(long)]
    list_blocks: bool,

    /// Print the messages re-serialized from their typed blocks
    #[arg(long)]
    render: bool,
}

#[derive(clap::Args)]
struct TestArgs {
    /// Path to a .test.fin file or directory containing them
    path: String,

    /// Run only tests in these categories (subfolder names). Repeatable.
    #[arg(short, long)]
    category: Vec<String>,

    /// List available categories and exit
    #[arg(long)]
    list_categories: bool,
}

fn main() {
    // `swiftmsg file.fin` works like `swiftmsg parse file.fin`.
    let mut args: Vec<String> = std::env::args().collect();
    if let Some(pos) = args.iter().skip(1).position(|a| !a.starts_with('-')) {
        let pos = pos + 1;
        if !SUBCOMMANDS.contains(&args[pos].as_str()) {
            args.insert(pos, "parse".to_string());
        }
    }

    let cli = Cli::parse_from(&args);
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => match ReaderConfig::load_from_path(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("error: {}", e);
                process::exit(1);
            }
        },
        None => ReaderConfig::default(),
    };

    match cli.command {
        Command::Parse(parse_args) => do_parse(parse_args, &config, cli.no_color),
        Command::Test(test_args) => {
            let path = Path::new(&test_args.path);
            if test_args.list_categories {
                test_runner::list_categories(path);
                return;
            }
            let exit_code = test_runner::run_tests(path, &config, cli.no_color, &test_args.category);
            process::exit(exit_code);
        }
    }
}

fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::from_default_env();
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    } else if std::env::var_os("RUST_LOG").is_none() {
        builder.filter_level(log::LevelFilter::Info);
    }
    builder.init();
}

fn do_parse(args: ParseArgs, config: &ReaderConfig, no_color: bool) {
    let color_choice = if no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    };

    let source = match std::fs::read_to_string(&args.file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: cannot read '{}': {}", args.file, e);
            process::exit(1);
        }
    };

    let mut files = SimpleFiles::new();
    let file_id = files.add(args.file.clone(), source.clone());

    let mut messages = Vec::new();
    for result in MessageReader::new(&source, config.clone()) {
        match result {
            Ok(message) => messages.push(message),
            Err(error) => {
                let writer = StandardStream::stderr(color_choice);
                emit(&writer, &files, &error.to_diagnostic(file_id));
                process::exit(1);
            }
        }
    }
    log::info!("{}: {} message(s)", args.file, messages.len());

    if args.check {
        eprintln!("ok: {} parsed successfully ({} messages)", args.file, messages.len());
        return;
    }

    if args.ast {
        println!("{:#?}", messages);
        return;
    }

    if args.list_blocks {
        for (index, message) in messages.iter().enumerate() {
            println!("message {} (MT{}) {:?}", index + 1, message.message_type(), message.span);
            for block in message.blocks() {
                println!("  {{{}}} {}", block.id(), describe(&block));
            }
        }
        return;
    }

    if args.render {
        for message in &messages {
            println!("{}", message.to_text());
        }
        return;
    }

    for message in &messages {
        println!("{}", summary(message));
    }
}

fn describe(block: &SwiftBlock) -> &'static str {
    match block {
        SwiftBlock::BasicHeader(_) => "basic header",
        SwiftBlock::ApplicationHeaderInput(_) => "application header (input)",
        SwiftBlock::ApplicationHeaderOutput(_) => "application header (output)",
        SwiftBlock::UserHeader(_) => "user header",
        SwiftBlock::Text(_) => "text",
        SwiftBlock::UserTrailer(_) => "user trailer",
        SwiftBlock::SystemTrailer(_) => "system trailer",
        SwiftBlock::General(_) => "unknown",
    }
}

fn summary(message: &SwiftMessage) -> String {
    let priority = message
        .application_header
        .message_priority()
        .map(|p| format!("{:?}", p))
        .unwrap_or_else(|| "-".to_string());
    format!(
        "MT{} from {} priority {} ({} blocks)",
        message.message_type(),
        message.basic_header.logical_terminal_address,
        priority,
        message.blocks().len()
    )
}

fn emit(writer: &StandardStream, files: &SimpleFiles<String, String>, diagnostic: &Diagnostic<usize>) {
    let config = term::Config::default();
    let _ = term::emit_to_write_style(&mut writer.lock(), &config, files, diagnostic);
}
