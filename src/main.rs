use std::fs::File;
use std::path::{Path, PathBuf};

use clap::Parser;
use colored::Colorize;
use miette::{IntoDiagnostic, Result, WrapErr};

use sapasm::{output, SourceFile};

/// sapasm assembles source for a small 8-bit accumulator CPU into a byte listing.
#[derive(Parser)]
#[command(version)]
struct Args {
    /// `.asm` file to assemble
    path: Option<PathBuf>,
    /// Destination for the byte listing, one decimal value per line
    #[arg(short, long, default_value = sapasm::DEFAULT_OUTPUT)]
    output: PathBuf,
    /// Check the file for errors and list its labels without writing output
    #[arg(long)]
    check: bool,
    /// Produce no status output, diagnostics are still shown
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let args = Args::parse();

    let hook = miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new() //
                .context_lines(sapasm::DIAGNOSTIC_CONTEXT_LINES)
                .build(),
        )
    }));

    // Diagnostics share stdout with status messages
    if let Err(e) = hook.into_diagnostic().and_then(|_| run(args)) {
        println!("{e:?}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    use MsgColor::*;
    let status = Status { quiet: args.quiet };

    let Some(path) = args.path else {
        println!("\n~ sapasm v{VERSION} ~");
        println!("{USAGE}");
        return Ok(());
    };

    if args.check {
        status.file_message(Green, "Checking", &path);
    } else {
        status.file_message(Green, "Assembling", &path);
    }
    let src = SourceFile::read(&path)?;
    let air = sapasm::assemble(&src)?;
    // Resolve before touching the destination so a failed run leaves no output behind
    let bytes = sapasm::resolve(&src, &air)?;
    let summary = format!(
        "{} bytes, {} labels, {} forward references",
        bytes.len(),
        air.labels().len(),
        air.pending()
    );
    status.message(Green, "Finished", summary.as_str());

    if args.check {
        if air.labels().is_empty() {
            status.message(Cyan, "Labels", "none declared");
        }
        for (name, label) in air.labels().iter() {
            let line = format!("{name} = {} ({})", label.offset, label.pos);
            status.message(Cyan, "Label", line.as_str());
        }
        status.message(Green, "Success", "no errors found!");
        return Ok(());
    }

    let file = File::create(&args.output)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to create {}", args.output.display()))?;
    output::write_bytes(&bytes, file)?;
    status.file_message(Green, "Saved", &args.output);
    Ok(())
}

#[allow(unused)]
enum MsgColor {
    Green,
    Cyan,
    Red,
}

/// Right-aligned colored status lines, silenced by `--quiet`.
struct Status {
    quiet: bool,
}

impl Status {
    fn file_message(&self, color: MsgColor, left: &str, right: &Path) {
        let right = format!("target {}", right.display());
        self.message(color, left, right.as_str());
    }

    fn message<S>(&self, color: MsgColor, left: S, right: S)
    where
        S: Colorize + std::fmt::Display,
    {
        if self.quiet {
            return;
        }
        let left = match color {
            MsgColor::Green => left.green(),
            MsgColor::Cyan => left.cyan(),
            MsgColor::Red => left.red(),
        };
        println!("{left:>12} {right}");
    }
}

const USAGE: &str = r"
Must give a file argument!
Usage: sapasm <PATH> [--output <DEST>] [--check] [--quiet]
Please use `-h` or `--help` to access the usage instructions.
";

const VERSION: &str = env!("CARGO_PKG_VERSION");
