use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "cppbuild")]
#[command(about = "Generates a shell script that builds the declared C++ targets")]
#[command(version)]
pub struct Args {
    /// Script sections to emit: build, install, run, clean, test.
    /// Defaults to build when none are given; unrecognized words are
    /// ignored.
    pub modes: Vec<String>,

    /// Wrap each target in a block the generated script selects through
    /// its own first positional argument.
    #[arg(long)]
    pub select: bool,

    /// Write the generated script to a file instead of standard output.
    #[arg(short = 'o', long, value_name = "file")]
    pub output: Option<PathBuf>,
}

pub fn parse() -> Args {
    Args::parse()
}
