use std::io;

use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = file_offset::cli::Cli::parse();
    file_offset::init(cli.verbose);

    file_offset::cli::run(cli, io::stdin().lock(), io::stdout().lock())
}
