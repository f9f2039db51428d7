use clap::Parser;
use env_logger::Builder;
use log::LevelFilter;
use scaffold_tools::cli::{Args, Commands};
use scaffold_tools::commands;
use scaffold_tools::config::Config;
use scaffold_tools::error::exit_code_for;
use std::io::Write;

fn main() {
    let args = Args::parse();

    let log_level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    Builder::new()
        .filter_level(log_level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {}: {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .init();

    if let Err(e) = run(args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(exit_code_for(&e));
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load(),
    }
    .with_tmp_dir(args.tmp_dir);

    match args.command {
        Commands::Breakpoints {
            reference,
            scaffolds,
            min_bases,
            coords,
        } => commands::breakpoints::run(&config, reference, scaffolds, min_bases, coords),
        Commands::Coverage {
            contigs,
            coverage,
            depth,
            json,
        } => commands::coverage::run(contigs, coverage, depth, json),
        Commands::Kmer {
            input,
            kmer,
            list,
            format,
        } => commands::kmer::run(input, kmer, list, format),
        Commands::ReadDiff {
            a,
            b,
            output,
            format,
        } => commands::read_diff::run(a, b, output, format),
        Commands::Align {
            aligner,
            reference,
            query,
            output,
        } => commands::align::run(&config, aligner, reference, query, output),
    }
}
