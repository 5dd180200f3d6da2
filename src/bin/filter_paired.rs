use clap::Parser;

use std::io::Write;
use std::path::PathBuf;

use primertrim::errors::*;
use primertrim::filter_paired;
use primertrim::open_output;

/// Keep only read pairs where both reads are long enough after trimming
#[derive(Parser)]
#[command(name = "ptrim-filter-paired")]
#[command(version)]
struct Cli {
    /// Input FASTQ file, forward direction
    #[arg(value_name = "FWD.FQ")]
    input_fastq_fwd: PathBuf,

    /// Input FASTQ file, reverse direction
    #[arg(value_name = "REV.FQ")]
    input_fastq_rev: PathBuf,

    /// Output FASTQ file, forward direction
    #[arg(value_name = "OUT_FWD.FQ")]
    output_fastq_fwd: PathBuf,

    /// Output FASTQ file, reverse direction
    #[arg(value_name = "OUT_REV.FQ")]
    output_fastq_rev: PathBuf,

    /// Minimum length for a read in either direction
    #[arg(long, value_name = "INT", default_value = "50")]
    min_length: usize,
}

fn run(cli: &Cli) -> Result<()> {
    let mut out_fwd = open_output(Some(cli.output_fastq_fwd.as_path()))?;
    let mut out_rev = open_output(Some(cli.output_fastq_rev.as_path()))?;

    filter_paired(
        &cli.input_fastq_fwd,
        &cli.input_fastq_rev,
        &mut *out_fwd,
        &mut *out_rev,
        cli.min_length,
    )?;

    for (out, file) in [
        (&mut out_fwd, &cli.output_fastq_fwd),
        (&mut out_rev, &cli.output_fastq_rev),
    ] {
        out.flush().map_err(|e| Error::FileIo {
            file: file.display().to_string(),
            source: Box::new(e),
        })?;
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .format_timestamp(None)
        .format_target(false)
        .init();

    if let Err(e) = run(&cli) {
        log::error!("{e}");
        std::process::exit(1);
    }
}
