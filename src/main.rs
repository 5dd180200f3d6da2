use clap::Parser;

use std::io::Write;
use std::path::{Path, PathBuf};

use primertrim::errors::*;
use primertrim::*;

#[derive(Parser)]
#[command(name = "ptrim")]
#[command(about = "Trim primer sequences from the 3' end of sequencing reads", long_about = None)]
#[command(version)]
struct Cli {
    /// Primer sequences to be trimmed, IUPAC ambiguity codes allowed
    #[arg(value_name = "PRIMER", required_unless_present = "config")]
    primers: Vec<String>,

    // ===== File I/O =====
    /// Input FASTQ file, may be gzipped (default: standard input)
    #[arg(short = 'i', long, value_name = "FASTQ")]
    input_fastq: Option<PathBuf>,

    /// Output FASTQ file after trimming, gzipped if it ends in .gz (default: standard output)
    #[arg(short = 'o', long, value_name = "FASTQ")]
    output_fastq: Option<PathBuf>,

    /// Tab-separated log of the primer found in each read (default: not written)
    #[arg(long, value_name = "FILE")]
    log: Option<PathBuf>,

    /// YAML file with trimming options; command line primers are added to its primers
    #[arg(long, value_name = "YAML")]
    config: Option<PathBuf>,

    // ===== Complete and partial matching =====
    /// Don't match the reverse complement during the complete and partial matching stages
    #[arg(long)]
    no_revcomp: bool,

    /// Mismatches allowed during the complete matching stage [default: 1]
    #[arg(long, value_name = "INT")]
    mismatches: Option<usize>,

    /// Minimum length of match during the partial matching stage [default: 8]
    #[arg(long, value_name = "INT")]
    min_partial: Option<usize>,

    /// Reads shorter than this after trimming are dropped [default: 1]
    #[arg(long, value_name = "INT")]
    min_length: Option<usize>,

    // ===== Alignment matching =====
    /// Activate the alignment matching stage
    #[arg(long)]
    alignment: bool,

    /// Directory for alignment files (default: temporary directory)
    #[arg(long, value_name = "DIR")]
    alignment_dir: Option<PathBuf>,

    /// Minimum identity of an accepted alignment [default: 0.85]
    #[arg(long, value_name = "FLOAT")]
    min_id: Option<f64>,

    /// Threads used by the aligner (default: all)
    #[arg(long, value_name = "INT")]
    threads: Option<usize>,

    /// Log debug information
    #[arg(short = 'v', long)]
    verbose: bool,
}

impl Cli {
    fn options(&self) -> Result<TrimOptions> {
        let mut opts = match &self.config {
            Some(file) => TrimOptions::from_yaml_file(file)?,
            None => TrimOptions::default(),
        };

        opts.primers.extend(self.primers.iter().cloned());
        if self.no_revcomp {
            opts.revcomp = false;
        }
        if self.alignment {
            opts.alignment = true;
        }
        if let Some(dir) = &self.alignment_dir {
            opts.alignment_dir = Some(dir.clone());
        }
        opts.mismatches = self.mismatches.unwrap_or(opts.mismatches);
        opts.min_partial = self.min_partial.unwrap_or(opts.min_partial);
        opts.min_length = self.min_length.unwrap_or(opts.min_length);
        opts.min_id = self.min_id.unwrap_or(opts.min_id);
        opts.threads = self.threads.or(opts.threads);

        Ok(opts)
    }
}

fn write_error(file: Option<&Path>, e: std::io::Error) -> Error {
    Error::FileIo {
        file: file.map_or_else(|| "standard output".to_owned(), |f| f.display().to_string()),
        source: Box::new(e),
    }
}

fn run(cli: &Cli) -> Result<()> {
    let opts = cli.options()?;
    if opts.primers.is_empty() {
        log::warn!("No primers given, reads will be written unchanged");
    }

    let records = match cli.input_fastq.as_deref() {
        Some(file) if file.as_os_str() != "-" => read_fastq_file(file)?,
        _ => read_fastq_stdin()?,
    };
    let mut reads = TrimmableReads::from_fastq(records)?;

    Pipeline::from_options(&opts)?.run(&mut reads)?;

    let out_file = cli.output_fastq.as_deref();
    let mut out = open_output(out_file)?;
    for record in reads.trimmed_reads(opts.min_length) {
        write_fastq_record(&mut *out, record).map_err(|e| write_error(out_file, e))?;
    }
    out.flush().map_err(|e| write_error(out_file, e))?;

    if let Some(log_file) = cli.log.as_deref() {
        let mut log_out = open_output(Some(log_file))?;
        write_log(&mut *log_out, reads.log_rows()).map_err(|e| write_error(Some(log_file), e))?;
        log_out.flush().map_err(|e| write_error(Some(log_file), e))?;
    }

    log::info!("{}", RunSummary::new(&reads, opts.min_length));
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .parse_default_env()
        .format_timestamp(None)
        .format_target(false)
        .init();

    if let Err(e) = run(&cli) {
        log::error!("{e}");
        std::process::exit(1);
    }
}
