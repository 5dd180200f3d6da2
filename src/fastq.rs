use flate2::write::GzEncoder;
use flate2::Compression;
use needletail::errors::ParseErrorKind;
use needletail::*;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::errors::*;

/// `(description, sequence, quality)` of one fastq record.
pub type FastqRecord = (Vec<u8>, Vec<u8>, Vec<u8>);

/// Read every record of a fastq file, which may be gzip compressed.
pub fn read_fastq_file(file: impl AsRef<Path>) -> Result<Vec<FastqRecord>> {
    let file = file.as_ref();
    let origin = Origin::File(file.display().to_string());
    match open_fastq_file(file)? {
        Some(reader) => read_records(reader, origin),
        None => Ok(Vec::new()),
    }
}

pub fn read_fastq_bytes(bytes: &[u8]) -> Result<Vec<FastqRecord>> {
    read_fastq_reader(io::Cursor::new(bytes.to_owned()), Origin::Bytes)
}

pub fn read_fastq_stdin() -> Result<Vec<FastqRecord>> {
    read_fastq_reader(io::stdin(), Origin::Stdin)
}

/// `None` for an empty file.
fn open_fastq_file(file: &Path) -> Result<Option<Box<dyn FastxReader>>> {
    match parse_fastx_file(file) {
        Ok(reader) => Ok(Some(reader)),
        Err(e) if matches!(e.kind, ParseErrorKind::EmptyFile) => Ok(None),
        Err(e) if matches!(e.kind, ParseErrorKind::Io) => Err(file_io(file, e)),
        Err(e) => Err(Error::ParseRecord {
            origin: Origin::File(file.display().to_string()),
            idx: 1,
            source: Box::new(e),
        }),
    }
}

fn read_fastq_reader(
    reader: impl io::Read + Send + 'static,
    origin: Origin,
) -> Result<Vec<FastqRecord>> {
    match parse_fastx_reader(reader) {
        Ok(reader) => read_records(reader, origin),
        Err(e) if matches!(e.kind, ParseErrorKind::EmptyFile) => Ok(Vec::new()),
        Err(e) => Err(Error::ParseRecord {
            origin,
            idx: 1,
            source: Box::new(e),
        }),
    }
}

fn read_records(mut reader: Box<dyn FastxReader>, origin: Origin) -> Result<Vec<FastqRecord>> {
    let mut res = Vec::new();

    while let Some(record) = next_record(&mut reader, &origin, res.len() + 1)? {
        res.push(record);
    }

    log::debug!("Read {} records from {}", res.len(), origin);
    Ok(res)
}

/// The next record of a reader, where `idx` is its 1-based position.
fn next_record(
    reader: &mut Box<dyn FastxReader>,
    origin: &Origin,
    idx: usize,
) -> Result<Option<FastqRecord>> {
    let Some(record) = reader.next() else {
        return Ok(None);
    };
    let parse_err = |source: BoxError| Error::ParseRecord {
        origin: origin.clone(),
        idx,
        source,
    };

    let record = record.map_err(|e| parse_err(Box::new(e)))?;
    let qual = record
        .qual()
        .ok_or_else(|| parse_err("record has no quality scores".into()))?;

    Ok(Some((
        record.id().to_owned(),
        record.seq().into_owned(),
        qual.to_owned(),
    )))
}

pub fn write_fastq_record(
    writer: &mut (dyn Write + Send),
    record: (&[u8], &[u8], &[u8]),
) -> io::Result<()> {
    writer.write_all(b"@")?;
    writer.write_all(record.0)?;
    writer.write_all(b"\n")?;
    writer.write_all(record.1)?;
    writer.write_all(b"\n+\n")?;
    writer.write_all(record.2)?;
    writer.write_all(b"\n")
}

/// Open an output file, or standard output for `None` or `-`.
///
/// Files ending in `.gz` are gzip compressed.
pub fn open_output(file: Option<&Path>) -> Result<Box<dyn Write + Send>> {
    let Some(file) = file.filter(|f| f.as_os_str() != "-") else {
        return Ok(Box::new(BufWriter::new(io::stdout())));
    };

    let f = File::create(file).map_err(|e| file_io(file, e))?;
    if file.extension().is_some_and(|ext| ext == "gz") {
        Ok(Box::new(BufWriter::new(GzEncoder::new(
            f,
            Compression::default(),
        ))))
    } else {
        Ok(Box::new(BufWriter::new(f)))
    }
}

/// Keep only the read pairs where both reads are at least `min_length` long.
///
/// The two inputs are read in lockstep. Returns the number of pairs read and
/// the number of pairs written.
pub fn filter_paired(
    fwd: impl AsRef<Path>,
    rev: impl AsRef<Path>,
    out_fwd: &mut (dyn Write + Send),
    out_rev: &mut (dyn Write + Send),
    min_length: usize,
) -> Result<(usize, usize)> {
    let (fwd, rev) = (fwd.as_ref(), rev.as_ref());
    let fwd_origin = Origin::File(fwd.display().to_string());
    let rev_origin = Origin::File(rev.display().to_string());
    let mut fwd_reader = open_fastq_file(fwd)?;
    let mut rev_reader = open_fastq_file(rev)?;
    let next = |reader: &mut Option<Box<dyn FastxReader>>, origin, idx| match reader {
        Some(r) => next_record(r, origin, idx),
        None => Ok(None),
    };

    let mut total = 0;
    let mut kept = 0;

    loop {
        let idx = total + 1;
        let pair = (
            next(&mut fwd_reader, &fwd_origin, idx)?,
            next(&mut rev_reader, &rev_origin, idx)?,
        );
        let (f, r) = match pair {
            (Some(f), Some(r)) => (f, r),
            (None, None) => break,
            (Some(_), None) => return Err(Error::UnpairedRead(fwd_origin.to_string())),
            (None, Some(_)) => return Err(Error::UnpairedRead(rev_origin.to_string())),
        };
        total += 1;

        if f.1.len() >= min_length && r.1.len() >= min_length {
            write_fastq_record(out_fwd, (&f.0, &f.1, &f.2))
                .map_err(|e| file_io("forward output", e))?;
            write_fastq_record(out_rev, (&r.0, &r.1, &r.2))
                .map_err(|e| file_io("reverse output", e))?;
            kept += 1;
        }
    }

    log::info!("Kept {} of {} read pairs", kept, total);
    Ok((total, kept))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Read as _;

    #[test]
    fn test_read_fastq_bytes() {
        let records = read_fastq_bytes(b"@r1 desc\nACGT\n+\nFFFF\n@r2\nGG\n+\nII\n").unwrap();
        assert_eq!(
            records,
            vec![
                (b"r1 desc".to_vec(), b"ACGT".to_vec(), b"FFFF".to_vec()),
                (b"r2".to_vec(), b"GG".to_vec(), b"II".to_vec()),
            ]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(read_fastq_bytes(b"").unwrap().is_empty());
    }

    #[test]
    fn test_fasta_input() {
        assert!(matches!(
            read_fastq_bytes(b">r1\nACGT\n"),
            Err(Error::ParseRecord { idx: 1, .. })
        ));
    }

    #[test]
    fn test_write_fastq_record() {
        let mut buf = Vec::new();
        write_fastq_record(&mut buf, (b"r1 x", b"ACGT", b"FFFF")).unwrap();
        assert_eq!(buf, b"@r1 x\nACGT\n+\nFFFF\n");
    }

    #[test]
    fn test_gzip_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("out.fastq.gz");
        {
            let mut out = open_output(Some(file.as_path())).unwrap();
            write_fastq_record(&mut *out, (b"r1", b"ACGT", b"FFFF")).unwrap();
            out.flush().unwrap();
        }

        let mut raw = Vec::new();
        File::open(&file).unwrap().read_to_end(&mut raw).unwrap();
        assert_eq!(&raw[..2], &[0x1f, 0x8b]);

        let records = read_fastq_file(&file).unwrap();
        assert_eq!(records, vec![(b"r1".to_vec(), b"ACGT".to_vec(), b"FFFF".to_vec())]);
    }

    #[test]
    fn test_missing_file() {
        assert!(read_fastq_file("/definitely/not/here.fastq").is_err());
    }

    #[test]
    fn test_filter_paired() {
        let dir = tempfile::tempdir().unwrap();
        let fwd = dir.path().join("R1.fastq");
        let rev = dir.path().join("R2.fastq");
        std::fs::write(&fwd, "@a\nACGTACGT\n+\nFFFFFFFF\n@b\nACG\n+\nFFF\n@c\nACGTA\n+\nFFFFF\n").unwrap();
        std::fs::write(&rev, "@a\nTTTTT\n+\nFFFFF\n@b\nTTTTTT\n+\nFFFFFF\n@c\nTTTT\n+\nFFFF\n").unwrap();

        let mut out_fwd = Vec::new();
        let mut out_rev = Vec::new();
        let res = filter_paired(&fwd, &rev, &mut out_fwd, &mut out_rev, 4).unwrap();

        assert_eq!(res, (3, 2));
        assert_eq!(out_fwd, b"@a\nACGTACGT\n+\nFFFFFFFF\n@c\nACGTA\n+\nFFFFF\n");
        assert_eq!(out_rev, b"@a\nTTTTT\n+\nFFFFF\n@c\nTTTT\n+\nFFFF\n");
    }

    #[test]
    fn test_filter_unpaired() {
        let dir = tempfile::tempdir().unwrap();
        let fwd = dir.path().join("R1.fastq");
        let rev = dir.path().join("R2.fastq");
        std::fs::write(&fwd, "@a\nACGT\n+\nFFFF\n@b\nACGT\n+\nFFFF\n").unwrap();
        std::fs::write(&rev, "@a\nACGT\n+\nFFFF\n").unwrap();

        let res = filter_paired(&fwd, &rev, &mut Vec::<u8>::new(), &mut Vec::<u8>::new(), 1);
        assert!(matches!(res, Err(Error::UnpairedRead(_))));
    }
}
