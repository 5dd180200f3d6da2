use primertrim::*;

const PRIMER: &str = "GCATCGATGAAGAACGCAGC";

const FASTQ: &str = "\
@complete sample=1
ACTGACTGACTGGCATCGATGAAGAACGCAGCTTTT
+
IIIIIIIIIIIIIIIIIIIIIIIIIIIIIIIIIIII
@mismatch sample=1
ACTGACTGGCATCGATGTAGAACGCAGC
+
IIIIIIIIIIIIIIIIIIIIIIIIIIII
@revcomp sample=2
TTTTGCTGCGTTCTTCATCGATGC
+
IIIIIIIIIIIIIIIIIIIIIIII
@partial sample=2
ACTGACTGACTGGCATCGATGA
+
IIIIIIIIIIIIIIIIIIIIII
@only_primer sample=3
GCATCGATGAAGAACGCAGCAA
+
IIIIIIIIIIIIIIIIIIIIII
@clean sample=3
ACTGACTGACTGACTGACTG
+
IIIIIIIIIIIIIIIIIIII
";

fn run(opts: &TrimOptions) -> TrimmableReads {
    let mut reads = TrimmableReads::from_fastq(read_fastq_bytes(FASTQ.as_bytes()).unwrap()).unwrap();
    Pipeline::from_options(opts).unwrap().run(&mut reads).unwrap();
    reads
}

fn fastq_output(reads: &TrimmableReads, min_length: usize) -> String {
    let mut buf = Vec::new();
    for record in reads.trimmed_reads(min_length) {
        write_fastq_record(&mut buf, record).unwrap();
    }
    String::from_utf8(buf).unwrap()
}

#[test]
fn test_trim_fastq() {
    let opts = TrimOptions::new([PRIMER]);
    let reads = run(&opts);

    assert_eq!(
        fastq_output(&reads, opts.min_length),
        "\
@complete sample=1
ACTGACTGACTG
+
IIIIIIIIIIII
@mismatch sample=1
ACTGACTG
+
IIIIIIII
@revcomp sample=2
TTTT
+
IIII
@partial sample=2
ACTGACTGACTG
+
IIIIIIIIIIII
@clean sample=3
ACTGACTGACTGACTGACTG
+
IIIIIIIIIIIIIIIIIIII
"
    );

    let summary = RunSummary::new(&reads, opts.min_length);
    assert_eq!(summary.complete, 4);
    assert_eq!(summary.partial, 1);
    assert_eq!(summary.unmatched, 1);
    assert_eq!(summary.written, 5);
}

#[test]
fn test_log() {
    let reads = run(&TrimOptions::new([PRIMER]));

    let mut buf = Vec::new();
    write_log(&mut buf, reads.log_rows()).unwrap();
    let log = String::from_utf8(buf).unwrap();
    let lines: Vec<&str> = log.lines().collect();

    assert_eq!(lines.len(), 7);
    assert_eq!(lines[0], LOG_COLUMNS.join("\t"));
    assert_eq!(lines[1], format!("complete\tComplete\t12\t0\t{PRIMER}"));
    assert_eq!(lines[2], "mismatch\tComplete\t8\t1\tGCATCGATGTAGAACGCAGC");
    assert_eq!(lines[3], "revcomp\tComplete\t4\t0\tGCTGCGTTCTTCATCGATGC");
    assert_eq!(lines[4], "partial\tPartial\t12\t0\tGCATCGATGA");
    assert_eq!(lines[5], format!("only_primer\tComplete\t0\t0\t{PRIMER}"));
    assert_eq!(lines[6], "clean\tNo match\t20\t\t");
}

#[test]
fn test_options_change_outcome() {
    let mut opts = TrimOptions::new([PRIMER]);
    opts.revcomp = false;
    opts.mismatches = 0;
    opts.min_partial = 12;
    opts.min_length = 0;
    let reads = run(&opts);

    let method = |id| reads.get(id).unwrap().1.map(|m| m.method);
    assert_eq!(method("complete"), Some(Complete));
    assert_eq!(method("mismatch"), None);
    assert_eq!(method("revcomp"), None);
    // the 10 bp overhang is below the partial minimum
    assert_eq!(method("partial"), None);
    assert_eq!(method("only_primer"), Some(Complete));

    // an empty trimmed read is still written without a length filter
    assert_eq!(reads.trimmed_reads(0).count(), 6);
}

#[test]
fn test_options_from_yaml() {
    let opts = TrimOptions::from_yaml(format!("primers: [{PRIMER}]\nmismatches: 0\n")).unwrap();
    let reads = run(&opts);
    assert!(reads.get("mismatch").unwrap().1.is_none());
    assert_eq!(reads.num_matched(), 4);
}

#[test]
fn test_read_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("reads.fastq");
    std::fs::write(&file, FASTQ).unwrap();

    let records = read_fastq_file(&file).unwrap();
    assert_eq!(records.len(), 6);
    assert_eq!(records[0].0, b"complete sample=1");

    let reads = TrimmableReads::from_fastq(records).unwrap();
    assert_eq!(reads.get("complete").unwrap().0.desc(), b"complete sample=1");
}

#[test]
fn test_invalid_read() {
    let records = read_fastq_bytes(b"@r1\nACGTXX\n+\nIIIIII\n").unwrap();
    assert!(matches!(
        TrimmableReads::from_fastq(records),
        Err(errors::Error::InvalidBase { base: b'X', .. })
    ));
}
