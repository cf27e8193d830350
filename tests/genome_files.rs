use genevo::data::connectors::genome_files::read_params_ini;
use genevo::data::connectors::{load_genome, load_target_expression};
use genevo::data::{FileSnapshotWriter, GenomeFileSet};
use genevo::engines::evaluation::SnapshotWriter;
use genevo::error::GenevoError;
use genevo::types::{GenomeLayout, Orientation};
use std::fs;
use tempfile::tempdir;

fn sample_layout() -> GenomeLayout {
    GenomeLayout::new(30000, vec![1201, 5800, 12000], vec![2400, 4600, 13500], vec![3500, 9000, 20000]).unwrap()
}

#[test]
fn test_layout_round_trip_through_files() {
    let dir = tempdir().unwrap();
    let files = GenomeFileSet::in_folder(dir.path().join("nextGen"), "nextGen");
    let layout = sample_layout();

    files.write_layout(&layout).unwrap();
    for path in files.paths() {
        assert!(path.exists(), "{} missing", path.display());
    }
    assert_eq!(files.read_layout().unwrap(), layout);
}

#[test]
fn test_written_files_carry_orientation() {
    let dir = tempdir().unwrap();
    let files = GenomeFileSet::in_folder(dir.path(), "last");
    let layout = sample_layout();
    assert_eq!(layout.orientation(1), Orientation::Reverse);

    files.write_layout(&layout).unwrap();

    let gff = fs::read_to_string(&files.gff).unwrap();
    assert!(gff.contains("##sequence-region last 1 30000"));
    assert!(gff.contains("last\tRefSeq\tgene\t5800\t4600\t.\t-\t.\tID=g1;Name=g2"));

    let tss = fs::read_to_string(&files.tss).unwrap();
    let lines: Vec<&str> = tss.lines().collect();
    assert_eq!(lines[0], "TUindex\tTUorient\tTSS_pos\tTSS_strength");
    assert_eq!(lines[1], "0\t+\t1201\t.2");
    assert_eq!(lines[2], "1\t-\t5800\t.2");

    let tts = fs::read_to_string(&files.tts).unwrap();
    assert!(tts.lines().any(|l| l == "2\t+\t13500\t1."));

    let barriers = fs::read_to_string(&files.barriers).unwrap();
    assert_eq!(barriers, "prot_name\tprot_pos\nhns\t3500\nhns\t9000\nhns\t20000\n");
}

#[test]
fn test_load_genome_from_parameter_file() {
    let dir = tempdir().unwrap();
    let files = GenomeFileSet::in_folder(dir.path().join("tousgenesidentiques"), "tousgenesidentiques");
    files.write_layout(&sample_layout()).unwrap();

    let ini = dir.path().join("params.ini");
    fs::write(
        &ini,
        "[INPUTS]\n\
         GFF = tousgenesidentiques/tousgenesidentiques.gff\n\
         TSS = tousgenesidentiques/tousgenesidentiquesTSS.dat\n\
         TTS = tousgenesidentiques/tousgenesidentiquesTTS.dat\n\
         BARR_FIX = tousgenesidentiques/tousgenesidentiquesProt.dat\n\
         \n\
         [SIMULATION]\n",
    )
    .unwrap();

    assert_eq!(read_params_ini(&ini, dir.path()).unwrap(), files);
    assert_eq!(load_genome(&ini, dir.path()).unwrap(), sample_layout());
}

#[test]
fn test_short_parameter_file_is_rejected() {
    let dir = tempdir().unwrap();
    let ini = dir.path().join("params.ini");
    fs::write(&ini, "[INPUTS]\nGFF = genome.gff\n").unwrap();

    assert!(matches!(read_params_ini(&ini, dir.path()), Err(GenevoError::InputFile(_))));
}

#[test]
fn test_missing_genome_file_is_input_error() {
    let dir = tempdir().unwrap();
    let files = GenomeFileSet::in_folder(dir.path(), "absent");
    assert!(matches!(files.read_layout(), Err(GenevoError::InputFile(_))));
}

#[test]
fn test_origin_crossing_gene_in_files_is_rejected() {
    let dir = tempdir().unwrap();
    let files = GenomeFileSet::in_folder(dir.path(), "crossing");
    let crossing = GenomeLayout {
        genome_size: 1000,
        gene_starts: vec![950],
        gene_ends: vec![40],
        barriers: vec![500],
    };
    files.write_layout(&crossing).unwrap();

    match files.read_layout() {
        Err(GenevoError::InputFile(msg)) => assert!(msg.contains("crosses the origin"), "{}", msg),
        other => panic!("expected an input file error, got {:?}", other),
    }
}

#[test]
fn test_snapshot_writer_keeps_last_accepted() {
    let dir = tempdir().unwrap();
    let files = GenomeFileSet::in_folder(dir.path(), "last");
    let mut writer = FileSnapshotWriter::new(files.clone());

    let first = sample_layout();
    let second = GenomeLayout::new(30060, vec![1201, 5860, 12060], vec![2400, 4660, 13560], vec![3560, 9060, 20060])
        .unwrap();
    writer.persist(&first).unwrap();
    writer.persist(&second).unwrap();

    assert_eq!(files.read_layout().unwrap(), second);
}

#[test]
fn test_environment_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("environment.dat");
    fs::write(&path, "1\t0.3\n2\t0.3\n3\t0.4\n").unwrap();

    assert_eq!(load_target_expression(&path).unwrap(), vec![0.3, 0.3, 0.4]);
    assert!(matches!(
        load_target_expression(dir.path().join("missing.dat")),
        Err(GenevoError::InputFile(_))
    ));
}
