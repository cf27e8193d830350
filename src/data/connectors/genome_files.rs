use crate::engines::evaluation::simulator::SnapshotWriter;
use crate::error::{GenevoError, Result};
use crate::types::{GenomeLayout, Position};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static SEQUENCE_REGION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"##sequence-region .* 1 ([0-9]+)").expect("sequence region pattern"));

/// The four files describing a genome to the transcription simulator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenomeFileSet {
    /// Gene annotation, also carries the genome size
    pub gff: PathBuf,
    /// Transcription start sites
    pub tss: PathBuf,
    /// Transcription termination sites
    pub tts: PathBuf,
    /// Topological barriers
    pub barriers: PathBuf,
}

impl GenomeFileSet {
    /// `<stem>.gff`, `<stem>TSS.dat`, `<stem>TTS.dat` and `<stem>Prot.dat` under `folder`.
    pub fn in_folder<P: AsRef<Path>>(folder: P, stem: &str) -> Self {
        let folder = folder.as_ref();
        Self {
            gff: folder.join(format!("{}.gff", stem)),
            tss: folder.join(format!("{}TSS.dat", stem)),
            tts: folder.join(format!("{}TTS.dat", stem)),
            barriers: folder.join(format!("{}Prot.dat", stem)),
        }
    }

    pub fn paths(&self) -> [&PathBuf; 4] {
        [&self.gff, &self.tss, &self.tts, &self.barriers]
    }

    pub fn read_layout(&self) -> Result<GenomeLayout> {
        let genome_size = parse_genome_size(&read_input(&self.gff)?)?;
        let starts = parse_column(&read_input(&self.tss)?, 2, &self.tss)?;
        let ends = parse_column(&read_input(&self.tts)?, 2, &self.tts)?;
        let barriers = parse_column(&read_input(&self.barriers)?, 1, &self.barriers)?;

        GenomeLayout::new(genome_size, starts, ends, barriers)
            .map_err(|e| GenevoError::InputFile(format!("{}: {}", self.gff.display(), e)))
    }

    pub fn write_layout(&self, layout: &GenomeLayout) -> Result<()> {
        for path in self.paths() {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
        }

        let sequence_name = self
            .gff
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "genome".to_string());

        let mut gff = BufWriter::new(File::create(&self.gff)?);
        let mut tss = BufWriter::new(File::create(&self.tss)?);
        let mut tts = BufWriter::new(File::create(&self.tts)?);
        let mut barriers = BufWriter::new(File::create(&self.barriers)?);

        writeln!(gff, "##gff-version 3\n#!gff-spec-version 1.20\n#!processor NCBI annotwriter")?;
        writeln!(gff, "##sequence-region {} 1 {}", sequence_name, layout.genome_size)?;
        writeln!(
            gff,
            "{name}\tRefSeq\tregion\t1\t{size}\t.\t+\t.\tID=id0;Name={name}",
            name = sequence_name,
            size = layout.genome_size
        )?;
        writeln!(tss, "TUindex\tTUorient\tTSS_pos\tTSS_strength")?;
        writeln!(tts, "TUindex\tTUorient\tTTS_pos\tTTS_proba_off")?;
        writeln!(barriers, "prot_name\tprot_pos")?;

        for (k, (&start, &end)) in layout.gene_starts.iter().zip(&layout.gene_ends).enumerate() {
            let orient = layout.orientation(k).symbol();
            writeln!(
                gff,
                "{}\tRefSeq\tgene\t{}\t{}\t.\t{}\t.\tID=g1;Name=g{}",
                sequence_name,
                start,
                end,
                orient,
                k + 1
            )?;
            writeln!(tss, "{}\t{}\t{}\t.2", k, orient, start)?;
            writeln!(tts, "{}\t{}\t{}\t1.", k, orient, end)?;
        }
        for barrier in &layout.barriers {
            writeln!(barriers, "hns\t{}", barrier)?;
        }

        for writer in [&mut gff, &mut tss, &mut tts, &mut barriers] {
            writer.flush()?;
        }
        Ok(())
    }
}

/// Keeps the last accepted genome on disk
#[derive(Debug, Clone)]
pub struct FileSnapshotWriter {
    files: GenomeFileSet,
}

impl FileSnapshotWriter {
    pub fn new(files: GenomeFileSet) -> Self {
        Self { files }
    }
}

impl SnapshotWriter for FileSnapshotWriter {
    fn persist(&mut self, layout: &GenomeLayout) -> Result<()> {
        self.files.write_layout(layout)
    }
}

/// Path value of a `key = path` line of a parameter file.
pub fn parse_ini_path(line: &str) -> Result<&str> {
    line.split_once('=')
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| GenevoError::InputFile(format!("expected `key = path`, got {:?}", line)))
}

/// Genome files listed on lines 2 to 5 of a simulator parameter file
/// (GFF, TSS, TTS, barriers), resolved against `folder`.
pub fn read_params_ini<P: AsRef<Path>, Q: AsRef<Path>>(ini: P, folder: Q) -> Result<GenomeFileSet> {
    let ini = ini.as_ref();
    let content = read_input(ini)?;
    let lines: Vec<&str> = content.lines().collect();
    if lines.len() < 5 {
        return Err(GenevoError::InputFile(format!(
            "{}: expected at least 5 lines, found {}",
            ini.display(),
            lines.len()
        )));
    }

    let folder = folder.as_ref();
    Ok(GenomeFileSet {
        gff: folder.join(parse_ini_path(lines[1])?),
        tss: folder.join(parse_ini_path(lines[2])?),
        tts: folder.join(parse_ini_path(lines[3])?),
        barriers: folder.join(parse_ini_path(lines[4])?),
    })
}

/// Read the genome described by a simulator parameter file.
pub fn load_genome<P: AsRef<Path>, Q: AsRef<Path>>(ini: P, folder: Q) -> Result<GenomeLayout> {
    let files = read_params_ini(ini, folder)?;
    let layout = files.read_layout()?;
    log::info!(
        "Loaded genome of {} bp with {} genes and {} barriers from {}",
        layout.genome_size,
        layout.gene_count(),
        layout.barriers.len(),
        files.gff.display()
    );
    Ok(layout)
}

fn read_input(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| GenevoError::InputFile(format!("{}: {}", path.display(), e)))
}

fn parse_genome_size(gff: &str) -> Result<Position> {
    SEQUENCE_REGION
        .captures(gff)
        .and_then(|caps| caps[1].parse().ok())
        .ok_or_else(|| GenevoError::InputFile("no `##sequence-region` line with a genome size".to_string()))
}

/// Integer values of a tab separated column, header line skipped.
fn parse_column(content: &str, column: usize, path: &Path) -> Result<Vec<Position>> {
    content
        .lines()
        .skip(1)
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            line.split('\t')
                .nth(column)
                .and_then(|field| field.trim().parse().ok())
                .ok_or_else(|| {
                    GenevoError::InputFile(format!(
                        "{} line {}: no integer in column {}",
                        path.display(),
                        i + 2,
                        column + 1
                    ))
                })
        })
        .collect()
}
