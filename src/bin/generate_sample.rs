use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

/// Write a synthetic CORD-19 style metadata.csv for trying out the explorer
#[derive(Parser, Debug)]
#[command(about, long_about = None)]
struct Args {
    /// Number of rows to generate
    #[arg(long, default_value_t = 5000)]
    rows: usize,

    /// Output CSV path
    #[arg(long, default_value = "metadata.csv")]
    out: PathBuf,

    /// PRNG seed
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// One output row, in the column order of the real metadata file.
#[derive(Serialize)]
struct MetadataRow {
    cord_uid: String,
    title: String,
    journal: String,
    publish_time: String,
    source_x: &'static str,
}

const JOURNALS: &[&str] = &[
    "PLoS One",
    "bioRxiv",
    "BMJ",
    "The Lancet",
    "Nature",
    "Journal of Virology",
    "Viruses",
    "Sci Rep",
    "Emerging Infectious Diseases",
    "Virology",
    "Journal of Medical Virology",
    "Clinical Infectious Diseases",
];

const SOURCES: &[&str] = &["PMC", "Medline", "WHO", "biorxiv", "medrxiv"];

const SUBJECTS: &[&str] = &[
    "COVID-19", "SARS-CoV-2", "coronavirus", "influenza", "MERS", "viral pneumonia",
];

const TOPICS: &[&str] = &[
    "transmission", "vaccine", "mortality", "outcomes", "antibody response", "lung injury",
    "children", "health workers", "lockdown", "treatment", "diagnosis", "public health",
];

const PATTERNS: &[&str] = &[
    "{topic} in patients with {subject}",
    "The impact of {subject} on {topic}",
    "{subject} and {topic}: a systematic review",
    "Modelling {topic} of {subject}",
    "Early {topic} during the {subject} pandemic",
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_f64() * n as f64) as usize % n.max(1)
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len())]
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

fn make_title(rng: &mut SimpleRng) -> String {
    let pattern = rng.pick(PATTERNS);
    let subject = rng.pick(SUBJECTS);
    let topic = rng.pick(TOPICS);
    let title = pattern
        .replace("{subject}", subject)
        .replace("{topic}", topic);
    let mut chars = title.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => title,
    }
}

fn make_publish_time(rng: &mut SimpleRng) -> String {
    // Skewed towards recent years like the real corpus.
    let year = 2021 - (rng.next_f64().powi(3) * 20.0) as i32;
    let month = 1 + rng.below(12);
    let day = 1 + rng.below(28);
    match rng.below(20) {
        0 => String::new(),
        1 => "unknown".to_string(),
        2 | 3 => year.to_string(),
        _ => format!("{year}-{month:02}-{day:02}"),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut rng = SimpleRng::new(args.seed);

    let mut writer = csv::Writer::from_path(&args.out)
        .with_context(|| format!("creating {}", args.out.display()))?;

    let mut missing_titles = 0usize;
    for i in 0..args.rows {
        let title = if rng.chance(0.02) {
            missing_titles += 1;
            String::new()
        } else {
            make_title(&mut rng)
        };
        let journal = if rng.chance(0.1) {
            String::new()
        } else {
            rng.pick(JOURNALS).to_string()
        };
        let row = MetadataRow {
            cord_uid: format!("{i:08x}"),
            title,
            journal,
            publish_time: make_publish_time(&mut rng),
            source_x: rng.pick(SOURCES),
        };
        writer.serialize(&row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;

    println!(
        "Wrote {} papers ({} without a title) to {}",
        args.rows,
        missing_titles,
        args.out.display()
    );
    Ok(())
}
