use clap::Parser;
use scalematch::io::{read_descriptors_file, read_matrix_file, write_matches_file, write_matrix_file};
use scalematch::{CrossScaleMatcher, MaskRegion, MatchConfig, MaxCondition, Strategy};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "ScaleMatch CLI (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output for performance profiling.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct Config {
    descriptors1: String,
    descriptors2: String,
    detection_scales1: Option<String>,
    detection_scales2: Option<String>,
    n_levels: usize,
    strategy: i64,
    half_width: usize,
    mask_region: i32,
    max_condition: u8,
    south_east_refine: bool,
    parallel: bool,
    output_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        let cfg = MatchConfig::default();
        Self {
            descriptors1: String::new(),
            descriptors2: String::new(),
            detection_scales1: None,
            detection_scales2: None,
            n_levels: cfg.n_levels,
            strategy: cfg.strategy.index() as i64,
            half_width: cfg.half_width,
            mask_region: cfg.mask_region.selector(),
            max_condition: 0,
            south_east_refine: cfg.south_east_refine,
            parallel: cfg.parallel,
            output_dir: ".".to_string(),
        }
    }
}

impl Config {
    fn match_config(&self) -> Result<MatchConfig, Box<dyn std::error::Error>> {
        let max_condition = MaxCondition::from_level(self.max_condition)
            .ok_or("max_condition must be 0, 1 or 2")?;
        Ok(MatchConfig {
            n_levels: self.n_levels,
            strategy: Strategy::from_index(self.strategy)?,
            half_width: self.half_width,
            mask_region: MaskRegion::from_selector(self.mask_region),
            max_condition,
            south_east_refine: self.south_east_refine,
            parallel: self.parallel,
        })
    }
}

/// Reads a detection-scale file (any row/column layout) as a flat list.
fn load_scales(path: Option<&str>) -> Result<Vec<usize>, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            let matrix = read_matrix_file::<_, usize>(path)?;
            Ok(matrix.as_slice().to_vec())
        }
        None => Ok(Vec::new()),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("scalematch=info".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.descriptors1.is_empty() || config.descriptors2.is_empty() {
        return Err("descriptors1 and descriptors2 must be set in the config".into());
    }
    let match_cfg = config.match_config()?;
    let matcher = CrossScaleMatcher::new(match_cfg)?;

    let d1 = read_descriptors_file(&config.descriptors1, config.n_levels)?;
    let d2 = read_descriptors_file(&config.descriptors2, config.n_levels)?;
    let s1 = load_scales(config.detection_scales1.as_deref())?;
    let s2 = load_scales(config.detection_scales2.as_deref())?;
    tracing::info!(
        keypoints1 = d1.descriptors.num_keypoints(),
        keypoints2 = d2.descriptors.num_keypoints(),
        strategy = matcher.config().strategy.name(),
        "loaded descriptors"
    );

    let output = matcher.match_sets(&d1.descriptors, &s1, &d2.descriptors, &s2)?;

    let out_dir = Path::new(&config.output_dir);
    fs::create_dir_all(out_dir)?;
    write_matrix_file(out_dir.join("scaledHamming.txt"), &output.scores.scores)?;
    write_matrix_file(out_dir.join("scales1.txt"), &output.scores.scales1)?;
    write_matrix_file(out_dir.join("scales2.txt"), &output.scores.scales2)?;
    write_matches_file(out_dir.join("matches.txt"), &output.matches)?;

    println!(
        "{} matches written to {}",
        output.matches.len(),
        out_dir.display()
    );
    Ok(())
}
