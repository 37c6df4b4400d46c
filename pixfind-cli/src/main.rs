use clap::Parser;
use pixfind::{
    FileTemplates, MatchConfig, Matcher, PixFindResult, PixelImage, Rect, TemplateSource,
    VariantMatch,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "pixfind CLI (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize)]
struct RegionConfig {
    x: i32,
    y: i32,
    width: u32,
    height: u32,
}

impl From<RegionConfig> for Rect {
    fn from(value: RegionConfig) -> Self {
        Rect::new(value.x, value.y, value.width, value.height)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum SourceConfig {
    File(String),
    Region(RegionConfig),
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct Config {
    base_path: PathBuf,
    source: Option<SourceConfig>,
    template: String,
    probe_variants: bool,
    grayscale: bool,
    max_miss_percent: usize,
    save_source: Option<String>,
    output_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_path: PathBuf::new(),
            source: None,
            template: String::new(),
            probe_variants: true,
            grayscale: false,
            max_miss_percent: MatchConfig::default().max_miss_percent,
            save_source: None,
            output_path: None,
        }
    }
}

#[derive(Debug, Serialize)]
struct Output {
    found: bool,
    variant: Option<String>,
    index: Option<usize>,
    x: Option<usize>,
    y: Option<usize>,
    source_identity: String,
}

impl Output {
    fn new(found: Option<VariantMatch>, source: &PixelImage) -> Self {
        let source_identity = source.identity().to_owned();
        match found {
            Some(m) => Self {
                found: true,
                variant: Some(m.name),
                index: Some(m.position.index),
                x: Some(m.position.x),
                y: Some(m.position.y),
                source_identity,
            },
            None => Self {
                found: false,
                variant: None,
                index: None,
                x: None,
                y: None,
                source_identity,
            },
        }
    }
}

/// Converts every loaded template to gray so it compares against a gray source.
struct GrayTemplates<T>(T);

impl<T: TemplateSource> TemplateSource for GrayTemplates<T> {
    fn load(&self, name: &str) -> PixFindResult<PixelImage> {
        Ok(self.0.load(name)?.into_gray())
    }
}

#[cfg(feature = "capture")]
fn capture_source(img: &mut PixelImage, region: RegionConfig) -> PixFindResult<()> {
    img.build_from_region(region.into())?;
    Ok(())
}

#[cfg(not(feature = "capture"))]
fn capture_source(_img: &mut PixelImage, _region: RegionConfig) -> PixFindResult<()> {
    Err(pixfind::PixFindError::Capture {
        reason: "built without the `capture` feature".to_owned(),
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("pixfind=debug".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.template.is_empty() {
        return Err("template must be set in the config".into());
    }
    if config.max_miss_percent == 0 {
        return Err("max_miss_percent must be at least 1".into());
    }
    let Some(source_cfg) = config.source else {
        return Err("source must be set in the config".into());
    };

    let mut source = PixelImage::new(config.base_path.clone());
    match source_cfg {
        SourceConfig::File(name) => {
            source.build_from_file(&name)?;
        }
        SourceConfig::Region(region) => capture_source(&mut source, region)?,
    }
    if config.grayscale {
        source.to_gray();
    }
    if let Some(name) = &config.save_source {
        source.save(name)?;
    }

    let matcher = Matcher::new().with_config(MatchConfig {
        max_miss_percent: config.max_miss_percent,
    });
    let files = FileTemplates::new(config.base_path.clone());
    let found = match (config.probe_variants, config.grayscale) {
        (true, false) => matcher.find_by_name(&source, &files, &config.template)?,
        (true, true) => {
            matcher.find_by_name(&source, &GrayTemplates(files), &config.template)?
        }
        (false, grayscale) => {
            let mut template = PixelImage::open(config.base_path.clone(), &config.template)?;
            if grayscale {
                template.to_gray();
            }
            matcher
                .find(&source, &template)
                .map(|position| VariantMatch {
                    name: config.template.clone(),
                    position,
                })
        }
    };

    let output = Output::new(found, &source);
    let json = serde_json::to_string_pretty(&output)?;

    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
