use crate::collision::{Collision, CollisionStrategy};
use crate::config::{load_config, Config};
use crate::dump::{write_placement_dump, PassResult, PlacementDump};
use crate::render::{render_svg, write_output_svg, Frame};
use crate::scene::Scene;
use crate::surface::{ApproxMetrics, TextMeasure};
use crate::text_metrics::FontMetrics;
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "mlc", version, about = "Map label collision resolver")]
pub struct Args {
    /// Feature file (JSON/JSON5) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout for SVG and JSON if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON file
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Canvas width
    #[arg(short = 'w', long = "width")]
    pub width: Option<f64>,

    /// Canvas height
    #[arg(short = 'H', long = "height")]
    pub height: Option<f64>,

    /// Collision strategy: null, simple or cover
    #[arg(long = "strategy")]
    pub strategy: Option<String>,

    /// Feature property holding the label text
    #[arg(long = "field")]
    pub field: Option<String>,

    /// Use calibrated character widths instead of system fonts
    #[arg(long = "fast-metrics")]
    pub fast_metrics: bool,

    /// Outline accepted label bounds in the SVG
    #[arg(long = "show-bounds")]
    pub show_bounds: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
    Json,
}

pub fn run() -> Result<()> {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();

    let args = Args::parse();
    let mut config = load_config(args.config.as_deref())?;
    apply_args(&mut config, &args)?;

    let input = args.input.clone().unwrap_or_else(|| PathBuf::from("-"));
    let scene = Scene::load(&input)?;
    log::info!(
        "loaded {} features from {}",
        scene.features.len(),
        input.display()
    );

    let metrics: &dyn TextMeasure = if config.render.fast_text_metrics {
        &ApproxMetrics
    } else {
        if !FontMetrics.preload(&config.label.symbol.style) {
            log::warn!(
                "no installed font matches `{}`, using approximate metrics",
                config.label.symbol.style.font_family
            );
        }
        &FontMetrics
    };
    let projection = config.projection.build();
    let field = config.label.field();
    let symbol = &config.label.symbol;

    let mut features = scene.features.clone();
    let accepted = config.collision.test(
        &mut features,
        Some(&field),
        Some(symbol),
        metrics,
        projection.as_ref(),
    );
    log::info!(
        "{} collision kept {} of {} labels",
        config.collision.name(),
        accepted.len(),
        scene.features.len()
    );

    match args.output_format {
        OutputFormat::Json => {
            let result = PassResult {
                strategy: config.collision.name(),
                features: &scene.features,
                accepted: &accepted,
                field: &field,
                symbol,
            };
            let dump = PlacementDump::from_result(
                &result,
                metrics,
                projection.as_ref(),
                config.render.width,
                config.render.height,
            );
            write_placement_dump(&dump, args.output.as_deref())?;
        }
        OutputFormat::Svg | OutputFormat::Png => {
            let frame = Frame {
                features: &scene.features,
                accepted: &accepted,
                field: &field,
                symbol,
                projection: projection.as_ref(),
            };
            let svg = render_svg(&frame, metrics, &config.theme, &config.render);
            if args.output_format == OutputFormat::Svg {
                write_output_svg(&svg, args.output.as_deref())?;
            } else {
                let output = ensure_output(args.output.as_deref(), "png")?;
                write_png(&svg, &output, &config)?;
            }
        }
    }

    Ok(())
}

/// Folds command-line overrides into a loaded config.
fn apply_args(config: &mut Config, args: &Args) -> Result<()> {
    if let Some(width) = args.width {
        config.render.width = width;
    }
    if let Some(height) = args.height {
        config.render.height = height;
    }
    config
        .projection
        .fit_canvas(config.render.width, config.render.height);

    if let Some(name) = args.strategy.as_deref() {
        config.collision = Collision::from_name(name)
            .ok_or_else(|| anyhow::anyhow!("unknown collision strategy `{name}`"))?;
    }
    if let Some(field) = &args.field {
        config.label.field = field.clone();
    }
    if args.fast_metrics {
        config.render.fast_text_metrics = true;
    }
    if args.show_bounds {
        config.render.show_bounds = true;
    }
    Ok(())
}

#[cfg(feature = "png")]
fn write_png(svg: &str, output: &Path, config: &Config) -> Result<()> {
    crate::render::write_output_png(svg, output, &config.render)
}

#[cfg(not(feature = "png"))]
fn write_png(_svg: &str, _output: &Path, _config: &Config) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

fn ensure_output(output: Option<&Path>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.to_path_buf());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProjectionConfig;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("mlc").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn overrides_apply_to_config() {
        let args = parse(&[
            "-w",
            "640",
            "-H",
            "480",
            "--strategy",
            "simple",
            "--field",
            "label",
            "--fast-metrics",
        ]);
        let mut config = Config::default();
        apply_args(&mut config, &args).unwrap();
        assert_eq!(config.render.width, 640.0);
        assert_eq!(config.render.height, 480.0);
        assert!(matches!(config.collision, Collision::Simple(_)));
        assert_eq!(config.label.field, "label");
        assert!(config.render.fast_text_metrics);
        match config.projection {
            ProjectionConfig::WebMercator(mercator) => {
                assert_eq!(mercator.width, 640.0);
                assert_eq!(mercator.height, 480.0);
            }
            other => panic!("unexpected projection {other:?}"),
        }
    }

    #[test]
    fn unknown_strategy_is_an_error() {
        let args = parse(&["--strategy", "quadtree"]);
        let mut config = Config::default();
        assert!(apply_args(&mut config, &args).is_err());
    }

    #[test]
    fn output_format_parses() {
        assert_eq!(parse(&["-e", "json"]).output_format, OutputFormat::Json);
        assert_eq!(parse(&[]).output_format, OutputFormat::Svg);
    }

    #[test]
    fn png_requires_output_path() {
        assert!(ensure_output(None, "png").is_err());
        assert_eq!(
            ensure_output(Some(Path::new("out.png")), "png").unwrap(),
            PathBuf::from("out.png")
        );
    }
}
