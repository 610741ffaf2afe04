// ============================================================================
// Livery CLI: headless rendering of a painted analysis
// ============================================================================
//
// Usage examples:
//   livery --analysis car.json --paint yolo_0=#ff0000 --out painted.png
//   livery -a car.json --photo car.png --paint yolo_0=#f00 --paint 7=#00ff00 \
//          --opacity 0.9 --blend film --out painted.png
//
// Paints go through gallery activation, so detected parts can be painted
// regardless of the lock preference.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use livery::{BlendStyle, EditorConfig, EditorSession, EngineError, LogLevel, PaintColor};

/// Livery headless renderer.
#[derive(Parser, Debug)]
#[command(
    name = "livery",
    about = "Composite paint onto an analyzed car photo",
    long_about = "Load a segmentation analysis (JSON), paint parts by id and write the\n\
                  composited image as PNG.\n\n\
                  Example:\n  \
                  livery --analysis car.json --paint yolo_0=#ff0000 --out painted.png"
)]
pub struct CliArgs {
    /// Analysis response saved from the segmentation service.
    #[arg(short, long, value_name = "FILE.json")]
    pub analysis: PathBuf,

    /// Photo to paint over. Defaults to the photo embedded in the analysis.
    #[arg(short, long, value_name = "IMAGE")]
    pub photo: Option<PathBuf>,

    /// Part paint as ID=#RRGGBB. Repeat for several parts.
    #[arg(long = "paint", value_name = "ID=#HEX", value_parser = parse_paint)]
    pub paints: Vec<(String, PaintColor)>,

    /// Global paint opacity (0.0-1.0). Defaults to the configured value.
    #[arg(long)]
    pub opacity: Option<f32>,

    /// Blend style: film or matte. Defaults to the configured value.
    #[arg(long, value_parser = parse_blend)]
    pub blend: Option<BlendStyle>,

    /// Output PNG path.
    #[arg(short, long, value_name = "FILE.png")]
    pub out: PathBuf,

    /// Config file. Defaults to the user config directory.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log verbosity, overriding the config. RUST_LOG still takes precedence.
    #[arg(long, value_parser = parse_log_level)]
    pub log_level: Option<LogLevel>,
}

fn parse_paint(value: &str) -> Result<(String, PaintColor), String> {
    let (id, color) = value
        .split_once('=')
        .ok_or_else(|| format!("expected ID=#HEX, got '{}'", value))?;
    if id.is_empty() {
        return Err("part id is empty".to_string());
    }
    let color = PaintColor::from_hex(color).map_err(|e| e.to_string())?;
    Ok((id.to_string(), color))
}

fn parse_blend(value: &str) -> Result<BlendStyle, String> {
    serde_json::from_value(serde_json::Value::String(value.to_lowercase()))
        .map_err(|_| format!("unknown blend style '{}', expected film or matte", value))
}

fn parse_log_level(value: &str) -> Result<LogLevel, String> {
    serde_json::from_value(serde_json::Value::String(value.to_lowercase()))
        .map_err(|_| format!("unknown log level '{}'", value))
}

// ============================================================================
// Entry point
// ============================================================================

/// Render and return an OS exit code.
pub fn run(args: CliArgs) -> ExitCode {
    let config = match &args.config {
        Some(path) => EditorConfig::load_from(path),
        None => EditorConfig::load_from_default_path(),
    }
    .unwrap_or_default();

    let level = args.log_level.unwrap_or(config.preferences.log_level);
    env_logger::Builder::new()
        .filter_level(level.to_level_filter())
        .parse_default_env()
        .init();

    match render(&args, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn render(args: &CliArgs, config: &EditorConfig) -> Result<(), EngineError> {
    let body = std::fs::read_to_string(&args.analysis)?;
    let mut analysis = livery::segmentation::parse_analyze_response(&body)?;

    let photo = match &args.photo {
        Some(path) => {
            analysis.original = None;
            Some(image::open(path)?.to_rgba8())
        }
        None => None,
    };

    let mut session = EditorSession::from_analysis(analysis, config)?;
    if let Some(photo) = &photo {
        session.set_photo(photo)?;
    }
    if let Some(opacity) = args.opacity {
        session.set_opacity(opacity);
    }
    if let Some(blend) = args.blend {
        session.set_blend_style(blend);
    }

    for (id, color) in &args.paints {
        session.set_color(*color);
        session.activate_part(id)?;
    }

    session.render()?.save(&args.out)?;
    log::info!(
        "💾 Wrote {} ({} parts painted)",
        args.out.display(),
        session.paint_state().len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_paint() {
        let (id, color) = parse_paint("yolo_0=#FF0000").expect("paint");
        assert_eq!(id, "yolo_0");
        assert_eq!(color, PaintColor::new(255, 0, 0));
        assert!(parse_paint("yolo_0").is_err());
        assert!(parse_paint("=#fff").is_err());
        assert!(parse_paint("yolo_0=red").is_err());
    }

    #[test]
    fn test_parse_blend_and_level() {
        assert_eq!(parse_blend("Film"), Ok(BlendStyle::Film));
        assert!(parse_blend("gloss").is_err());
        assert_eq!(parse_log_level("DEBUG"), Ok(LogLevel::Debug));
    }

    #[test]
    fn test_args_parse() {
        let args = CliArgs::try_parse_from([
            "livery",
            "--analysis",
            "car.json",
            "--paint",
            "yolo_0=#f00",
            "--paint",
            "7=#00ff00",
            "--blend",
            "matte",
            "--out",
            "out.png",
        ])
        .expect("args");
        assert_eq!(args.paints.len(), 2);
        assert_eq!(args.blend, Some(BlendStyle::Matte));
        assert!(args.photo.is_none());
    }
}
