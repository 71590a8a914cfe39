use anyhow::{Context, Result};
use renderer::{FramePacing, Renderer, RendererConfig};
use tracing_subscriber::EnvFilter;

use crate::cli::Args;

pub fn run(args: Args) -> Result<()> {
    let config = config_from_args(&args);
    tracing::info!(
        shader = %config.shader_source.display(),
        width = config.surface_size.0,
        height = config.surface_size.1,
        target_fps = config.pacing.target_fps,
        capped = config.pacing.capped,
        "starting shader preview"
    );

    let mut renderer = Renderer::new(config);
    renderer
        .run()
        .with_context(|| format!("preview of {} failed", args.fragment.display()))
}

pub fn config_from_args(args: &Args) -> RendererConfig {
    let title = match args.fragment.file_name() {
        Some(name) => format!("Shaker - {}", name.to_string_lossy()),
        None => "Shaker".to_string(),
    };
    RendererConfig {
        surface_size: args.surface_size,
        shader_source: args.fragment.clone(),
        pacing: FramePacing::new(args.fps, args.capped),
        title,
    }
}

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::cli::parse_from;

    #[test]
    fn config_carries_cli_choices() {
        let args = parse_from([
            "shaker",
            "shaders/plasma.frag",
            "320",
            "200",
            "--fps",
            "30",
        ])
        .unwrap();
        let config = config_from_args(&args);
        assert_eq!(config.surface_size, (320, 200));
        assert_eq!(config.shader_source, PathBuf::from("shaders/plasma.frag"));
        assert_eq!(config.pacing.target_fps, 30);
        assert_eq!(config.title, "Shaker - plasma.frag");
    }
}
