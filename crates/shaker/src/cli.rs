use std::ffi::OsString;
use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use renderer::{DEFAULT_SURFACE_SIZE, DEFAULT_TARGET_FPS};

/// Raw command line. WIDTH and HEIGHT stay text until the positional count
/// is known to be right, so a lone bad width is still a usage error.
#[derive(Parser, Debug)]
#[command(
    name = "shaker",
    author,
    version,
    about = "Preview a GLSL fragment shader on a full-window quad"
)]
pub struct Cli {
    /// Fragment shader body; the harness preamble is prepended before compiling.
    #[arg(value_name = "FRAGMENT")]
    pub fragment: PathBuf,

    /// Window width in pixels (requires HEIGHT).
    #[arg(value_name = "WIDTH", allow_negative_numbers = true, requires = "height")]
    pub width: Option<String>,

    /// Window height in pixels.
    #[arg(value_name = "HEIGHT", allow_negative_numbers = true)]
    pub height: Option<String>,

    /// Target frame rate; also the divisor that turns frames into `glx_Time` seconds.
    #[arg(
        long,
        value_name = "FPS",
        default_value_t = DEFAULT_TARGET_FPS,
        value_parser = clap::value_parser!(u32).range(1..=1000)
    )]
    pub fps: u32,

    /// Render as fast as possible instead of sleeping out each frame.
    #[arg(long)]
    pub uncapped: bool,
}

/// Validated launch options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub fragment: PathBuf,
    pub surface_size: (u32, u32),
    pub fps: u32,
    pub capped: bool,
}

impl Cli {
    /// Checks the window dimensions and resolves defaults.
    pub fn validate(self) -> Result<Args, clap::Error> {
        let surface_size = match self.width.as_deref().zip(self.height.as_deref()) {
            Some((width, height)) => (
                dimension_arg("WIDTH", width)?,
                dimension_arg("HEIGHT", height)?,
            ),
            None => DEFAULT_SURFACE_SIZE,
        };
        Ok(Args {
            fragment: self.fragment,
            surface_size,
            fps: self.fps,
            capped: !(self.uncapped || cfg!(feature = "uncapped")),
        })
    }
}

pub fn parse() -> Result<Args, clap::Error> {
    parse_from(std::env::args_os())
}

pub fn parse_from<I, T>(args: I) -> Result<Args, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    Cli::try_parse_from(args)?.validate()
}

/// Usage line without the surrounding error text.
pub fn usage() -> String {
    Cli::command().render_usage().to_string()
}

fn dimension_arg(name: &str, value: &str) -> Result<u32, clap::Error> {
    parse_dimension(value).map_err(|reason| {
        Cli::command().error(
            ErrorKind::ValueValidation,
            format!("invalid value '{value}' for '[{name}]': {reason}"),
        )
    })
}

pub fn parse_dimension(value: &str) -> Result<u32, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("dimension must not be empty".to_string());
    }

    let pixels: i64 = trimmed
        .parse()
        .map_err(|_| format!("'{trimmed}' is not a whole number of pixels"))?;
    if pixels <= 0 {
        return Err(format!("dimension must be positive, got {pixels}"));
    }
    u32::try_from(pixels).map_err(|_| format!("dimension {pixels} is too large"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_only_uses_default_size() {
        let args = parse_from(["shaker", "demo.frag"]).unwrap();
        assert_eq!(args.fragment, PathBuf::from("demo.frag"));
        assert_eq!(args.surface_size, (800, 600));
        assert_eq!(args.fps, 60);
    }

    #[test]
    fn explicit_size_is_used() {
        let args = parse_from(["shaker", "demo.frag", "1280", "720"]).unwrap();
        assert_eq!(args.surface_size, (1280, 720));
    }

    #[test]
    fn width_without_height_is_a_usage_error() {
        let err = parse_from(["shaker", "demo.frag", "1280"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn lone_non_numeric_width_is_still_a_count_error() {
        let err = parse_from(["shaker", "demo.frag", "wide"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn extra_positionals_are_a_usage_error() {
        let err = parse_from(["shaker", "demo.frag", "1280", "720", "extra"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn bad_dimensions_in_a_full_pair_are_invalid_values() {
        for (width, height) in [("0", "600"), ("640", "tall"), ("-4", "480")] {
            let err = parse_from(["shaker", "demo.frag", width, height]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::ValueValidation, "{width}x{height}");
        }
    }

    #[test]
    fn bad_dimensions_are_rejected() {
        assert!(parse_dimension("0").is_err());
        assert!(parse_dimension("-4").is_err());
        assert!(parse_dimension("wide").is_err());
        assert!(parse_dimension("").is_err());
        assert!(parse_dimension("99999999999").is_err());
        assert_eq!(parse_dimension(" 640 "), Ok(640));
    }

    #[test]
    fn fps_outside_range_is_invalid() {
        let err = parse_from(["shaker", "demo.frag", "--fps", "0"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }

    #[test]
    fn uncapped_flag_disables_the_cap() {
        let args = parse_from(["shaker", "demo.frag", "--uncapped"]).unwrap();
        assert!(!args.capped);
    }

    #[test]
    fn usage_names_the_positionals() {
        let usage = usage();
        assert!(usage.contains("Usage:"));
        assert!(usage.contains("<FRAGMENT>"));
    }

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
