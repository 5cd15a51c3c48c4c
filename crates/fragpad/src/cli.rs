use std::path::PathBuf;

use clap::{Parser, Subcommand};
use padconfig::{parse_antialias, AntialiasSetting};

#[derive(Parser, Debug)]
#[command(
    name = "fragpad",
    author,
    version,
    about = "Live GLSL fragment shader playground",
    arg_required_else_help = false
)]
pub struct Cli {
    #[command(flatten)]
    pub run: RunArgs,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Fragment shader to edit; created from the built-in default if missing.
    #[arg(value_name = "SHADER")]
    pub shader: Option<PathBuf>,

    /// Configuration file (defaults to `config.toml` in the config directory).
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Quiet period after the last edit before recompiling.
    #[arg(long, value_name = "MILLISECONDS")]
    pub debounce_ms: Option<u64>,

    /// Initial window size in physical pixels (e.g. `1280x720`).
    #[arg(long, value_name = "WIDTHxHEIGHT", value_parser = parse_size)]
    pub size: Option<(u32, u32)>,

    /// Anti-aliasing policy: `auto`, `off`, or an explicit MSAA sample count (e.g. `4`).
    #[arg(long, value_name = "MODE", value_parser = parse_antialias)]
    pub antialias: Option<AntialiasSetting>,

    /// Directory the export dialog opens in.
    #[arg(long, value_name = "DIR")]
    pub export_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write the built-in default shader to PATH.
    Init(InitArgs),
    /// Compile a shader without opening a window and print diagnostics.
    Check(CheckArgs),
    /// Print resolved config and data directories.
    Where,
}

#[derive(Parser, Debug)]
pub struct InitArgs {
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Overwrite an existing file.
    #[arg(long)]
    pub force: bool,
}

#[derive(Parser, Debug)]
pub struct CheckArgs {
    #[arg(value_name = "PATH")]
    pub path: PathBuf,
}

pub fn parse() -> Cli {
    Cli::parse()
}

fn parse_size(raw: &str) -> Result<(u32, u32), String> {
    let (width, height) = raw
        .trim()
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{raw}'"))?;
    let width: u32 = width
        .trim()
        .parse()
        .map_err(|err| format!("invalid width '{width}': {err}"))?;
    let height: u32 = height
        .trim()
        .parse()
        .map_err(|err| format!("invalid height '{height}': {err}"))?;
    if width == 0 || height == 0 {
        return Err(format!("size must be non-zero, got {width}x{height}"));
    }
    Ok((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sizes() {
        assert_eq!(parse_size("1280x720"), Ok((1280, 720)));
        assert_eq!(parse_size(" 640X480 "), Ok((640, 480)));
        assert!(parse_size("1280").is_err());
        assert!(parse_size("0x10").is_err());
        assert!(parse_size("ax10").is_err());
    }

    #[test]
    fn positional_shader_and_overrides() {
        let cli = Cli::try_parse_from([
            "fragpad",
            "scratch.frag",
            "--debounce-ms",
            "250",
            "--size",
            "800x600",
            "--antialias",
            "off",
        ])
        .unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.run.shader, Some(PathBuf::from("scratch.frag")));
        assert_eq!(cli.run.debounce_ms, Some(250));
        assert_eq!(cli.run.size, Some((800, 600)));
        assert_eq!(cli.run.antialias, Some(AntialiasSetting::Off));
    }

    #[test]
    fn subcommands_parse() {
        let cli = Cli::try_parse_from(["fragpad", "init", "a.frag", "--force"]).unwrap();
        match cli.command {
            Some(Command::Init(args)) => {
                assert_eq!(args.path, PathBuf::from("a.frag"));
                assert!(args.force);
            }
            other => panic!("unexpected command: {other:?}"),
        }

        let cli = Cli::try_parse_from(["fragpad", "check", "b.frag"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Check(_))));
    }
}
