//! justsynth - adaptive just-intonation terminal synth
//!
//! Run with: cargo run -- [--config FILE] [--sample FILE.wav] [--midi INDEX]

mod app;
mod midi;
mod ui;

use std::{fs::File, path::PathBuf};

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use justsynth::SynthConfig;

use app::App;

const USAGE: &str = "usage: justsynth [--config FILE] [--sample FILE.wav] [--midi INDEX] [--list-midi] [--verbose]";

#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    sample: Option<PathBuf>,
    midi_port: Option<usize>,
    list_midi: bool,
    verbose: bool,
}

fn parse_args() -> EyreResult<Args> {
    let mut args = Args::default();
    let mut iter = std::env::args().skip(1);

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                let path = iter.next().ok_or_else(|| eyre!("--config needs a path\n{USAGE}"))?;
                args.config = Some(path.into());
            }
            "--sample" | "-s" => {
                let path = iter.next().ok_or_else(|| eyre!("--sample needs a path\n{USAGE}"))?;
                args.sample = Some(path.into());
            }
            "--midi" | "-m" => {
                let index = iter.next().ok_or_else(|| eyre!("--midi needs a port index\n{USAGE}"))?;
                let index = index
                    .parse()
                    .wrap_err_with(|| format!("invalid MIDI port index {index:?}"))?;
                args.midi_port = Some(index);
            }
            "--list-midi" => args.list_midi = true,
            "--verbose" | "-v" => args.verbose = true,
            "--help" | "-h" => {
                println!("{USAGE}");
                std::process::exit(0);
            }
            other => return Err(eyre!("unknown argument {other:?}\n{USAGE}")),
        }
    }

    Ok(args)
}

/// The terminal belongs to the UI, so logs go to a file.
fn init_logging(verbose: bool) -> EyreResult<PathBuf> {
    use simplelog::{Config, LevelFilter, WriteLogger};

    let level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };
    let path = std::env::temp_dir().join("justsynth.log");
    let file = File::create(&path)
        .wrap_err_with(|| format!("cannot create log file {}", path.display()))?;

    WriteLogger::init(level, Config::default(), file)?;
    log::info!("justsynth starting (log level: {level:?})");
    Ok(path)
}

fn load_config(path: Option<&PathBuf>) -> EyreResult<SynthConfig> {
    let Some(path) = path else {
        return Ok(SynthConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("cannot read config {}", path.display()))?;
    let config = SynthConfig::from_toml(&text)
        .wrap_err_with(|| format!("invalid config {}", path.display()))?;
    log::info!("loaded config from {}", path.display());
    Ok(config)
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = parse_args()?;

    if args.list_midi {
        let ports = midi::list_ports()?;
        if ports.is_empty() {
            println!("no MIDI input ports");
        }
        for (index, name) in ports.iter().enumerate() {
            println!("{index}: {name}");
        }
        return Ok(());
    }

    let log_path = init_logging(args.verbose)?;
    let config = load_config(args.config.as_ref())?;

    App::new(config)
        .sample_path(args.sample)
        .midi_port(args.midi_port)
        .log_path(log_path)
        .run()
}
