// Copyright (c) 2024 Mike Tsao

//! `voxcurve` regenerates the interpolated points of a chart's laser curve.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use voxcurve::{
    automation::Interpolation, converter::named_output_path, interpolate_in_place,
    interpolate_to_named_output, types::TimeSignature, CurveSettings,
};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    #[clap(subcommand)]
    command: Command,

    /// JSON settings file, applied over the subcommand's preset. Positional
    /// arguments override what it says.
    #[clap(short = 's', long, value_parser, global = true)]
    settings: Option<PathBuf>,

    /// Enable debug logging
    #[clap(short = 'd', long, value_parser, global = true)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interpolate on the 64th-note grid and overwrite the input file.
    Curve {
        /// The file of control points.
        input: PathBuf,
        /// Interpolation mode; `voxcurve modes` lists them.
        #[clap(value_parser = parse_mode)]
        mode: Interpolation,
        /// Time signature, such as 4/4.
        #[clap(value_parser = parse_time_signature)]
        time_signature: TimeSignature,
    },
    /// Interpolate 64th-note points onto 24th notes and write kshcurve.txt
    /// next to the input.
    Ksh {
        /// The file of control points.
        input: PathBuf,
        /// Time signature, such as 4/4.
        #[clap(value_parser = parse_time_signature)]
        time_signature: TimeSignature,
        /// Interpolation mode, if not cubic_not_a_knot.
        #[clap(short = 'm', long, value_parser = parse_mode)]
        mode: Option<Interpolation>,
    },
    /// List the interpolation modes.
    Modes,
}

fn parse_mode(s: &str) -> Result<Interpolation, String> {
    s.parse().map_err(|e: voxcurve::CurveError| e.to_string())
}

fn parse_time_signature(s: &str) -> Result<TimeSignature, String> {
    s.parse().map_err(|e: voxcurve::CurveError| e.to_string())
}

fn load_settings(args: &Args, preset: CurveSettings) -> anyhow::Result<CurveSettings> {
    match &args.settings {
        Some(path) => preset.load_onto(path),
        None => Ok(preset),
    }
}

// The preset for the subcommand, then the settings file, then the positional
// arguments.
fn settings_for(args: &Args) -> anyhow::Result<CurveSettings> {
    match &args.command {
        Command::Curve {
            mode,
            time_signature,
            ..
        } => {
            let mut settings =
                load_settings(args, CurveSettings::in_place(*mode, *time_signature))?;
            settings.mode = *mode;
            settings.time_signature = *time_signature;
            Ok(settings)
        }
        Command::Ksh {
            time_signature,
            mode,
            ..
        } => {
            let mut settings = load_settings(args, CurveSettings::ksh(*time_signature))?;
            settings.time_signature = *time_signature;
            if let Some(mode) = mode {
                settings.mode = *mode;
            }
            Ok(settings)
        }
        Command::Modes => Ok(CurveSettings::default()),
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(if args.debug {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .parse_default_env()
        .init();

    match &args.command {
        Command::Curve { input, .. } => {
            interpolate_in_place(input, &settings_for(&args)?)?;
        }
        Command::Ksh { input, .. } => {
            let settings = settings_for(&args)?;
            log::debug!("writing {}", named_output_path(input, &settings).display());
            let output = interpolate_to_named_output(input, &settings)?;
            println!("output written to {}", output.display());
        }
        Command::Modes => {
            for mode in Interpolation::all() {
                println!("{mode}");
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxcurve::automation::{AuxPolicy, Easing, StepPolicy};

    fn args_with_settings(json: &str, command: &[&str]) -> (tempfile::TempDir, Args) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, json).unwrap();
        let mut argv = vec!["voxcurve", "-s", path.to_str().unwrap()];
        argv.extend_from_slice(command);
        let args = Args::try_parse_from(argv).unwrap();
        (dir, args)
    }

    #[test]
    fn settings_file_keeps_the_ksh_preset() {
        let (_dir, args) =
            args_with_settings(r#"{ "output-name": "x.txt" }"#, &["ksh", "f.txt", "3/4"]);
        let settings = settings_for(&args).unwrap();
        assert_eq!(settings.output_name, "x.txt");
        assert_eq!(settings.mode, Interpolation::CubicNotAKnot);
        assert_eq!(settings.step, StepPolicy::TWENTY_FOURTHS);
        assert_eq!(settings.aux_policy, AuxPolicy::FollowingPoint);
        assert_eq!(settings.snap_epsilon, Some(1e-6));
        assert_eq!(settings.time_signature, TimeSignature { top: 3, bottom: 4 });
    }

    #[test]
    fn positional_arguments_beat_the_settings_file() {
        let (_dir, args) = args_with_settings(
            r#"{ "mode": "cubic_spline", "time-signature": { "top": 6, "bottom": 8 } }"#,
            &["curve", "f.txt", "ease_in_quad", "4/4"],
        );
        let settings = settings_for(&args).unwrap();
        assert_eq!(settings.mode, Interpolation::Eased(Easing::EaseInQuad));
        assert_eq!(settings.time_signature, TimeSignature::COMMON_TIME);

        let (_dir, args) =
            args_with_settings(r#"{ "mode": "cubic_spline" }"#, &["ksh", "f.txt", "4/4"]);
        assert_eq!(settings_for(&args).unwrap().mode, Interpolation::CubicSpline);
    }
}
