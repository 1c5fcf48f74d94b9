// Copyright (c) 2024 Mike Tsao

//! `voxtools` runs one of the chart utilities on a file.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use voxcurve::{
    chart::DEFAULT_SLOPE_FIELD,
    types::{TickGrid, TimeSignature, BASE_TICKS_PER_QUARTER},
};
use voxcurve_tools::{
    invert::{invert_in_place, Offset},
    migrate::migrate_file,
    slopes::{control_point_slopes, find_slopes_in_files, with_slopes},
};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    #[clap(subcommand)]
    command: Command,

    /// Enable debug logging
    #[clap(short = 'd', long, value_parser, global = true)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Mirror a curve file's values and move it along the timeline, in place.
    #[clap(allow_negative_numbers = true)]
    Invert {
        /// The curve file.
        input: PathBuf,
        /// Time signature, such as 4/4.
        #[clap(value_parser = parse_time_signature)]
        time_signature: TimeSignature,
        /// Measures to move by. May be negative.
        measure_offset: i64,
        /// Beats to move by. May be negative.
        beat_offset: i64,
    },
    /// Upgrade a version 10 .vox chart to version 12, written to
    /// NAME_processed.vox.
    Migrate {
        /// The .vox chart.
        input: PathBuf,
    },
    /// Estimate the slope at each control point from an interpolated curve.
    Slopes {
        /// The file of control points.
        control_points: PathBuf,
        /// The file of interpolated points.
        interpolated_points: PathBuf,
        /// Time signature, such as 4/4.
        #[clap(value_parser = parse_time_signature, default_value = "4/4")]
        time_signature: TimeSignature,
        /// Print the control rows with their slope column filled in.
        #[clap(short = 'r', long, value_parser)]
        rows: bool,
        /// The 0-based row field to write slopes into with --rows.
        #[clap(long, value_parser, default_value_t = DEFAULT_SLOPE_FIELD)]
        slope_field: usize,
    },
}

fn parse_time_signature(s: &str) -> Result<TimeSignature, String> {
    s.parse().map_err(|e: voxcurve::CurveError| e.to_string())
}

fn grid(time_signature: &TimeSignature) -> anyhow::Result<TickGrid> {
    Ok(TickGrid::from_time_signature(
        time_signature,
        BASE_TICKS_PER_QUARTER,
    )?)
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
        Command::Invert {
            input,
            time_signature,
            measure_offset,
            beat_offset,
        } => {
            let offset = Offset {
                measures: *measure_offset,
                beats: *beat_offset,
            };
            invert_in_place(input, &grid(time_signature)?, offset)?;
        }
        Command::Migrate { input } => {
            let output = migrate_file(input)?;
            println!("output written to {}", output.display());
        }
        Command::Slopes {
            control_points,
            interpolated_points,
            time_signature,
            rows,
            slope_field,
        } => {
            let grid = grid(time_signature)?;
            let (control, fits) = find_slopes_in_files(control_points, interpolated_points, &grid)?;
            if *rows {
                let slopes = control_point_slopes(control.len(), &fits);
                print!("{}", with_slopes(&control, &slopes, &grid, *slope_field).concat());
            } else {
                for fit in &fits {
                    let [c0, c1, c2, c3] = fit.coefficients;
                    println!(
                        "Segment {}: y = {c3:.6}x^3 + {c2:.6}x^2 + {c1:.6}x + {c0:.6}",
                        fit.index + 1
                    );
                    println!("  dy/dx at {}: {:.10}", fit.start, fit.slope_at_start);
                    println!("  dy/dx at {}: {:.10}", fit.end, fit.slope_at_end);
                }
            }
        }
    }
    Ok(())
}
