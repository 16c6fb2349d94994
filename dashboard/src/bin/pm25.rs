//! Print the AQI and category for PM2.5 concentrations.
//!
//! ```text
//! $ pm25 7 41 180.2
//! 7.0 µg/m³: AQI 29 (Good)
//! 41.0 µg/m³: AQI 115 (Unhealthy for sensitive groups)
//! 180.2 µg/m³: AQI 230 (Very unhealthy)
//! ```

use std::process::ExitCode;

use airq::{convert_to_index, Category};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(about = "Convert PM2.5 concentrations (µg/m³) to AQI")]
struct Args {
    #[arg(required = true, allow_negative_numbers = true)]
    concentrations: Vec<f64>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let mut status = ExitCode::SUCCESS;
    for c in args.concentrations {
        match convert_to_index(c) {
            Ok(index) => println!("{c:.1} µg/m³: AQI {index} ({})", Category::of(index)),
            Err(e) => {
                eprintln!("{c}: {e}");
                status = ExitCode::FAILURE;
            }
        }
    }
    status
}
