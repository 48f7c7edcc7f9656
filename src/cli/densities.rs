//! Densities command implementation.
//!
//! Prints the density catalog, optionally with the size each bucket gets
//! for a given base size.

use clap::Args;

use crate::density::{Density, DENSITIES};
use crate::error::Result;
use crate::generator::{target_size, Dimensions};
use crate::output::Printer;

/// List the density buckets and their multipliers
#[derive(Args, Debug)]
pub struct DensitiesArgs {
    /// Show the size of each bucket for an image of this size (e.g. 192x192)
    #[arg(long, value_parser = parse_size)]
    pub size: Option<Dimensions>,

    /// Density the --size is given at
    #[arg(long, short = 's')]
    pub source_size: Option<String>,
}

pub fn run(args: DensitiesArgs, printer: &Printer) -> Result<()> {
    let source = Density::source_or_default(args.source_size.as_deref());

    for density in DENSITIES.iter() {
        let multiplier = printer.dim(&format!("×{}", density.multiplier));
        match args.size {
            Some(size) => {
                let scaled = target_size(size, source.multiplier, density.multiplier);
                printer.info(density.name, &format!("{} {}", scaled, multiplier));
            }
            None => printer.info(density.name, &multiplier),
        }
    }

    Ok(())
}

/// Parse a "WxH" size, or a single number for a square.
fn parse_size(s: &str) -> std::result::Result<Dimensions, String> {
    let parse = |part: &str| -> std::result::Result<u32, String> {
        match part.trim().parse::<u32>() {
            Ok(0) => Err(format!("Size must be non-zero, got '{}'", s)),
            Ok(n) => Ok(n),
            Err(_) => Err(format!("Invalid size '{}': expected WxH (e.g. 48x48)", s)),
        }
    };

    match s.split_once(['x', 'X']) {
        Some((w, h)) => Ok(Dimensions::new(parse(w)?, parse(h)?)),
        None => {
            let n = parse(s)?;
            Ok(Dimensions::new(n, n))
        }
    }
}
