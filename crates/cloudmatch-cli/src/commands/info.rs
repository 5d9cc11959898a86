//! cloudmatch info command - display point-set statistics.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;

use cloudmatch::PointSet;

use crate::{Cli, output};

#[derive(Serialize)]
struct PointSetInfo {
    path: String,
    points: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    bounds: Option<BoundsInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    centroid: Option<[f64; 2]>,
}

#[derive(Serialize)]
struct BoundsInfo {
    min: [f64; 2],
    max: [f64; 2],
    dimensions: [f64; 2],
}

pub fn run(input: &Path, cli: &Cli) -> Result<()> {
    let set = PointSet::load(input)
        .with_context(|| format!("Failed to load points from {:?}", input))?;

    let bounds = set.bounds().map(|(min, max)| BoundsInfo {
        min: [min.x, min.y],
        max: [max.x, max.y],
        dimensions: [max.x - min.x, max.y - min.y],
    });
    let centroid = set.centroid().map(|c| [c.x, c.y]);

    let info = PointSetInfo {
        path: input.display().to_string(),
        points: set.len(),
        bounds,
        centroid,
    };

    output::emit(&info, cli, |info| {
        println!("{}", info.path.bold());
        println!("  points:   {}", info.points);
        if let Some(b) = &info.bounds {
            println!(
                "  bounds:   ({:.3}, {:.3}) .. ({:.3}, {:.3})",
                b.min[0], b.min[1], b.max[0], b.max[1]
            );
            println!("  size:     {:.3} x {:.3}", b.dimensions[0], b.dimensions[1]);
        }
        if let Some(c) = &info.centroid {
            println!("  centroid: ({:.3}, {:.3})", c[0], c[1]);
        }
    })
}
