//! cloudmatch register command - align a data cloud to a model cloud.

use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;

use cloudmatch::{
    ConsistencyParams, KeepAllPruner, MatchParams, PointSet, RegistrationParams, Triangulator,
    load_triangles, register_triangulated,
};

use crate::{Cli, output};

pub struct RegisterArgs {
    pub model: PathBuf,
    pub model_triangles: PathBuf,
    pub data: PathBuf,
    pub data_triangles: PathBuf,
    pub threshold: f64,
    pub dedup: bool,
    pub sigma: f64,
    pub epsilon: f64,
    pub output: Option<PathBuf>,
}

#[derive(Serialize)]
struct RegisterInfo {
    model_points: usize,
    data_points: usize,
    model_triangles: usize,
    data_triangles: usize,
    candidates: usize,
    inliers: usize,
    rotation: [[f64; 2]; 2],
    rotation_degrees: f64,
    translation: [f64; 2],
    mean_residual: f64,
    max_residual: f64,
}

pub fn run(args: &RegisterArgs, cli: &Cli) -> Result<()> {
    let model = PointSet::load(&args.model)
        .with_context(|| format!("Failed to load model points from {:?}", args.model))?;
    let data = PointSet::load(&args.data)
        .with_context(|| format!("Failed to load data points from {:?}", args.data))?;

    let model_triangulation = load_triangles(&args.model_triangles)
        .with_context(|| format!("Failed to load triangulation {:?}", args.model_triangles))?;
    let data_triangulation = load_triangles(&args.data_triangles)
        .with_context(|| format!("Failed to load triangulation {:?}", args.data_triangles))?;

    let model_tris = model_triangulation
        .triangulate(&model)
        .context("Model triangulation does not fit the model points")?;
    let data_tris = data_triangulation
        .triangulate(&data)
        .context("Data triangulation does not fit the data points")?;

    let mut matching = MatchParams::new().with_threshold(args.threshold);
    if args.dedup {
        matching = matching.with_dedup();
    }
    let params = RegistrationParams::new()
        .with_matching(matching)
        .with_consistency(
            ConsistencyParams::default()
                .with_sigma(args.sigma)
                .with_epsilon(args.epsilon),
        );

    // No clique solver is bundled; candidates pass through unpruned.
    let report = register_triangulated(
        &model,
        &data,
        &model_tris,
        &data_tris,
        &KeepAllPruner,
        &params,
    )
    .context("Registration failed")?;

    if let Some(path) = &args.output {
        let aligned = model.transformed(&report.transform);
        aligned
            .save(path)
            .with_context(|| format!("Failed to write aligned points to {:?}", path))?;
    }

    let r = report.transform.rotation.matrix();
    let info = RegisterInfo {
        model_points: model.len(),
        data_points: data.len(),
        model_triangles: report.model_triangles,
        data_triangles: report.data_triangles,
        candidates: report.candidates,
        inliers: report.inlier_count(),
        rotation: [[r[(0, 0)], r[(0, 1)]], [r[(1, 0)], r[(1, 1)]]],
        rotation_degrees: report.transform.angle().to_degrees(),
        translation: [report.transform.translation.x, report.transform.translation.y],
        mean_residual: report.mean_residual,
        max_residual: report.max_residual,
    };

    output::emit(&info, cli, |info| {
        println!("{}", "Registration".bold());
        println!(
            "  model:       {} points, {} triangles",
            info.model_points, info.model_triangles
        );
        println!(
            "  data:        {} points, {} triangles",
            info.data_points, info.data_triangles
        );
        println!(
            "  matches:     {} candidates, {} inliers",
            info.candidates, info.inliers
        );
        println!("  rotation:    {:.4} deg", info.rotation_degrees);
        println!(
            "  translation: ({:.4}, {:.4})",
            info.translation[0], info.translation[1]
        );
        println!(
            "  residual:    mean {:.3e}, max {:.3e}",
            info.mean_residual, info.max_residual
        );
    })
}
