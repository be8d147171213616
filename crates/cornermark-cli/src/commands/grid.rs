//! Grid command - show where each corner cell falls on an image

use crate::GridArgs;
use crate::commands::load_image;
use anyhow::{Context, Result};
use cornermark_ops::PlacementGrid;
use serde::Serialize;
use tracing::trace;

#[derive(Debug, Serialize)]
struct GridReport {
    width: u32,
    height: u32,
    squares: u32,
    cell_width: u32,
    cell_height: u32,
    corners: Vec<CornerReport>,
}

#[derive(Debug, Serialize)]
struct CornerReport {
    /// 1-based, as accepted by `--position`
    position: usize,
    name: &'static str,
    left: u32,
    top: u32,
    right: u32,
    bottom: u32,
}

pub fn run(args: GridArgs, verbose: u8) -> Result<()> {
    trace!(input = %args.input.display(), squares = args.squares, "grid::run");

    let image = load_image(&args.input)?;
    let report = build_report(image.width(), image.height(), args.squares)
        .with_context(|| format!("No grid for {}", args.input.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", args.input.display());
    println!("  Size:  {}x{}", report.width, report.height);
    println!(
        "  Grid:  {}x{}, cell {}x{}",
        report.squares, report.squares, report.cell_width, report.cell_height
    );
    for c in &report.corners {
        println!(
            "  {} {:<13} ({}, {}, {}, {})",
            c.position, c.name, c.left, c.top, c.right, c.bottom
        );
    }
    if verbose > 0 {
        let unused_x = report.width - report.cell_width * report.squares;
        let unused_y = report.height - report.cell_height * report.squares;
        println!("  Unused remainder: {unused_x} columns, {unused_y} rows");
    }

    Ok(())
}

fn build_report(width: u32, height: u32, squares: u32) -> Result<GridReport> {
    let grid = PlacementGrid::new(width, height, squares)?;
    let (cell_width, cell_height) = grid.cell_size();
    let corners = grid
        .corners()
        .iter()
        .map(|(corner, rect)| CornerReport {
            position: corner.index() + 1,
            name: corner.name(),
            left: rect.left,
            top: rect.top,
            right: rect.right,
            bottom: rect.bottom,
        })
        .collect();

    Ok(GridReport {
        width,
        height,
        squares,
        cell_width,
        cell_height,
        corners,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_json() {
        let report = build_report(800, 640, 8).unwrap();
        let json: serde_json::Value = serde_json::to_value(&report).unwrap();
        assert_eq!(json["cell_width"], 100);
        assert_eq!(json["cell_height"], 80);
        assert_eq!(json["corners"][3]["position"], 4);
        assert_eq!(json["corners"][3]["name"], "bottom-right");
        assert_eq!(json["corners"][3]["left"], 700);
        assert_eq!(json["corners"][3]["bottom"], 640);
    }

    #[test]
    fn test_report_too_small() {
        assert!(build_report(5, 500, 8).is_err());
    }
}
