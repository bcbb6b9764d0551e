// gridloc_sim/src/render.rs

//! Text rendering of beliefs for the terminal.

use std::fmt::Write;

use gridloc_core::prelude::{BeliefState, Grid, GridCoord};

use crate::simulation::scenario::StepRecord;

/// Draws a belief as a percentage grid, top row first, walls as `##`.
pub fn render_belief(belief: &BeliefState, grid: &Grid) -> String {
    let mut out = String::new();
    for y in (0..grid.height()).rev() {
        for x in 0..grid.width() {
            let coord = GridCoord::new(x as isize, y as isize);
            if !grid.is_free(coord) {
                out.push_str("   ##  ");
                continue;
            }
            let p = belief.probability_at(coord).unwrap_or(0.0);
            // Writing into a String cannot fail.
            let _ = write!(out, "{:5.1}% ", p * 100.0);
        }
        // Drop the trailing separator.
        out.truncate(out.trim_end().len());
        out.push('\n');
    }
    out
}

/// Renders one step of a run: the reading, optionally the intermediate
/// stages, and the posterior.
pub fn render_step(step: &StepRecord, grid: &Grid, show_stages: bool) -> String {
    let reading = &step.reading;
    let mut out = String::new();
    let _ = writeln!(out, "t = {}", reading.t);
    if let Some(direction) = reading.direction {
        let _ = writeln!(out, "tried {direction}, now at {}", reading.position);
    }
    let _ = writeln!(
        out,
        "true color {}, sensed {}",
        reading.true_color, reading.observation
    );

    if show_stages {
        if let Some(predicted) = &step.predicted {
            let _ = writeln!(out, "transitioning -->\n{}", render_belief(predicted, grid));
        }
        if let Some(weighted) = &step.weighted {
            let _ = writeln!(out, "factoring in sensor -->\n{}", render_belief(weighted, grid));
        }
        out.push_str("normalizing -->\n");
    }
    out.push_str(&render_belief(&step.posterior, grid));
    out.push_str(" === \n");
    out
}
