//! Heatmap panels of threshold error, one per condition.
//!
//! Rows are the permanent repressor strength (first row at the top), columns
//! the removed repressor strength. The colour scale is fixed to [0, 1].

use std::error::Error;
use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::info;

use crate::conditions::Condition;
use crate::error::{GramError, Result};
use crate::matrices::ThresholdErrorMatrices;

/// Sequential palette anchors from 0 to 1 (viridis).
const PALETTE: [(u8, u8, u8); 5] = [
    (68, 1, 84),
    (59, 82, 139),
    (33, 145, 140),
    (94, 201, 98),
    (253, 231, 37),
];

const MISSING: RGBColor = RGBColor(200, 200, 200);
const COLORBAR_WIDTH: u32 = 110;
const COLORBAR_STEPS: usize = 100;

/// Figure layout options.
#[derive(Clone, Debug)]
pub struct HeatmapStyle {
    /// Pixel size of one panel.
    pub panel_size: (u32, u32),
    /// Optional figure title.
    pub title: Option<String>,
    /// Print the value inside each cell.
    pub annotate: bool,
}

impl Default for HeatmapStyle {
    fn default() -> Self {
        Self {
            panel_size: (400, 440),
            title: None,
            annotate: true,
        }
    }
}

impl HeatmapStyle {
    pub fn figure_size(&self) -> (u32, u32) {
        let (w, h) = self.panel_size;
        let title = if self.title.is_some() { 40 } else { 0 };
        (w * Condition::ALL.len() as u32 + COLORBAR_WIDTH, h + title)
    }
}

/// Map a value in [0, 1] to the palette; out-of-range values are clamped and
/// NaN is drawn grey.
pub fn colormap(value: f64) -> RGBColor {
    if value.is_nan() {
        return MISSING;
    }
    let x = value.clamp(0.0, 1.0) * (PALETTE.len() - 1) as f64;
    let lo = (x.floor() as usize).min(PALETTE.len() - 2);
    let frac = x - lo as f64;
    let (r0, g0, b0) = PALETTE[lo];
    let (r1, g1, b1) = PALETTE[lo + 1];
    let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * frac).round() as u8;
    RGBColor(mix(r0, r1), mix(g0, g1), mix(b0, b1))
}

/// Axis label for a continuous coordinate at the centre of a cell.
///
/// `reversed` maps position k to row n - 1 - k so the first row sits on top.
fn cell_label(v: f64, strengths: &[f64], reversed: bool) -> String {
    let n = strengths.len();
    let shifted = v - 0.5;
    if shifted < 0.0 || (shifted - shifted.round()).abs() > 1e-6 {
        return String::new();
    }
    let k = shifted.round() as usize;
    if k >= n {
        return String::new();
    }
    let index = if reversed { n - 1 - k } else { k };
    format!("{}", strengths[index])
}

/// Every condition needs a square matrix with one row per strength.
fn check_matrices(matrices: &ThresholdErrorMatrices, strengths: &[f64]) -> Result<()> {
    let n = strengths.len();
    for condition in Condition::ALL {
        let grid = matrices
            .get(&condition)
            .ok_or_else(|| GramError::Render(format!("no matrix for condition '{}'", condition)))?;
        if grid.dim() != (n, n) {
            return Err(GramError::Render(format!(
                "matrix for '{}' is {}x{} but there are {} strengths",
                condition,
                grid.nrows(),
                grid.ncols(),
                n
            )));
        }
    }
    Ok(())
}

/// Render the four condition panels to `path` (SVG if the extension is
/// `svg`, PNG otherwise).
pub fn render_heatmaps(
    matrices: &ThresholdErrorMatrices,
    strengths: &[f64],
    path: &Path,
    style: &HeatmapStyle,
) -> Result<()> {
    check_matrices(matrices, strengths)?;
    let size = style.figure_size();
    let is_svg = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));

    let drawn = if is_svg {
        let root = SVGBackend::new(path, size).into_drawing_area();
        draw_figure(&root, matrices, strengths, style).and_then(|_| Ok(root.present()?))
    } else {
        let root = BitMapBackend::new(path, size).into_drawing_area();
        draw_figure(&root, matrices, strengths, style).and_then(|_| Ok(root.present()?))
    };
    drawn.map_err(|e| GramError::Render(e.to_string()))?;

    info!(path = %path.display(), "rendered threshold error heatmaps");
    Ok(())
}

fn draw_figure<DB>(
    root: &DrawingArea<DB, Shift>,
    matrices: &ThresholdErrorMatrices,
    strengths: &[f64],
    style: &HeatmapStyle,
) -> std::result::Result<(), Box<dyn Error>>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;
    let area = match &style.title {
        Some(title) => root.titled(title, ("sans-serif", 28))?,
        None => root.clone(),
    };

    let (width, _) = area.dim_in_pixel();
    let (panels_area, bar_area) = area.split_horizontally(width.saturating_sub(COLORBAR_WIDTH));
    let panels = panels_area.split_evenly((1, Condition::ALL.len()));

    for (condition, panel) in Condition::ALL.iter().zip(panels.iter()) {
        let grid = matrices
            .get(condition)
            .ok_or_else(|| format!("no matrix for condition '{}'", condition))?;
        let n = grid.nrows();
        let extent = n as f64;

        let mut chart = ChartBuilder::on(panel)
            .caption(condition.as_str(), ("sans-serif", 22))
            .margin(12)
            .x_label_area_size(45)
            .y_label_area_size(60)
            .build_cartesian_2d(0f64..extent, 0f64..extent)?;

        let x_fmt = |v: &f64| cell_label(*v, strengths, false);
        let y_fmt = |v: &f64| cell_label(*v, strengths, true);
        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(2 * n + 1)
            .y_labels(2 * n + 1)
            .x_label_formatter(&x_fmt)
            .y_label_formatter(&y_fmt)
            .x_desc("removed η")
            .y_desc("permanent η")
            .draw()?;

        chart.draw_series(grid.indexed_iter().map(|((i, j), &value)| {
            let y = (n - 1 - i) as f64;
            let x = j as f64;
            Rectangle::new([(x, y), (x + 1.0, y + 1.0)], colormap(value).filled())
        }))?;

        if style.annotate {
            chart.draw_series(grid.indexed_iter().map(|((i, j), &value)| {
                let y = (n - 1 - i) as f64 + 0.55;
                let x = j as f64 + 0.35;
                let color = if value > 0.6 { &BLACK } else { &WHITE };
                Text::new(
                    format!("{:.2}", value),
                    (x, y),
                    ("sans-serif", 16).into_font().color(color),
                )
            }))?;
        }
    }

    draw_colorbar(&bar_area)?;
    Ok(())
}

fn draw_colorbar<DB>(area: &DrawingArea<DB, Shift>) -> std::result::Result<(), Box<dyn Error>>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let mut chart = ChartBuilder::on(area)
        .margin_top(50)
        .margin_bottom(57)
        .margin_right(10)
        .y_label_area_size(45)
        .build_cartesian_2d(0f64..1f64, 0f64..1f64)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .disable_x_axis()
        .y_labels(6)
        .y_label_formatter(&|v| format!("{:.1}", v))
        .draw()?;

    let step = 1.0 / COLORBAR_STEPS as f64;
    chart.draw_series((0..COLORBAR_STEPS).map(|k| {
        let y = k as f64 * step;
        Rectangle::new([(0.0, y), (1.0, y + step)], colormap(y + step / 2.0).filled())
    }))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn uniform_matrices(n: usize, value: f64) -> ThresholdErrorMatrices {
        Condition::ALL
            .into_iter()
            .map(|c| (c, Array2::from_elem((n, n), value)))
            .collect()
    }

    #[test]
    fn test_colormap_endpoints() {
        assert_eq!(colormap(0.0), RGBColor(68, 1, 84));
        assert_eq!(colormap(1.0), RGBColor(253, 231, 37));
    }

    #[test]
    fn test_colormap_clamps() {
        assert_eq!(colormap(-0.5), colormap(0.0));
        assert_eq!(colormap(3.0), colormap(1.0));
        assert_eq!(colormap(f64::NAN), MISSING);
    }

    #[test]
    fn test_colormap_anchor_midpoint() {
        assert_eq!(colormap(0.5), RGBColor(33, 145, 140));
    }

    #[test]
    fn test_cell_labels() {
        let strengths = [0.01, 0.03, 0.1];
        assert_eq!(cell_label(0.5, &strengths, false), "0.01");
        assert_eq!(cell_label(2.5, &strengths, false), "0.1");
        assert_eq!(cell_label(0.5, &strengths, true), "0.1");
        assert_eq!(cell_label(1.0, &strengths, false), "");
        assert_eq!(cell_label(3.5, &strengths, false), "");
    }

    #[test]
    fn test_figure_size() {
        let style = HeatmapStyle::default();
        assert_eq!(style.figure_size(), (4 * 400 + COLORBAR_WIDTH, 440));
        let titled = HeatmapStyle {
            title: Some("threshold error".to_string()),
            ..Default::default()
        };
        assert_eq!(titled.figure_size().1, 480);
    }

    #[test]
    fn test_check_matrices_accepts_square_grids() {
        let strengths = [0.01, 0.03, 0.1];
        assert!(check_matrices(&uniform_matrices(3, 0.2), &strengths).is_ok());
    }

    #[test]
    fn test_strength_count_mismatch_is_render_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mismatch.png");
        let err = render_heatmaps(
            &uniform_matrices(3, 0.2),
            &[0.01, 0.1],
            &path,
            &HeatmapStyle::default(),
        )
        .unwrap_err();

        assert!(matches!(err, GramError::Render(ref msg) if msg.contains("2 strengths")));
        assert!(!path.exists());
    }

    #[test]
    fn test_missing_condition_is_render_error() {
        let mut matrices = uniform_matrices(2, 0.5);
        matrices.remove(&Condition::CarbonLimited);
        let err = check_matrices(&matrices, &[0.01, 0.1]).unwrap_err();
        assert!(matches!(err, GramError::Render(ref msg) if msg.contains("carbon_limited")));
    }

    #[test]
    fn test_non_square_matrix_is_render_error() {
        let mut matrices = uniform_matrices(2, 0.5);
        matrices.insert(Condition::Minute, Array2::zeros((2, 3)));
        let err = check_matrices(&matrices, &[0.01, 0.1]).unwrap_err();
        assert!(matches!(err, GramError::Render(ref msg) if msg.contains("2x3")));
    }
}
