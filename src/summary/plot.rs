use super::{Result, Summary, SummaryError};
use itertools::{Itertools, MinMaxResult};
use plotters::{coord::Shift, prelude::*};
use std::{fmt::Display, ops::Range, path::Path};

type Panel<'a> = DrawingArea<SVGBackend<'a>, Shift>;
type Series = (String, Vec<(f64, f64)>);

fn plot_error<E: Display>(e: E) -> SummaryError {
    SummaryError::Plot(e.to_string())
}

fn range<I: Iterator<Item = f64>>(values: I) -> Range<f64> {
    match values.minmax() {
        MinMaxResult::MinMax(lo, hi) if hi > lo => {
            let pad = 5e-2 * (hi - lo);
            lo - pad..hi + pad
        }
        MinMaxResult::MinMax(lo, _) | MinMaxResult::OneElement(lo) => lo - 1.0..lo + 1.0,
        MinMaxResult::NoElements => 0.0..1.0,
    }
}

fn draw(panel: &Panel, xlabel: &str, ylabel: &str, series: &[Series], markers: bool) -> Result<()> {
    let xrange = range(series.iter().flat_map(|(_, s)| s.iter().map(|p| p.0)));
    let yrange = range(series.iter().flat_map(|(_, s)| s.iter().map(|p| p.1)));
    let mut chart = ChartBuilder::on(panel)
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .margin(10)
        .build_cartesian_2d(xrange, yrange)
        .map_err(plot_error)?;
    chart
        .configure_mesh()
        .x_desc(xlabel)
        .y_desc(ylabel)
        .draw()
        .map_err(plot_error)?;

    for (i, (label, points)) in series.iter().enumerate() {
        let color = colorous::TABLEAU10[i % colorous::TABLEAU10.len()];
        let rgb = RGBColor(color.r, color.g, color.b);
        if markers {
            chart
                .draw_series(points.iter().map(|&p| Circle::new(p, 3, rgb.filled())))
                .map_err(plot_error)?;
        } else {
            chart
                .draw_series(LineSeries::new(points.iter().copied(), &rgb))
                .map_err(plot_error)?
                .label(label)
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &rgb));
        }
    }
    if !markers && series.len() > 1 {
        chart
            .configure_series_labels()
            .border_style(&BLACK)
            .background_style(&WHITE.mix(0.8))
            .position(SeriesLabelPosition::UpperRight)
            .draw()
            .map_err(plot_error)?;
    }
    Ok(())
}

impl Summary {
    /// Draws the summary panels into a SVG file
    ///
    /// Left column: wall shear profiles, tangent angle and pressure coefficient
    /// along the chord; right column: minimum wall shear, its position and
    /// its pressure coefficient versus time step.
    pub fn plot<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let n_row = if self.min_pressure.is_some() { 3 } else { 2 };
        let root = SVGBackend::new(path.as_ref(), (1024, 384 * n_row as u32)).into_drawing_area();
        root.fill(&WHITE).map_err(plot_error)?;
        let root = root
            .titled(&self.title, ("sans-serif", 20))
            .map_err(plot_error)?;
        let panels = root.split_evenly((n_row, 2));

        let profiles: Vec<Series> = self
            .profiles
            .iter()
            .map(|p| (p.time_step.to_string(), p.points.clone()))
            .collect();
        draw(
            &panels[0],
            "x position along the chord [x/C]",
            "Wall Shear",
            &profiles,
            false,
        )?;
        draw(
            &panels[1],
            "time step",
            "Wall Shear",
            &[(String::new(), self.min_wall_shear.clone())],
            true,
        )?;
        draw(
            &panels[2],
            "x position along the chord [x/C]",
            "Tangent Angle [rad]",
            &[(String::new(), self.tangent_profile.clone())],
            false,
        )?;
        draw(
            &panels[3],
            "time step",
            "x position along the chord [x/C]",
            &[(String::new(), self.min_position.clone())],
            true,
        )?;
        if let Some(min_pressure) = &self.min_pressure {
            draw(
                &panels[4],
                "x position along the chord [x/C]",
                "pressure-coefficient",
                &[(String::new(), self.shed_pressure.clone().unwrap_or_default())],
                false,
            )?;
            draw(
                &panels[5],
                "time step",
                "pressure-coefficient",
                &[(String::new(), min_pressure.clone())],
                true,
            )?;
        }
        root.present().map_err(plot_error)?;
        log::info!("summary plot written to {:?}", path.as_ref());
        Ok(())
    }
}
