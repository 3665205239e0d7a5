/// Static SVG plots.
///
/// Plain string templating, no plotting backend: the plots are simple
/// enough that axes, bars and markers are written out directly.

use crate::analysis::stats::Histogram;

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 500.0;
const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 50.0;
const MARGIN_BOTTOM: f64 = 70.0;
const TICKS: usize = 5;

pub const TIME_DIFF_AXIS_LABEL: &str = "Negative = MODIS earlier, positive = VIIRS earlier";

/// Escapes text for use in SVG/HTML content and attributes.
pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Maps data coordinates onto the plot area.
struct Frame {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
}

impl Frame {
    fn plot_width() -> f64 {
        WIDTH - MARGIN_LEFT - MARGIN_RIGHT
    }

    fn plot_height() -> f64 {
        HEIGHT - MARGIN_TOP - MARGIN_BOTTOM
    }

    fn x(&self, v: f64) -> f64 {
        MARGIN_LEFT + (v - self.x_min) / (self.x_max - self.x_min) * Self::plot_width()
    }

    fn y(&self, v: f64) -> f64 {
        MARGIN_TOP + Self::plot_height() - (v - self.y_min) / (self.y_max - self.y_min) * Self::plot_height()
    }

    fn axes(&self, out: &mut String, title: &str, x_label: &str, y_label: &str) {
        let (left, right) = (MARGIN_LEFT, WIDTH - MARGIN_RIGHT);
        let (top, bottom) = (MARGIN_TOP, HEIGHT - MARGIN_BOTTOM);

        out.push_str(&format!(
            "<text x=\"{:.1}\" y=\"30\" text-anchor=\"middle\" font-size=\"16\">{}</text>\n",
            WIDTH / 2.0,
            escape_xml(title)
        ));
        out.push_str(&format!(
            "<line x1=\"{left:.1}\" y1=\"{bottom:.1}\" x2=\"{right:.1}\" y2=\"{bottom:.1}\" stroke=\"black\"/>\n\
             <line x1=\"{left:.1}\" y1=\"{top:.1}\" x2=\"{left:.1}\" y2=\"{bottom:.1}\" stroke=\"black\"/>\n"
        ));

        for i in 0..=TICKS {
            let t = i as f64 / TICKS as f64;
            let xv = self.x_min + t * (self.x_max - self.x_min);
            let yv = self.y_min + t * (self.y_max - self.y_min);
            let (px, py) = (self.x(xv), self.y(yv));
            out.push_str(&format!(
                "<line x1=\"{px:.1}\" y1=\"{bottom:.1}\" x2=\"{px:.1}\" y2=\"{:.1}\" stroke=\"black\"/>\
                 <text x=\"{px:.1}\" y=\"{:.1}\" text-anchor=\"middle\" font-size=\"11\">{xv:.1}</text>\n",
                bottom + 5.0,
                bottom + 18.0
            ));
            out.push_str(&format!(
                "<line x1=\"{:.1}\" y1=\"{py:.1}\" x2=\"{left:.1}\" y2=\"{py:.1}\" stroke=\"black\"/>\
                 <text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"end\" font-size=\"11\">{yv:.1}</text>\n",
                left - 5.0,
                left - 8.0,
                py + 4.0
            ));
        }

        out.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\" font-size=\"13\">{}</text>\n",
            left + Self::plot_width() / 2.0,
            HEIGHT - 20.0,
            escape_xml(x_label)
        ));
        out.push_str(&format!(
            "<text transform=\"translate(18 {:.1}) rotate(-90)\" text-anchor=\"middle\" font-size=\"13\">{}</text>\n",
            top + Self::plot_height() / 2.0,
            escape_xml(y_label)
        ));
    }
}

fn open_svg() -> String {
    format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{WIDTH}\" height=\"{HEIGHT}\" \
         viewBox=\"0 0 {WIDTH} {HEIGHT}\" font-family=\"sans-serif\">\n\
         <rect width=\"100%\" height=\"100%\" fill=\"white\"/>\n"
    )
}

/// Bar chart of the MODIS - VIIRS time difference in minutes, with a dashed
/// line at zero when zero lies inside the binned range.
pub fn histogram_svg(hist: &Histogram, label: &str) -> String {
    let frame = Frame {
        x_min: hist.start,
        x_max: hist.end(),
        y_min: 0.0,
        y_max: hist.max_count().max(1) as f64,
    };

    let mut out = open_svg();
    frame.axes(
        &mut out,
        &format!("{}: detection time difference (MODIS - VIIRS)", label),
        &format!("Minutes ({})", TIME_DIFF_AXIS_LABEL),
        "Matched pairs",
    );

    for (i, &count) in hist.counts.iter().enumerate() {
        if count == 0 {
            continue;
        }
        let (lower, upper) = hist.bin_edges(i);
        let (x0, x1) = (frame.x(lower), frame.x(upper));
        let top = frame.y(count as f64);
        out.push_str(&format!(
            "<rect class=\"bar\" x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" \
             fill=\"steelblue\" stroke=\"white\"><title>[{:.1}, {:.1}): {}</title></rect>\n",
            x0,
            top,
            (x1 - x0).max(0.5),
            frame.y(0.0) - top,
            lower,
            upper,
            count
        ));
    }

    if hist.start <= 0.0 && 0.0 <= hist.end() {
        let x = frame.x(0.0);
        out.push_str(&format!(
            "<line class=\"zero\" x1=\"{x:.1}\" y1=\"{MARGIN_TOP:.1}\" x2=\"{x:.1}\" y2=\"{:.1}\" \
             stroke=\"crimson\" stroke-dasharray=\"6 4\"/>\n",
            HEIGHT - MARGIN_BOTTOM
        ));
    }

    out.push_str("</svg>\n");
    out
}

/// Scatter plot of `(distance_km, time_diff_minutes)` per matched pair.
pub fn scatter_svg(points: &[(f64, f64)], label: &str) -> String {
    let (x_max, y_lo, y_hi) = points.iter().fold((0.0_f64, 0.0_f64, 0.0_f64), |(xm, lo, hi), &(x, y)| {
        (xm.max(x), lo.min(y), hi.max(y))
    });
    let y_pad = ((y_hi - y_lo) * 0.05).max(1.0);
    let frame = Frame {
        x_min: 0.0,
        x_max: if x_max > 0.0 { x_max * 1.05 } else { 1.0 },
        y_min: y_lo - y_pad,
        y_max: y_hi + y_pad,
    };

    let mut out = open_svg();
    frame.axes(
        &mut out,
        &format!("{}: time difference vs. distance", label),
        "Distance between matched detections (km)",
        &format!("Minutes ({})", TIME_DIFF_AXIS_LABEL),
    );

    let zero = frame.y(0.0);
    out.push_str(&format!(
        "<line class=\"zero\" x1=\"{MARGIN_LEFT:.1}\" y1=\"{zero:.1}\" x2=\"{:.1}\" y2=\"{zero:.1}\" \
         stroke=\"crimson\" stroke-dasharray=\"6 4\"/>\n",
        WIDTH - MARGIN_RIGHT
    ));

    for &(x, y) in points {
        out.push_str(&format!(
            "<circle class=\"point\" cx=\"{:.1}\" cy=\"{:.1}\" r=\"3\" fill=\"steelblue\" fill-opacity=\"0.6\"/>\n",
            frame.x(x),
            frame.y(y)
        ));
    }

    out.push_str("</svg>\n");
    out
}
