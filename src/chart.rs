/// Terminal chart rendering
///
/// Charts are built from plain data (so they can be unit tested) and then
/// drawn by `ChartWriter` into any `std::io::Write`:
/// - `Histogram` - grouped horizontal bars per integer bin, with mean markers
/// - `BoxPlot` - five-number summary per category on a shared axis
/// - `Scatter` - character grid with shaded glyphs and a horizontal rule
use crate::console_format::{display_width, truncate_with_padding};
use crate::stats::{mean, quantile_sorted, sorted};
use std::io::{self, Write};
use term::color::Color;

/// Colour used for a series when the writer has colours enabled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shade {
    DarkRed,
    Pink,
    Neutral,
}

impl Shade {
    fn color(&self) -> Option<Color> {
        match self {
            Shade::DarkRed => Some(term::color::RED),
            Shade::Pink => Some(term::color::BRIGHT_MAGENTA),
            Shade::Neutral => None,
        }
    }

    fn glyph(&self) -> char {
        match self {
            Shade::DarkRed => '█',
            Shade::Pink => '░',
            Shade::Neutral => '▒',
        }
    }
}

/// One group of values in a histogram
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub shade: Shade,
    pub values: Vec<f64>,
}

/// Vertical reference line drawn at a value
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub label: String,
    pub value: f64,
}

/// Most bins a histogram will draw; wider ranges get wider bins
pub const MAX_BINS: u64 = 60;

#[derive(Debug, Clone, PartialEq)]
pub struct HistBin {
    /// Inclusive lower edge; the bin covers [start, start + width)
    pub start: i64,
    /// One count per series
    pub counts: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub title: String,
    pub axis_label: String,
    pub series: Vec<Series>,
    /// Integer width shared by every bin
    pub bin_width: i64,
    pub bins: Vec<HistBin>,
    pub markers: Vec<Marker>,
}

impl Histogram {
    /// Bin every series into equal-width integer bins spanning all values.
    /// Bins are one unit wide unless that needs more than `MAX_BINS`.
    pub fn new(title: &str, axis_label: &str, series: Vec<Series>, markers: Vec<Marker>) -> Self {
        let all = series.iter().flat_map(|s| s.values.iter().copied());
        let (lo, hi) = all.fold((i64::MAX, i64::MIN), |(lo, hi), v| {
            let b = v.floor() as i64;
            (lo.min(b), hi.max(b))
        });

        let mut hist = Self {
            title: title.to_string(),
            axis_label: axis_label.to_string(),
            series,
            bin_width: 1,
            bins: Vec::new(),
            markers,
        };
        if lo > hi {
            return hist;
        }

        // i128 so that extreme values cannot overflow the span
        let span = (hi as i128 - lo as i128 + 1) as u128;
        let width = span.div_ceil(MAX_BINS as u128).max(1);
        let n_bins = span.div_ceil(width) as usize;
        hist.bin_width = width as i64;
        hist.bins = (0..n_bins)
            .map(|k| HistBin {
                start: (lo as i128 + k as i128 * width as i128) as i64,
                counts: vec![0; hist.series.len()],
            })
            .collect();

        for (si, s) in hist.series.iter().enumerate() {
            for v in &s.values {
                if let Some(idx) = bin_index(&hist.bins, hist.bin_width, *v) {
                    hist.bins[idx].counts[si] += 1;
                }
            }
        }
        hist
    }

    /// Index of the bin holding `value`, or None outside the binned range
    pub fn bin_of(&self, value: f64) -> Option<usize> {
        bin_index(&self.bins, self.bin_width, value)
    }

    /// Row label for a bin: its start, or its inclusive range for wide bins
    pub fn bin_label(&self, bin: &HistBin) -> String {
        if self.bin_width == 1 {
            bin.start.to_string()
        } else {
            format!("{}-{}", bin.start, bin.start as i128 + self.bin_width as i128 - 1)
        }
    }

    pub fn max_count(&self) -> usize {
        self.bins.iter().flat_map(|b| b.counts.iter().copied()).max().unwrap_or(0)
    }
}

fn bin_index(bins: &[HistBin], width: i64, value: f64) -> Option<usize> {
    let first = bins.first()?.start;
    if !value.is_finite() || width < 1 {
        return None;
    }
    let offset = value.floor() as i128 - first as i128;
    if offset < 0 {
        return None;
    }
    let idx = offset / width as i128;
    if idx < bins.len() as i128 { Some(idx as usize) } else { None }
}

/// Box-and-whisker summary of one category
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FiveNumber {
    pub n: usize,
    pub whisker_lo: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub whisker_hi: f64,
    /// Points beyond 1.5 * IQR from the box
    pub outliers: usize,
}

impl FiveNumber {
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let v = sorted(values);
        let q1 = quantile_sorted(&v, 0.25);
        let median = quantile_sorted(&v, 0.5);
        let q3 = quantile_sorted(&v, 0.75);
        let iqr = q3 - q1;
        let (fence_lo, fence_hi) = (q1 - 1.5 * iqr, q3 + 1.5 * iqr);

        let inside: Vec<f64> = v.iter().copied().filter(|x| *x >= fence_lo && *x <= fence_hi).collect();
        let whisker_lo = inside.first().copied().unwrap_or(q1);
        let whisker_hi = inside.last().copied().unwrap_or(q3);

        Some(Self { n: v.len(), whisker_lo, q1, median, q3, whisker_hi, outliers: v.len() - inside.len() })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoxRow {
    pub label: String,
    pub summary: FiveNumber,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoxPlot {
    pub title: String,
    pub category_label: String,
    pub value_label: String,
    pub rows: Vec<BoxRow>,
}

impl BoxPlot {
    /// Axis range covering every whisker
    pub fn range(&self) -> Option<(f64, f64)> {
        let lo = self.rows.iter().map(|r| r.summary.whisker_lo).fold(f64::INFINITY, f64::min);
        let hi = self.rows.iter().map(|r| r.summary.whisker_hi).fold(f64::NEG_INFINITY, f64::max);
        if lo.is_finite() && hi.is_finite() { Some((lo, hi)) } else { None }
    }
}

/// Horizontal rule across a scatter plot
#[derive(Debug, Clone, PartialEq)]
pub struct HRule {
    pub value: f64,
    pub above: String,
    pub below: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    /// Value used for shading (the "hue")
    pub z: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scatter {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub hue_label: String,
    pub points: Vec<Point>,
    /// Smallest y at the top when true
    pub invert_y: bool,
    pub rule: Option<HRule>,
}

/// Glyphs from lowest to highest hue bucket
pub const HUE_GLYPHS: [char; 3] = ['·', 'o', '●'];

impl Scatter {
    /// Tercile cut points of the hue values
    pub fn hue_cuts(&self) -> (f64, f64) {
        let z = sorted(&self.points.iter().map(|p| p.z).collect::<Vec<_>>());
        (quantile_sorted(&z, 1.0 / 3.0), quantile_sorted(&z, 2.0 / 3.0))
    }

    pub fn hue_bucket(&self, z: f64, cuts: (f64, f64)) -> usize {
        if z >= cuts.1 {
            2
        } else if z >= cuts.0 {
            1
        } else {
            0
        }
    }

    /// Rasterise into `rows` x `cols` cells holding the highest hue bucket
    /// plotted in each, or None for empty cells.
    pub fn grid(&self, rows: usize, cols: usize) -> Vec<Vec<Option<usize>>> {
        let mut cells = vec![vec![None; cols]; rows];
        if self.points.is_empty() || rows == 0 || cols == 0 {
            return cells;
        }
        let (x_lo, x_hi) = span(self.points.iter().map(|p| p.x));
        let (y_lo, y_hi) = span(self.points.iter().map(|p| p.y));
        let cuts = self.hue_cuts();

        for p in &self.points {
            let c = scale(p.x, x_lo, x_hi, cols);
            let mut r = scale(p.y, y_lo, y_hi, rows);
            if !self.invert_y {
                r = rows - 1 - r;
            }
            let bucket = self.hue_bucket(p.z, cuts);
            let cell = &mut cells[r][c];
            *cell = Some(cell.map_or(bucket, |b| b.max(bucket)));
        }
        cells
    }

    /// Grid row the rule falls on, if it is inside the y range
    pub fn rule_row(&self, rows: usize) -> Option<usize> {
        let rule = self.rule.as_ref()?;
        let (y_lo, y_hi) = span(self.points.iter().map(|p| p.y));
        if rows == 0 || rule.value < y_lo || rule.value > y_hi {
            return None;
        }
        let r = scale(rule.value, y_lo, y_hi, rows);
        Some(if self.invert_y { r } else { rows - 1 - r })
    }
}

fn span<I: Iterator<Item = f64>>(values: I) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)))
}

/// Map `v` in [lo, hi] onto a cell index in 0..n
fn scale(v: f64, lo: f64, hi: f64, n: usize) -> usize {
    if n <= 1 || hi <= lo {
        return 0;
    }
    let t = ((v - lo) / (hi - lo)).clamp(0.0, 1.0);
    ((t * (n - 1) as f64).round() as usize).min(n - 1)
}

/// Any chart the research questions produce
#[derive(Debug, Clone, PartialEq)]
pub enum Chart {
    Histogram(Histogram),
    BoxPlot(BoxPlot),
    Scatter(Scatter),
}

/// ANSI foreground escape for a `term` colour
fn ansi_fg(color: Color) -> String {
    if color < 8 { format!("\x1b[{}m", 30 + color) } else { format!("\x1b[{}m", 90 + (color - 8)) }
}

/// Writer for charts - configurable for color/plain text
pub struct ChartWriter<W: Write> {
    writer: W,
    use_colors: bool,
    width: usize,
}

impl<W: Write> ChartWriter<W> {
    pub fn new(writer: W, use_colors: bool, width: usize) -> Self {
        Self { writer, use_colors, width: width.max(40) }
    }

    fn write_colored(&mut self, text: &str, shade: Shade) -> io::Result<()> {
        match shade.color() {
            Some(color) if self.use_colors => write!(self.writer, "{}{}\x1b[0m", ansi_fg(color), text),
            _ => write!(self.writer, "{}", text),
        }
    }

    fn write_title(&mut self, title: &str) -> io::Result<()> {
        writeln!(self.writer, "{}", title)?;
        writeln!(self.writer, "{}", "━".repeat(display_width(title).min(self.width)))
    }

    pub fn write_chart(&mut self, chart: &Chart) -> io::Result<()> {
        match chart {
            Chart::Histogram(h) => self.write_histogram(h),
            Chart::BoxPlot(b) => self.write_box_plot(b),
            Chart::Scatter(s) => self.write_scatter(s),
        }
    }

    pub fn write_histogram(&mut self, hist: &Histogram) -> io::Result<()> {
        self.write_title(&hist.title)?;

        // Legend
        let labels: Vec<String> = hist.bins.iter().map(|b| hist.bin_label(b)).collect();
        let label_w = labels.iter().map(|l| display_width(l)).max().unwrap_or(0).max(7);

        write!(self.writer, "{:>w$} │ ", hist.axis_label, w = label_w)?;
        for s in &hist.series {
            self.write_colored(&s.shade.glyph().to_string().repeat(2), s.shade)?;
            write!(self.writer, " {}  ", s.label)?;
        }
        writeln!(self.writer)?;

        if hist.bins.is_empty() {
            writeln!(self.writer, "        │ (no data)")?;
            return Ok(());
        }

        let marker_room = hist.markers.iter().map(|m| display_width(&m.label) + 12).max().unwrap_or(0);
        let bar_room = self.width.saturating_sub(10 + label_w + marker_room).max(10);
        let max = hist.max_count().max(1);

        for (bi, bin) in hist.bins.iter().enumerate() {
            let markers: Vec<&Marker> = hist.markers.iter().filter(|m| hist.bin_of(m.value) == Some(bi)).collect();

            for (i, (series, count)) in hist.series.iter().zip(&bin.counts).enumerate() {
                let label = if i == 0 { labels[bi].as_str() } else { "" };
                let len = (count * bar_room).div_ceil(max);
                write!(self.writer, "{:>w$} │ ", label, w = label_w)?;
                self.write_colored(&series.shade.glyph().to_string().repeat(len), series.shade)?;
                write!(self.writer, " {}", count)?;
                if let Some(m) = markers.get(i) {
                    let pad = bar_room.saturating_sub(len);
                    write!(self.writer, "{}  ◀ {} ({:.2})", " ".repeat(pad), m.label, m.value)?;
                }
                writeln!(self.writer)?;
            }
        }
        writeln!(self.writer)
    }

    pub fn write_box_plot(&mut self, plot: &BoxPlot) -> io::Result<()> {
        self.write_title(&plot.title)?;

        let Some((lo, hi)) = plot.range() else {
            writeln!(self.writer, "(no data)")?;
            return Ok(());
        };

        let label_w = plot.rows.iter().map(|r| display_width(&r.label)).max().unwrap_or(0).max(display_width(&plot.category_label));
        let cols = self.width.saturating_sub(label_w + 3 + 18).max(20);

        writeln!(self.writer, "{} │ {}", truncate_with_padding(&plot.category_label, label_w), plot.value_label)?;
        for row in &plot.rows {
            let s = &row.summary;
            let mut line: Vec<char> = vec![' '; cols];
            let (wl, b1, md, b3, wh) = (
                scale(s.whisker_lo, lo, hi, cols),
                scale(s.q1, lo, hi, cols),
                scale(s.median, lo, hi, cols),
                scale(s.q3, lo, hi, cols),
                scale(s.whisker_hi, lo, hi, cols),
            );
            for c in line.iter_mut().take(wh + 1).skip(wl) {
                *c = '─';
            }
            for c in line.iter_mut().take(b3 + 1).skip(b1) {
                *c = '▒';
            }
            line[wl] = '├';
            line[wh] = '┤';
            line[md] = '┃';

            let rendered: String = line.into_iter().collect();
            write!(self.writer, "{} │ ", truncate_with_padding(&row.label, label_w))?;
            self.write_colored(rendered.trim_end(), Shade::DarkRed)?;
            let pad = cols - rendered.trim_end().chars().count();
            write!(self.writer, "{} n={}", " ".repeat(pad), s.n)?;
            if s.outliers > 0 {
                write!(self.writer, " +{} outliers", s.outliers)?;
            }
            writeln!(self.writer)?;
        }

        let lo_s = format!("{:.0}", lo);
        let hi_s = format!("{:.0}", hi);
        let gap = cols.saturating_sub(lo_s.len() + hi_s.len());
        writeln!(self.writer, "{} └{}", " ".repeat(label_w), "─".repeat(cols + 1))?;
        writeln!(self.writer, "{}   {}{}{}", " ".repeat(label_w), lo_s, " ".repeat(gap), hi_s)?;
        writeln!(self.writer)
    }

    pub fn write_scatter(&mut self, plot: &Scatter) -> io::Result<()> {
        self.write_title(&plot.title)?;

        if plot.points.is_empty() {
            writeln!(self.writer, "(no data)")?;
            return Ok(());
        }

        // Legend in the upper-left
        let (c1, c2) = plot.hue_cuts();
        writeln!(
            self.writer,
            "{}: {} < {:.0}   {} {:.0}-{:.0}   {} >= {:.0}",
            plot.hue_label, HUE_GLYPHS[0], c1, HUE_GLYPHS[1], c1, c2, HUE_GLYPHS[2], c2
        )?;

        let label_room = plot.rule.as_ref().map(|r| display_width(&r.above).max(display_width(&r.below)) + 2).unwrap_or(0);
        let cols = self.width.saturating_sub(8 + label_room).max(20);
        let rows = 20;
        let grid = plot.grid(rows, cols);
        let rule_row = plot.rule_row(rows);

        let (y_lo, y_hi) = span(plot.points.iter().map(|p| p.y));
        let (top, bottom) = if plot.invert_y { (y_lo, y_hi) } else { (y_hi, y_lo) };

        writeln!(self.writer, "{:>6}", plot.y_label)?;
        for (r, row) in grid.iter().enumerate() {
            let axis = if r == 0 {
                format!("{:>6.0}", top)
            } else if r == rows - 1 {
                format!("{:>6.0}", bottom)
            } else if Some(r) == rule_row {
                format!("{:>6.0}", plot.rule.as_ref().map(|h| h.value).unwrap_or(0.0))
            } else {
                " ".repeat(6)
            };
            write!(self.writer, "{} │", axis)?;

            for cell in row {
                match cell {
                    Some(b) => {
                        let shade = if *b == 2 { Shade::DarkRed } else if *b == 1 { Shade::Pink } else { Shade::Neutral };
                        self.write_colored(&HUE_GLYPHS[*b].to_string(), shade)?;
                    }
                    None if Some(r) == rule_row => write!(self.writer, "─")?,
                    None => write!(self.writer, " ")?,
                }
            }

            if let (Some(rule), Some(rr)) = (&plot.rule, rule_row) {
                if r + 1 == rr {
                    write!(self.writer, " {}", rule.above)?;
                } else if r == rr + 1 {
                    write!(self.writer, " {}", rule.below)?;
                }
            }
            writeln!(self.writer)?;
        }

        let (x_lo, x_hi) = span(plot.points.iter().map(|p| p.x));
        let lo_s = format!("{:.0}", x_lo);
        let hi_s = format!("{:.0}", x_hi);
        writeln!(self.writer, "{} └{}", " ".repeat(6), "─".repeat(cols))?;
        writeln!(
            self.writer,
            "{}  {}{}{}",
            " ".repeat(6),
            lo_s,
            " ".repeat(cols.saturating_sub(lo_s.len() + hi_s.len())),
            hi_s
        )?;
        writeln!(self.writer, "{}  {}", " ".repeat(6), plot.x_label)?;
        writeln!(self.writer)
    }
}

/// Render a chart to a plain string (no colours)
pub fn render_plain(chart: &Chart, width: usize) -> String {
    let mut buf = Vec::new();
    let mut writer = ChartWriter::new(&mut buf, false, width);
    let _ = writer.write_chart(chart);
    String::from_utf8_lossy(&buf).into_owned()
}

/// Mean marker for a series, skipped when the series is empty
pub fn mean_marker(label: &str, values: &[f64]) -> Option<Marker> {
    let m = mean(values);
    if m.is_nan() { None } else { Some(Marker { label: label.to_string(), value: m }) }
}
