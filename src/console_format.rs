/// Console formatting module - Pure rendering concerns
///
/// This module handles all console output formatting including:
/// - Terminal width detection (with an override for tests and narrow pipes)
/// - Verdict blocks and the summary table
/// - Color terminal output
/// - Text truncation and padding
///
/// It accepts verdicts from the questions module and renders them.
///
/// ## Output Flexibility
///
/// This module supports writing to any `std::io::Write` destination:
/// - Console (stdout/stderr) with optional colors
/// - String buffers (for markdown)
/// - Files
use crate::types::Verdict;
use std::io::{self, Write};
use std::sync::OnceLock;
use term::color::Color;
use terminal_size::{Width, terminal_size};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Writer for verdict output - configurable for color/plain text
pub struct TableWriter<W: Write> {
    writer: W,
    use_colors: bool,
}

impl<W: Write> TableWriter<W> {
    /// Create a new table writer
    pub fn new(writer: W, use_colors: bool) -> Self {
        Self { writer, use_colors }
    }

    /// Write formatted text, optionally with color
    fn write_colored(&mut self, text: &str, color: Color) -> io::Result<()> {
        if self.use_colors {
            let code = if color < 8 { 30 + color } else { 90 + (color - 8) };
            write!(self.writer, "\x1b[1;{}m{}\x1b[0m", code, text)
        } else {
            write!(self.writer, "{}", text)
        }
    }

    /// Write the question heading
    pub fn write_question_heading(&mut self, label: &str, prompt: &str) -> io::Result<()> {
        let line = format!("{} · {}", label, prompt);
        writeln!(self.writer, "{}", line)?;
        writeln!(self.writer, "{}", "═".repeat(display_width(&line).min(get_console_width())))
    }

    /// Write a verdict in the two-line decision/finding form followed by a blank line
    pub fn write_verdict(&mut self, verdict: &Verdict) -> io::Result<()> {
        let color = if verdict.reject_null { term::color::BRIGHT_GREEN } else { term::color::BRIGHT_YELLOW };
        self.write_colored(verdict.decision(), color)?;
        writeln!(self.writer)?;
        writeln!(self.writer, "    {}", verdict.finding)?;
        writeln!(self.writer)
    }

    /// Write the numbers behind a verdict
    pub fn write_verdict_details(&mut self, verdict: &Verdict) -> io::Result<()> {
        for g in &verdict.groups {
            writeln!(self.writer, "    {:<12} n={:<6} mean={:.3}", g.label, g.n, g.mean)?;
        }
        if let Some(l) = &verdict.levene {
            writeln!(
                self.writer,
                "    Levene ({}): W={}  p={}",
                l.center,
                format_stat(l.statistic),
                format_p(l.p_value)
            )?;
        }
        if let Some(t) = &verdict.ttest {
            writeln!(
                self.writer,
                "    {}: t={}  df={:.2}  p(two-sided)={}  p(one-sided)={}",
                if t.equal_var { "Student" } else { "Welch" },
                format_stat(t.statistic),
                t.df,
                format_p(t.p_value),
                format_p(t.half_p())
            )?;
        }
        if let Some(s) = &verdict.spearman {
            writeln!(self.writer, "    Spearman: rho={}  p={}  n={}", format_stat(s.rho), format_p(s.p_value), s.n)?;
        }
        writeln!(self.writer, "    alpha = {}", verdict.alpha)?;
        writeln!(self.writer)
    }

    /// Write the summary table across all verdicts
    pub fn write_summary_table(&mut self, verdicts: &[Verdict]) -> io::Result<()> {
        let w = SummaryWidths::new(get_console_width());

        writeln!(self.writer, "┌{}┐", "─".repeat(w.total - 2))?;
        let title = "Hypothesis test summary";
        writeln!(self.writer, "│ {} │", truncate_with_padding(title, w.total - 4))?;
        writeln!(self.writer, "{}", w.rule('├', '┬', '┤'))?;
        self.write_row(&w, ["Question", "Test", "Statistic", "p-value", "Decision"], None)?;
        writeln!(self.writer, "{}", w.rule('├', '┼', '┤'))?;

        for v in verdicts {
            let decision = if v.reject_null { "reject H0" } else { "fail to reject" };
            let color = if v.reject_null { term::color::BRIGHT_GREEN } else { term::color::BRIGHT_YELLOW };
            self.write_row(
                &w,
                [v.question.label(), &v.test_name(), &format_stat(v.statistic()), &format_p(v.decision_p_value()), decision],
                Some(color),
            )?;
        }

        writeln!(self.writer, "{}", w.rule('└', '┴', '┘'))
    }

    fn write_row(&mut self, w: &SummaryWidths, cells: [&str; 5], color: Option<Color>) -> io::Result<()> {
        let widths = [w.question, w.test, w.statistic, w.p_value, w.decision];
        let displays: Vec<String> =
            cells.iter().zip(widths.iter()).map(|(cell, width)| truncate_with_padding(cell, width - 2)).collect();

        write!(self.writer, "│ {} │ {} │ {} │ {} │ ", displays[0], displays[1], displays[2], displays[3])?;
        match color {
            Some(c) => self.write_colored(&displays[4], c)?,
            None => write!(self.writer, "{}", displays[4])?,
        }
        writeln!(self.writer, " │")
    }
}

/// Column widths for the 5-column summary table
#[derive(Clone, Copy, Debug)]
pub struct SummaryWidths {
    pub question: usize,
    pub test: usize,
    pub statistic: usize,
    pub p_value: usize,
    pub decision: usize,
    pub total: usize, // Total table width including borders
}

impl SummaryWidths {
    pub fn new(terminal_width: usize) -> Self {
        // Borders: │ = 6 characters (1 before each column + 1 at end)
        let borders = 6;
        let question = 10;
        let statistic = 12;
        let p_value = 12;
        let decision = 18;
        let fixed = question + statistic + p_value + decision;

        // Test name gets remaining space, capped so wide terminals stay readable
        let available = terminal_width.saturating_sub(borders);
        let test = if available > fixed + 14 { (available - fixed).min(28) } else { 14 };

        let total = question + test + statistic + p_value + decision + borders;
        SummaryWidths { question, test, statistic, p_value, decision, total }
    }

    fn rule(&self, left: char, mid: char, right: char) -> String {
        format!(
            "{left}{}{mid}{}{mid}{}{mid}{}{mid}{}{right}",
            "─".repeat(self.question),
            "─".repeat(self.test),
            "─".repeat(self.statistic),
            "─".repeat(self.p_value),
            "─".repeat(self.decision),
        )
    }
}

/// Format a test statistic for display
pub fn format_stat(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v.is_infinite() {
        if v > 0.0 { "inf".to_string() } else { "-inf".to_string() }
    } else {
        format!("{:.4}", v)
    }
}

/// Format a p-value, switching to scientific notation for tiny values
pub fn format_p(p: f64) -> String {
    if p.is_nan() {
        "NaN".to_string()
    } else if p == 0.0 {
        "0".to_string()
    } else if p < 1e-4 {
        format!("{:.2e}", p)
    } else {
        format!("{:.4}", p)
    }
}

//
// Console width
//

static CONSOLE_WIDTH: OnceLock<usize> = OnceLock::new();

/// Override the detected console width (first call wins)
pub fn set_console_width(width: usize) {
    let _ = CONSOLE_WIDTH.set(width);
}

/// Console width: override if set, else the terminal's, else 120
pub fn get_console_width() -> usize {
    *CONSOLE_WIDTH.get_or_init(|| {
        if let Some((Width(w), _)) = terminal_size() {
            w as usize
        } else {
            120 // Default width
        }
    })
}

//
// Text Formatting Utilities
//

/// Count the display width of a string, accounting for wide Unicode characters
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncate and pad string to exact width
pub fn truncate_with_padding(s: &str, width: usize) -> String {
    let display_w = display_width(s);

    if display_w > width {
        let mut result = String::new();
        let mut current_width = 0;

        // Reserve space for "..."
        let target_width = if width >= 3 { width - 3 } else { width };

        for c in s.chars() {
            let c_width = UnicodeWidthChar::width(c).unwrap_or(1);

            if current_width + c_width > target_width {
                break;
            }

            result.push(c);
            current_width += c_width;
        }

        if width >= 3 {
            result.push_str("...");
            current_width += 3;
        }

        // Pad if needed
        if current_width < width {
            result.push_str(&" ".repeat(width - current_width));
        }

        result
    } else {
        let padding = width - display_w;
        format!("{}{}", s, " ".repeat(padding))
    }
}

/// Print the summary table to stdout
pub fn print_summary_table(verdicts: &[Verdict], use_colors: bool) {
    let mut writer = TableWriter::new(io::stdout(), use_colors);
    let _ = writer.write_summary_table(verdicts);
}

#[cfg(test)]
#[path = "console_format_test.rs"]
mod console_format_test;
