//! Run detection and pill geometry
//!
//! This is the heart of the rendering model: within one week row, maximal spans of
//! contiguous, in-month, same-colored days are fused into a single "pill", the one
//! element the host UI actually draws over the cells. Pills carry their own pixel
//! geometry, computed purely from column indices and a configured [`GridLayout`], so no
//! rendering backend ever needs to be measured.

use std::ops::RangeInclusive;

/// Horizontal geometry of a week row: uniform cell width and inter-cell gutter.
/// Cell `c` starts at `c * (cell_width + gutter)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridLayout {
    pub cell_width: f32,
    pub gutter: f32,
}

impl GridLayout {
    pub fn new(cell_width: f32, gutter: f32) -> Self {
        Self { cell_width, gutter }
    }

    /// The pixel span covering columns `first..=last`
    pub fn span(&self, first_col: usize, last_col: usize) -> PixelSpan {
        let left = first_col as f32 * (self.cell_width + self.gutter);
        let right = last_col as f32 * (self.cell_width + self.gutter) + self.cell_width;
        PixelSpan { left, width: right - left }
    }
}

impl Default for GridLayout {
    fn default() -> Self {
        Self { cell_width: 22.0, gutter: 2.0 }
    }
}

/// An offset-and-width pair, in pixels, relative to the left edge of the row
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PixelSpan {
    pub left: f32,
    pub width: f32,
}

/// The cell height that keeps 12 months visible in a viewport: the original layout
/// stacks the months in 4 rows and clamps cells between 20 and 42 pixels.
pub fn adaptive_cell_height(viewport_height: f32, toolbar_height: f32) -> f32 {
    let available = (viewport_height - toolbar_height - 90.0).max(320.0);
    let per_month = available / 4.0;
    ((per_month - 34.0) / 7.0).floor().clamp(20.0, 42.0)
}

/// One week-row cell, with its day data already resolved from the document
#[derive(Clone, Debug, Default)]
pub struct RowCell {
    pub in_month: bool,
    pub color: Option<String>,
    pub note: Option<String>,
}

/// A maximal run of contiguous, in-month, same-colored cells, rendered as one element.
///
/// A single colored day with no same-color neighbour is a run of length 1: it gets a
/// pill like any longer run would.
#[derive(Clone, Debug, PartialEq)]
pub struct Pill {
    first_col: usize,
    last_col: usize,
    color: String,
    label: String,
    text_color: &'static str,
    span: PixelSpan,
}

impl Pill {
    pub fn color(&self) -> &str {
        &self.color
    }

    /// The first non-empty, trimmed note among the member cells (empty when none has one)
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The text color that stays readable on this pill's background
    pub fn text_color(&self) -> &'static str {
        self.text_color
    }

    pub fn span(&self) -> PixelSpan {
        self.span
    }

    /// The columns this pill covers. The host suppresses the numeric day label of these
    /// cells while the pill is shown (the data model keeps the numbers, only their
    /// rendering is hidden).
    pub fn columns(&self) -> RangeInclusive<usize> {
        self.first_col..=self.last_col
    }

    pub fn covers(&self, col: usize) -> bool {
        self.first_col <= col && col <= self.last_col
    }

    pub fn len(&self) -> usize {
        self.last_col - self.first_col + 1
    }
}

/// Derive the pills of one week row.
///
/// A single left-to-right scan: a run starts on an in-month colored cell, and extends
/// while the following cells are in-month and share the exact same color value (string
/// equality). An out-of-month cell, an uncolored cell or a color change all end the run.
/// The produced pills never overlap.
pub fn compose_row(cells: &[RowCell], layout: &GridLayout) -> Vec<Pill> {
    let mut pills = Vec::new();
    let mut i = 0;
    while i < cells.len() {
        if !cells[i].in_month {
            i += 1;
            continue;
        }
        let color = match &cells[i].color {
            Some(color) => color.clone(),
            None => {
                i += 1;
                continue;
            }
        };
        let mut j = i + 1;
        while j < cells.len() && cells[j].in_month && cells[j].color.as_deref() == Some(color.as_str()) {
            j += 1;
        }

        let label = cells[i..j].iter()
            .filter_map(|c| c.note.as_deref())
            .map(str::trim)
            .find(|n| !n.is_empty())
            .unwrap_or("")
            .to_string();

        pills.push(Pill {
            first_col: i,
            last_col: j - 1,
            text_color: pick_text_color(&color),
            span: layout.span(i, j - 1),
            color,
            label,
        });
        i = j;
    }
    pills
}

/// Near-black on light backgrounds, white on dark ones (YIQ cutoff).
/// Colors that do not parse get the near-black default.
pub fn pick_text_color(background: &str) -> &'static str {
    let color = match csscolorparser::parse(background) {
        Ok(color) => color,
        Err(_) => return "#111",
    };
    let yiq = (color.r * 299.0 + color.g * 587.0 + color.b * 114.0) * 255.0 / 1000.0;
    if yiq >= 150.0 { "#111" } else { "#fff" }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn cell(in_month: bool, color: Option<&str>, note: Option<&str>) -> RowCell {
        RowCell {
            in_month,
            color: color.map(str::to_string),
            note: note.map(str::to_string),
        }
    }

    fn colored(color: &str) -> RowCell {
        cell(true, Some(color), None)
    }

    fn plain() -> RowCell {
        cell(true, None, None)
    }

    fn outside() -> RowCell {
        cell(false, None, None)
    }

    fn layout() -> GridLayout {
        GridLayout::new(20.0, 2.0)
    }

    #[test]
    fn uniform_row_is_one_pill() {
        let row: Vec<_> = (0..7).map(|_| colored("#ABC")).collect();
        let pills = compose_row(&row, &layout());
        assert_eq!(pills.len(), 1);
        assert_eq!(pills[0].columns(), 0..=6);
        assert_eq!(pills[0].len(), 7);
    }

    #[test]
    fn distinct_colors_are_distinct_pills() {
        let colors = ["#0", "#1", "#2", "#3", "#4", "#5", "#6"];
        let row: Vec<_> = colors.iter().map(|c| colored(c)).collect();
        let pills = compose_row(&row, &layout());
        assert_eq!(pills.len(), 7);
        for (i, pill) in pills.iter().enumerate() {
            assert_eq!(pill.columns(), i..=i);
            assert_eq!(pill.color(), colors[i]);
        }
    }

    #[test]
    fn gaps_break_runs_even_when_color_resumes() {
        let row = vec![colored("#A"), colored("#A"), plain(), colored("#A"), plain(), plain(), plain()];
        let pills = compose_row(&row, &layout());
        assert_eq!(pills.len(), 2);
        assert_eq!(pills[0].columns(), 0..=1);
        assert_eq!(pills[1].columns(), 3..=3);
    }

    #[test]
    fn out_of_month_cells_break_runs() {
        let row = vec![outside(), colored("#A"), colored("#A"), plain(), plain(), plain(), outside()];
        let pills = compose_row(&row, &layout());
        assert_eq!(pills.len(), 1);
        assert_eq!(pills[0].columns(), 1..=2);
    }

    #[test]
    fn pills_never_overlap() {
        let row = vec![colored("#A"), colored("#B"), colored("#B"), plain(), colored("#A"), colored("#A"), colored("#C")];
        let pills = compose_row(&row, &layout());
        for pair in pills.windows(2) {
            assert!(pair[0].columns().end() < pair[1].columns().start());
        }
    }

    #[test]
    fn label_is_first_nonempty_note() {
        let row = vec![
            cell(true, Some("#A"), None),
            cell(true, Some("#A"), Some("   ")),
            cell(true, Some("#A"), Some("trip")),
            cell(true, Some("#A"), Some("ignored")),
            plain(), plain(), plain(),
        ];
        let pills = compose_row(&row, &layout());
        assert_eq!(pills[0].label(), "trip");
    }

    #[test]
    fn label_is_empty_without_notes() {
        let pills = compose_row(&[colored("#A")], &layout());
        assert_eq!(pills[0].label(), "");
    }

    #[test]
    fn span_covers_first_to_last_cell() {
        let row = vec![plain(), colored("#A"), colored("#A"), colored("#A"), plain(), plain(), plain()];
        let pills = compose_row(&row, &layout());
        let span = pills[0].span();
        // columns 1..=3 with 20px cells and 2px gutters
        assert_eq!(span.left, 22.0);
        assert_eq!(span.width, 64.0);
    }

    #[test]
    fn text_color_follows_background_luma() {
        assert_eq!(pick_text_color("#FFB3BA"), "#111");
        assert_eq!(pick_text_color("#000000"), "#fff");
        assert_eq!(pick_text_color("#fff"), "#111");
        assert_eq!(pick_text_color("rgb(20, 20, 60)"), "#fff");
        assert_eq!(pick_text_color("not-a-color"), "#111");
    }

    #[test]
    fn adaptive_height_clamps() {
        assert_eq!(adaptive_cell_height(300.0, 100.0), 20.0);
        assert_eq!(adaptive_cell_height(4000.0, 100.0), 42.0);
        let mid = adaptive_cell_height(1200.0, 120.0);
        assert!(mid >= 20.0 && mid <= 42.0);
    }
}
