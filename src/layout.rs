use crate::state::TableRow;

pub const TABLE_HEADERS: [&str; 6] = [
    "Rank",
    "Team",
    "Manager",
    "GW Total Points",
    "Squad",
    "Performance Analysis",
];

/// Layout constants, tunable rather than inlined. The defaults are the
/// empirical values the table was designed around.
#[derive(Debug, Clone)]
pub struct LayoutParams {
    /// Character width the analysis column wraps to.
    pub analysis_wrap_width: usize,
    /// Layout units per text line in the header row (headers render taller).
    pub header_line_weight: f64,
    /// Layout units per text line in a data row.
    pub data_line_weight: f64,
    /// Canvas height contributed by one layout unit.
    pub figure_height_scale: f64,
    /// Floor so very short row sets still render legibly.
    pub min_figure_height: f64,
    /// Fixed width fractions for the rank, team, manager and points columns.
    pub meta_col_widths: [f64; 4],
    /// Squad column's share of the width left after the metadata columns;
    /// the analysis column takes the rest.
    pub squad_share: f64,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            analysis_wrap_width: 35,
            header_line_weight: 1.8,
            data_line_weight: 1.0,
            figure_height_scale: 0.5,
            min_figure_height: 10.0,
            meta_col_widths: [0.04, 0.12, 0.12, 0.07],
            squad_share: 0.55,
        }
    }
}

/// Purely content-derived table geometry: both fraction lists sum to 1.0.
#[derive(Debug, Clone, Default)]
pub struct TableLayout {
    pub column_widths: Vec<f64>,
    /// Header first, then one entry per data row.
    pub row_heights: Vec<f64>,
    pub figure_height: f64,
}

/// Greedy word wrap at `width` characters. Words are never split; a word
/// longer than the width gets a line of its own.
pub fn wrap_text(text: &str, width: usize) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        if line.is_empty() {
            line.push_str(word);
        } else if line.chars().count() + 1 + word.chars().count() <= width {
            line.push(' ');
            line.push_str(word);
        } else {
            lines.push(std::mem::take(&mut line));
            line.push_str(word);
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines.join("\n")
}

pub fn line_count(text: &str) -> usize {
    text.matches('\n').count() + 1
}

/// The tallest cell decides a row's height in lines.
pub fn row_line_count(row: &TableRow) -> usize {
    row.cells()
        .iter()
        .map(|cell| line_count(cell))
        .max()
        .unwrap_or(1)
}

/// Wrap every row's analysis text in place. Run once before layout so line
/// counts see the wrapped form.
pub fn wrap_analysis(rows: &mut [TableRow], params: &LayoutParams) {
    for row in rows {
        row.analysis = wrap_text(&row.analysis, params.analysis_wrap_width);
    }
}

/// Compute proportional row heights and column widths from cell content.
///
/// Each row's unit height is its tallest cell's line count, weighted for the
/// header; relative heights divide by the total so they sum to exactly 1.0.
/// The header always contributes at least one weighted line, so the total is
/// never zero even for an empty row set.
pub fn compute_table_layout(rows: &[TableRow], params: &LayoutParams) -> TableLayout {
    let header_lines = TABLE_HEADERS
        .iter()
        .map(|h| line_count(h))
        .max()
        .unwrap_or(1);

    let mut unit_heights = Vec::with_capacity(rows.len() + 1);
    unit_heights.push(header_lines as f64 * params.header_line_weight);
    for row in rows {
        unit_heights.push(row_line_count(row) as f64 * params.data_line_weight);
    }

    let total_units: f64 = unit_heights.iter().sum();
    let row_heights = unit_heights.iter().map(|h| h / total_units).collect();

    let meta_total: f64 = params.meta_col_widths.iter().sum();
    let remainder = (1.0 - meta_total).max(0.0);
    let squad_width = remainder * params.squad_share;
    let mut column_widths = params.meta_col_widths.to_vec();
    column_widths.push(squad_width);
    column_widths.push(remainder - squad_width);

    TableLayout {
        column_widths,
        row_heights,
        figure_height: (total_units * params.figure_height_scale).max(params.min_figure_height),
    }
}
