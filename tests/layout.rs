use fpl_terminal::layout::{
    LayoutParams, compute_table_layout, line_count, row_line_count, wrap_analysis, wrap_text,
};
use fpl_terminal::state::TableRow;

fn row(rank: u32, squad: &str, analysis: &str) -> TableRow {
    TableRow {
        rank,
        team: format!("Team {rank}"),
        manager: format!("Manager {rank}"),
        gw_total_points: 50,
        squad: squad.to_string(),
        analysis: analysis.to_string(),
    }
}

#[test]
fn short_string_wraps_to_single_line() {
    let wrapped = wrap_text("short text", 35);
    assert_eq!(wrapped, "short text");
    assert!(!wrapped.contains('\n'));
}

#[test]
fn wrapping_never_splits_words() {
    let text = "Captain Wing (24 pts) was excellent! Supported by Striker (11 pts). \
                A very good week overall!";
    let wrapped = wrap_text(text, 20);
    for line in wrapped.lines() {
        assert!(line.chars().count() <= 20, "line too long: {line:?}");
    }
    let original: Vec<&str> = text.split_whitespace().collect();
    let rewrapped: Vec<&str> = wrapped.split_whitespace().collect();
    assert_eq!(original, rewrapped);
}

#[test]
fn word_longer_than_width_gets_its_own_line() {
    let wrapped = wrap_text("a extraordinarily-long-team-name b", 10);
    let lines: Vec<&str> = wrapped.lines().collect();
    assert_eq!(lines, vec!["a", "extraordinarily-long-team-name", "b"]);
}

#[test]
fn empty_string_is_one_line() {
    assert_eq!(wrap_text("", 35), "");
    assert_eq!(line_count(""), 1);
    assert_eq!(line_count("no breaks"), 1);
    assert_eq!(line_count("two\nlines"), 2);
}

#[test]
fn row_heights_sum_to_one() {
    let params = LayoutParams::default();
    let rows = vec![
        row(1, "GKP: Keeper (6)\nDEF: Back (2)", "a short note"),
        row(2, "GKP: Keeper (6)", "another note\nwith a second line"),
        row(3, "one line", ""),
    ];
    let layout = compute_table_layout(&rows, &params);
    assert_eq!(layout.row_heights.len(), 4);
    let total: f64 = layout.row_heights.iter().sum();
    assert!((total - 1.0).abs() < 1e-9);
    assert!(layout.row_heights.iter().all(|h| h.is_finite() && *h > 0.0));
}

#[test]
fn header_row_is_weighted_taller() {
    let params = LayoutParams::default();
    let rows = vec![row(1, "one line", "one line")];
    let layout = compute_table_layout(&rows, &params);
    // 1.8 header units over 2.8 total.
    assert!((layout.row_heights[0] - 1.8 / 2.8).abs() < 1e-9);
    assert!((layout.row_heights[1] - 1.0 / 2.8).abs() < 1e-9);
}

#[test]
fn taller_cells_get_proportionally_taller_rows() {
    let params = LayoutParams::default();
    let rows = vec![
        row(1, "a\nb\nc", "x"),
        row(2, "a", "x"),
    ];
    let layout = compute_table_layout(&rows, &params);
    assert!((layout.row_heights[1] / layout.row_heights[2] - 3.0).abs() < 1e-9);
}

#[test]
fn column_widths_sum_to_one_and_favor_squad() {
    let params = LayoutParams::default();
    let layout = compute_table_layout(&[row(1, "s", "a")], &params);
    assert_eq!(layout.column_widths.len(), 6);
    let total: f64 = layout.column_widths.iter().sum();
    assert!((total - 1.0).abs() < 1e-9);
    assert!(layout.column_widths[4] > layout.column_widths[5]);
}

#[test]
fn empty_row_set_does_not_divide_by_zero() {
    let params = LayoutParams::default();
    let layout = compute_table_layout(&[], &params);
    assert_eq!(layout.row_heights, vec![1.0]);
    assert_eq!(layout.figure_height, params.min_figure_height);
}

#[test]
fn figure_height_floor_applies_to_short_tables() {
    let params = LayoutParams::default();
    let short = compute_table_layout(&[row(1, "s", "a")], &params);
    assert_eq!(short.figure_height, params.min_figure_height);

    let tall_rows: Vec<TableRow> = (1..=30)
        .map(|i| row(i, "a\nb\nc\nd", "one line"))
        .collect();
    let tall = compute_table_layout(&tall_rows, &params);
    // 30 rows * 4 lines + 1.8 header units, scaled by 0.5.
    assert!((tall.figure_height - 60.9).abs() < 1e-9);
}

#[test]
fn wrap_analysis_bounds_the_analysis_column() {
    let mut params = LayoutParams::default();
    params.analysis_wrap_width = 18;
    let mut rows = vec![row(
        1,
        "squad",
        "Captain Wing (24 pts) was excellent! A very good week overall!",
    )];
    wrap_analysis(&mut rows, &params);
    assert!(rows[0].analysis.contains('\n'));
    assert!(rows[0].analysis.lines().all(|l| l.chars().count() <= 18));
    assert_eq!(row_line_count(&rows[0]), rows[0].analysis.lines().count());
}
