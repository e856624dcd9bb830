use std::fs;

use fpl_terminal::export::write_csv;
use fpl_terminal::state::TableRow;

#[test]
fn csv_quotes_multiline_and_comma_fields() {
    let rows = vec![TableRow {
        rank: 1,
        team: "Spin, Win".to_string(),
        manager: "Alex \"Ace\" Tan".to_string(),
        gw_total_points: 64,
        squad: "GKP: Keeper (6)\nMID: Wing (C) (24)".to_string(),
        analysis: "A very good week overall!".to_string(),
    }];

    let path = std::env::temp_dir().join("fpl_terminal_csv_test.csv");
    write_csv(&path, &rows).expect("csv write should succeed");
    let written = fs::read_to_string(&path).expect("csv should be readable");
    fs::remove_file(&path).ok();

    let mut lines = written.lines();
    assert_eq!(
        lines.next(),
        Some("Rank,Team,Manager,GW Total Points,Squad,Performance Analysis")
    );
    assert!(written.contains("\"Spin, Win\""));
    assert!(written.contains("\"Alex \"\"Ace\"\" Tan\""));
    assert!(written.contains("\"GKP: Keeper (6)\nMID: Wing (C) (24)\""));
    assert!(written.contains("A very good week overall!"));
}
