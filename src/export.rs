use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::summary::MatchReport;

pub struct ExportReport {
    pub goals: usize,
    pub players: usize,
}

pub fn default_export_path() -> PathBuf {
    env::var("SUMMARY_EXPORT_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("match_summary.xlsx"))
}

pub fn export_summary(path: &Path, report: &MatchReport) -> Result<ExportReport> {
    let mut workbook = Workbook::new();

    let result_rows = vec![
        vec!["Match Summary".to_string(), String::new()],
        vec![
            "Exported".to_string(),
            Local::now().format("%Y-%m-%d %H:%M").to_string(),
        ],
        vec![
            "Final score".to_string(),
            format!(
                "{} {} - {} {}",
                report.team_a.label, report.score_a, report.score_b, report.team_b.label
            ),
        ],
    ];
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Result")?;
        write_rows(sheet, &result_rows)?;
    }

    let mut goal_rows = vec![vec![
        "#".to_string(),
        "Team".to_string(),
        "Scorer".to_string(),
        "Assist".to_string(),
        "Time".to_string(),
    ]];
    for (idx, goal) in report.goals.iter().enumerate() {
        goal_rows.push(vec![
            (idx + 1).to_string(),
            goal.team_label.clone(),
            goal.scorer.clone(),
            goal.assister.clone().unwrap_or_default(),
            goal.clock.clone(),
        ]);
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Goals")?;
        write_rows(sheet, &goal_rows)?;
    }

    let mut player_rows = vec![vec![
        "Team".to_string(),
        "Player".to_string(),
        "Goals".to_string(),
        "Assists".to_string(),
    ]];
    for table in [&report.team_a, &report.team_b] {
        for row in &table.rows {
            player_rows.push(vec![
                table.label.clone(),
                row.name.clone(),
                row.goals.to_string(),
                row.assists.to_string(),
            ]);
        }
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Players")?;
        write_rows(sheet, &player_rows)?;
    }

    workbook
        .save(path)
        .with_context(|| format!("save workbook to {}", path.display()))?;

    Ok(ExportReport {
        goals: report.goals.len(),
        players: report.team_a.rows.len() + report.team_b.rows.len(),
    })
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
