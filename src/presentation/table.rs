use comfy_table::{presets::UTF8_HORIZONTAL_ONLY, Table};

use crate::coupling::CouplingPair;
use crate::legacy::LegacyHotspot;
use crate::score::{CommitScoreResult, FileScoreResult};

pub fn file_scores(results: &[FileScoreResult]) -> String {
    let mut t = Table::new();
    t.load_preset(UTF8_HORIZONTAL_ONLY)
        .set_header(vec!["Path", "Score"]);
    for r in results {
        t.add_row(vec![r.path.clone(), format!("{:.3}", r.score)]);
    }
    t.to_string()
}

pub fn commit_scores(results: &[CommitScoreResult]) -> String {
    let mut t = Table::new();
    t.load_preset(UTF8_HORIZONTAL_ONLY)
        .set_header(vec!["Commit", "Message", "Score", "Risk"]);
    for r in results {
        t.add_row(vec![
            r.commit_id.chars().take(10).collect::<String>(),
            r.short_message.clone(),
            format!("{:.3}", r.score),
            format!("{:?}", r.risk_level),
        ]);
    }
    t.to_string()
}

pub fn coupling_pairs(pairs: &[CouplingPair]) -> String {
    let mut t = Table::new();
    t.load_preset(UTF8_HORIZONTAL_ONLY)
        .set_header(vec!["File A", "File B", "Co-commits", "Jaccard", "Confidence", "Lift"]);
    for p in pairs {
        t.add_row(vec![
            p.file_a.clone(),
            p.file_b.clone(),
            p.co_commits.to_string(),
            format!("{:.3}", p.jaccard),
            format!("{:.3}", p.confidence),
            format!("{:.2}", p.lift),
        ]);
    }
    t.to_string()
}

pub fn legacy_hotspots(hotspots: &[LegacyHotspot]) -> String {
    let mut t = Table::new();
    t.load_preset(UTF8_HORIZONTAL_ONLY)
        .set_header(vec!["Path", "Score"]);
    for h in hotspots {
        t.add_row(vec![h.path.clone(), format!("{:.3}", h.score)]);
    }
    t.to_string()
}
