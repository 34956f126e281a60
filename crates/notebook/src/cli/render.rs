use chrono::{DateTime, Utc};
use notebookapp::model::DocumentMeta;
use notebookapp::store::DoctorReport;
use std::time::Duration;
use unicode_width::UnicodeWidthStr;

const SHORT_ID_LEN: usize = 8;

fn short_id(id: &str) -> &str {
    match id.char_indices().nth(SHORT_ID_LEN) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}

fn relative_time(meta: &DocumentMeta, now: DateTime<Utc>) -> String {
    match meta.modified_at() {
        Some(modified) => {
            let elapsed = (now - modified).to_std().unwrap_or(Duration::ZERO);
            timeago::Formatter::new().convert(elapsed)
        }
        None => "unknown".to_string(),
    }
}

pub fn render_list(metas: &[DocumentMeta], now: DateTime<Utc>) -> String {
    if metas.is_empty() {
        return "No documents.\n".to_string();
    }

    let name_width = metas
        .iter()
        .map(|meta| meta.name.width())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for meta in metas {
        let pad = name_width - meta.name.width();
        out.push_str(&format!(
            "{}  {}{}  {}\n",
            short_id(&meta.id),
            meta.name,
            " ".repeat(pad),
            relative_time(meta, now)
        ));
    }
    out
}

pub fn render_saved(meta: &DocumentMeta) -> String {
    format!("Saved {} ({})\n", meta.name, meta.id)
}

pub fn render_doctor(report: &DoctorReport) -> String {
    if report.is_clean() {
        return "Store is healthy.\n".to_string();
    }
    let mut out = String::new();
    let lines = [
        (report.recovered_documents, "document(s) recovered"),
        (report.removed_incomplete, "incomplete entr(ies) removed"),
        (report.removed_empty, "empty entr(ies) removed"),
        (report.removed_temp_files, "temp file(s) removed"),
        (report.unreadable, "unreadable entr(ies) left in place"),
    ];
    for (count, label) in lines {
        if count > 0 {
            out.push_str(&format!("{} {}\n", count, label));
        }
    }
    out
}
