use crate::{
    api::{DurationBucket, Podcast, UploadReceipt},
    chat::{ChatMessage, Role},
    dashboard::ProjectCard,
    project::{ProjectView, Tab},
};
use std::fmt::Write;
use time::{
    OffsetDateTime, PrimitiveDateTime, format_description::well_known::Rfc3339,
    macros::format_description,
};

pub const GENERAL_OVERVIEW: &str = "General Overview";

pub const ABOUT: &str = "\
Podcast AI turns any PDF into a conversation.

  1. Create a project             pdfcast projects create --name \"Q4 report\"
  2. Upload its PDF               pdfcast upload --project <id> --file report.pdf
  3. Ask questions with citations pdfcast chat --project <id>
  4. Generate a podcast           pdfcast podcast generate --project <id> --duration short

Podcasts come in three lengths: short (3-5 min), medium (5-8 min), long (10-15 min).";

/// Backend timestamps arrive either as RFC 3339 or as naive ISO 8601 with
/// optional fractional seconds.
pub fn parse_timestamp(raw: &str) -> Option<PrimitiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(PrimitiveDateTime::new(dt.date(), dt.time()));
    }
    PrimitiveDateTime::parse(
        raw,
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]"),
    )
    .ok()
}

/// `Oct 19, 2026, 09:05 AM`; unparseable input is returned as is.
pub fn format_date(raw: &str) -> String {
    parse_timestamp(raw)
        .and_then(|dt| {
            dt.format(format_description!(
                "[month repr:short] [day padding:none], [year], [hour repr:12]:[minute] [period]"
            ))
            .ok()
        })
        .unwrap_or_else(|| raw.to_string())
}

/// `10/19/2026`; unparseable input is returned as is.
pub fn format_day(raw: &str) -> String {
    parse_timestamp(raw)
        .and_then(|dt| {
            dt.format(format_description!("[month padding:none]/[day padding:none]/[year]"))
                .ok()
        })
        .unwrap_or_else(|| raw.to_string())
}

pub fn duration_label(raw: &str) -> String {
    raw.parse::<DurationBucket>()
        .map(|d| d.label().to_string())
        .unwrap_or_else(|_| raw.to_string())
}

pub fn podcast_title(p: &Podcast) -> &str {
    p.topic
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .unwrap_or(GENERAL_OVERVIEW)
}

pub fn project_cards(cards: &[ProjectCard]) -> String {
    if cards.is_empty() {
        return "No projects yet. Create your first project to upload a PDF and start \
                generating podcasts or asking questions."
            .to_string();
    }
    let mut out = String::new();
    for c in cards {
        let _ = writeln!(out, "{}  {}", c.id, c.name);
        let _ = writeln!(
            out,
            "    {} | created {} | {} podcast(s)",
            c.file_name, c.created_at, c.podcast_count
        );
    }
    out
}

pub fn project_view(name: &str, view: ProjectView) -> String {
    match view {
        ProjectView::Loading => format!("{name}\n  loading..."),
        ProjectView::NeedsUpload => format!(
            "{name}\n  No PDF yet. Upload one (PDF format only, maximum 50MB):\n  \
             pdfcast upload --project <id> --file <path.pdf>"
        ),
        ProjectView::Ready { tab } => {
            let (chat, podcast) = match tab {
                Tab::Chat => ("[Chat]", "Podcast"),
                Tab::Podcast => ("Chat", "[Podcast]"),
            };
            format!("{name}\n  {chat}  {podcast}")
        }
    }
}

pub fn upload_receipt(r: &UploadReceipt) -> String {
    format!(
        "{} is ready for chat and podcast generation ({} pages, {} chunks, {} words)",
        r.filename, r.total_pages, r.total_chunks, r.word_count
    )
}

pub fn chat_message(m: &ChatMessage) -> String {
    let who = match m.role {
        Role::User => "you",
        Role::Assistant => "assistant",
    };
    let mut out = format!("{who}> {}\n", m.content);
    if !m.references.is_empty() {
        out.push_str("  Sources:\n");
        for r in &m.references {
            let _ = writeln!(out, "    [p.{}] {}", r.page, r.text_preview);
        }
    }
    out
}

pub fn podcast_list(podcasts: &[Podcast], selected: usize, audio_url: impl Fn(&str) -> String) -> String {
    if podcasts.is_empty() {
        return "No podcasts generated yet.".to_string();
    }
    let mut out = format!("Generated Podcasts ({})\n", podcasts.len());
    for (i, p) in podcasts.iter().enumerate() {
        let marker = if i == selected { '>' } else { ' ' };
        let _ = writeln!(
            out,
            "{marker} {i}. {} | {} | {} | {} segments",
            podcast_title(p),
            format_date(&p.created_at),
            duration_label(&p.duration),
            p.segments_count
        );
        if i == selected {
            let _ = writeln!(out, "    audio: {}", audio_url(&p.audio_filename));
            out.push_str("    script:\n");
            for line in p.script.lines() {
                let _ = writeln!(out, "      {line}");
            }
        }
    }
    out
}
