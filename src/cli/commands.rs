use std::fmt::Write as _;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use serde::{Deserialize, Serialize};

use crate::app::App;
use crate::config::AppConfig;
use crate::markdown::{parse_markdown_with, MarkdownBlock};
use crate::notes::sample::{sample_notes, SHOWCASE_DOCUMENT};
use crate::notes::{DisplayItem, NoteCalendar, NoteList, NoteListBuilder, RawNote};
use crate::render::{render_outline, render_plain};
use crate::search::{filter_display_items, FilterOutcome};

#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Only show notes whose title contains this text (case-insensitive)
    #[arg(long, short)]
    pub query: Option<String>,
    /// Read notes from a JSON array or a TOML file with [[notes]] entries
    #[arg(long)]
    pub notes: Option<PathBuf>,
    /// Print the display items as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct RenderArgs {
    /// Markdown file to render (stdin when omitted; the showcase document
    /// when stdin is a terminal)
    #[arg()]
    pub file: Option<PathBuf>,
    /// Print the parsed blocks as JSON
    #[arg(long, conflicts_with = "outline")]
    pub json: bool,
    /// Print one `type content` line per block
    #[arg(long)]
    pub outline: bool,
}

#[derive(Debug, Deserialize)]
struct NotesFile {
    #[serde(default)]
    notes: Vec<RawNote>,
}

#[derive(Debug, Serialize)]
struct ListReport<'a> {
    query: &'a str,
    no_results: bool,
    skipped: usize,
    items: &'a [DisplayItem],
}

pub fn run_tui(config: Arc<AppConfig>) -> Result<()> {
    let list = build_list(&config.note_calendar()?, &sample_notes());
    let document = parse_markdown_with(SHOWCASE_DOCUMENT, &config.markdown_options());
    let mut app = App::new(config, list, document);
    app.run()
}

pub fn list_notes(config: &AppConfig, args: ListArgs) -> Result<()> {
    let output = run_list(&config.note_calendar()?, &args)?;
    print!("{output}");
    Ok(())
}

fn run_list(calendar: &NoteCalendar, args: &ListArgs) -> Result<String> {
    let raw = match &args.notes {
        Some(path) => load_raw_notes(path)?,
        None => sample_notes(),
    };
    let list = build_list(calendar, &raw);
    let query = args.query.as_deref().unwrap_or("");
    let outcome = filter_display_items(&list.items, query);

    if args.json {
        let report = ListReport {
            query,
            no_results: outcome.is_no_results(),
            skipped: list.rejected.len(),
            items: outcome.items(),
        };
        let mut json = serde_json::to_string_pretty(&report).context("serializing note list")?;
        json.push('\n');
        return Ok(json);
    }
    Ok(format_list(&list, &outcome, query))
}

fn build_list(calendar: &NoteCalendar, raw: &[RawNote]) -> NoteList {
    tracing::debug!(today = %calendar.today(), notes = raw.len(), "building note list");
    let list = NoteListBuilder::new(*calendar).build(raw);
    for rejected in &list.rejected {
        tracing::info!(%rejected, "note skipped");
    }
    list
}

fn format_list(list: &NoteList, outcome: &FilterOutcome, query: &str) -> String {
    if list.note_count() == 0 {
        return "No notes yet.\n".to_string();
    }
    let items = match outcome {
        FilterOutcome::NoResults => return format!("No results for \"{query}\".\n"),
        FilterOutcome::Items(items) => items,
    };
    let mut out = String::new();
    for (idx, item) in items.iter().enumerate() {
        match item {
            DisplayItem::Separator { label } => {
                if idx > 0 {
                    out.push('\n');
                }
                let _ = writeln!(&mut out, "{label}");
            }
            DisplayItem::Note(note) => {
                let _ = writeln!(&mut out, "  {:>8}  {}", note.display_time, note.title);
            }
        }
    }
    out
}

pub fn load_raw_notes(path: &Path) -> Result<Vec<RawNote>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading notes file {}", path.display()))?;
    let is_json = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if is_json {
        return serde_json::from_str(&raw)
            .with_context(|| format!("parsing JSON notes {}", path.display()));
    }
    let file: NotesFile =
        toml::from_str(&raw).with_context(|| format!("parsing TOML notes {}", path.display()))?;
    Ok(file.notes)
}

pub fn render_markdown(config: &AppConfig, args: RenderArgs) -> Result<()> {
    let text = match &args.file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("reading markdown {}", path.display()))?,
        None => read_stdin()?.unwrap_or_else(|| SHOWCASE_DOCUMENT.to_string()),
    };
    let blocks = parse_markdown_with(&text, &config.markdown_options());
    print!("{}", format_blocks(&blocks, &args)?);
    Ok(())
}

fn format_blocks(blocks: &[MarkdownBlock], args: &RenderArgs) -> Result<String> {
    if args.json {
        let mut json = serde_json::to_string_pretty(blocks).context("serializing blocks")?;
        json.push('\n');
        return Ok(json);
    }
    if args.outline {
        return Ok(render_outline(blocks));
    }
    Ok(render_plain(blocks))
}

fn read_stdin() -> Result<Option<String>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }
    let mut buf = String::new();
    io::stdin()
        .read_to_string(&mut buf)
        .context("reading markdown from stdin")?;
    Ok(Some(buf))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::parse_markdown;
    use tempfile::TempDir;
    use time::macros::date;

    type TestResult<T = ()> = Result<T>;

    fn mid_march() -> NoteCalendar {
        NoteCalendar::fixed(date!(2025 - 03 - 15))
    }

    fn write_fixture(dir: &TempDir, name: &str, body: &str) -> TestResult<PathBuf> {
        let path = dir.path().join(name);
        fs::write(&path, body).with_context(|| format!("writing {name}"))?;
        Ok(path)
    }

    #[test]
    fn list_reads_json_fixture_and_filters() -> TestResult {
        let temp = TempDir::new().context("creating temp dir")?;
        let path = write_fixture(
            &temp,
            "notes.json",
            r#"[
                {"title": "Jan retro", "date_text": "Jan 3, 9:00 AM", "icon_ref": "doc"},
                {"title": "Jan planning", "date_text": "Jan 3, 4:30 PM", "icon_ref": "doc"},
                {"title": "Feb kickoff", "date_text": "Feb 1, 10:15 AM", "icon_ref": "doc"}
            ]"#,
        )?;
        let args = ListArgs {
            query: Some("jan".into()),
            notes: Some(path),
            json: false,
        };
        let output = run_list(&mid_march(), &args)?;
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Fri 03 Jan");
        assert!(lines[1].ends_with("4:30 PM  Jan planning"));
        assert!(lines[2].ends_with("9:00 AM  Jan retro"));
        assert!(!output.contains("Feb kickoff"));
        Ok(())
    }

    #[test]
    fn list_reads_toml_fixture_and_reports_no_results() -> TestResult {
        let temp = TempDir::new().context("creating temp dir")?;
        let path = write_fixture(
            &temp,
            "notes.toml",
            "[[notes]]\ntitle = \"Standup\"\ndate = \"Mar 4, 9:05 AM\"\nis_custom_icon = true\n",
        )?;
        let args = ListArgs {
            query: Some("zzz".into()),
            notes: Some(path),
            json: false,
        };
        assert_eq!(run_list(&mid_march(), &args)?, "No results for \"zzz\".\n");
        Ok(())
    }

    #[test]
    fn list_distinguishes_empty_source() -> TestResult {
        let temp = TempDir::new().context("creating temp dir")?;
        let path = write_fixture(&temp, "empty.json", "[]")?;
        let args = ListArgs {
            query: Some("anything".into()),
            notes: Some(path),
            json: false,
        };
        assert_eq!(run_list(&mid_march(), &args)?, "No notes yet.\n");
        Ok(())
    }

    #[test]
    fn list_json_includes_skipped_count() -> TestResult {
        let args = ListArgs {
            json: true,
            ..ListArgs::default()
        };
        let output = run_list(&mid_march(), &args)?;
        let value: serde_json::Value = serde_json::from_str(&output)?;
        assert_eq!(value["no_results"], false);
        assert_eq!(value["skipped"], 1);
        assert_eq!(value["items"][0]["kind"], "separator");
        Ok(())
    }

    #[test]
    fn render_formats_outline_and_json() -> TestResult {
        let blocks = parse_markdown("## Agenda\n- [ ] Draft notes");
        let outline = format_blocks(
            &blocks,
            &RenderArgs {
                outline: true,
                ..RenderArgs::default()
            },
        )?;
        assert!(outline.starts_with("heading2"));
        assert!(outline.contains("task          [ ] Draft notes"));

        let json = format_blocks(
            &blocks,
            &RenderArgs {
                json: true,
                ..RenderArgs::default()
            },
        )?;
        let value: serde_json::Value = serde_json::from_str(&json)?;
        assert_eq!(value[1]["type"], "task");
        Ok(())
    }
}
