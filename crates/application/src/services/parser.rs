//! Parsers for structured text the providers emit
//!
//! The prompt templates pin down a labeled line format (`SEGMENT n:`,
//! `TITLES:` / `THUMBNAILS:`, `SHORT n:` with section labels). These parsers
//! walk the output line by line and tolerate stray prose around the blocks.

use domain::{ScriptDraft, ScriptSegment, ShortClip, TitleSet};

/// Case-insensitive label strip: `strip_label("HOOK: text", "hook:")`
fn strip_label<'a>(line: &'a str, label: &str) -> Option<&'a str> {
    let prefix = line.get(..label.len())?;
    if prefix.eq_ignore_ascii_case(label) {
        line.get(label.len()..).map(str::trim_start)
    } else {
        None
    }
}

/// `SHORT 3: Title` → `Some("Title")`
fn short_header(line: &str) -> Option<&str> {
    let rest = strip_label(line, "short")?;
    let digits = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
    if digits == 0 {
        return None;
    }
    rest.get(digits..)?.trim_start().strip_prefix(':').map(str::trim)
}

/// `SEGMENT 2: Title` → `Some("Title")`; tolerates a missing number
fn segment_header(line: &str) -> Option<&str> {
    let rest = strip_label(line, "segment")?;
    rest.split_once(':').map(|(_, title)| title.trim())
}

/// Parse a long-form script into titled segments
///
/// Output without any `SEGMENT` marker becomes a single untitled segment, so
/// a model that ignores the sectioning instruction still yields a usable
/// draft.
pub fn parse_script(theme: &str, raw: &str) -> ScriptDraft {
    let mut segments: Vec<ScriptSegment> = Vec::new();
    let mut current_title: Option<String> = None;
    let mut current_content: Vec<&str> = Vec::new();

    let mut flush =
        |title: Option<String>, content: &mut Vec<&str>, segments: &mut Vec<ScriptSegment>| {
            let body = content.join(" ").trim().to_string();
            content.clear();
            if let Some(title) = title {
                if !body.is_empty() {
                    segments.push(ScriptSegment {
                        title,
                        content: body,
                    });
                }
            }
        };

    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(title) = segment_header(line) {
            flush(current_title.take(), &mut current_content, &mut segments);
            current_title = Some(if title.is_empty() {
                format!("Part {}", segments.len() + 1)
            } else {
                title.to_string()
            });
        } else {
            current_content.push(line);
        }
    }

    // Trailing segment, or the whole text when no marker was emitted
    if current_title.is_some() {
        flush(current_title.take(), &mut current_content, &mut segments);
    } else if segments.is_empty() && !current_content.is_empty() {
        let body = current_content.join(" ").trim().to_string();
        if !body.is_empty() {
            segments.push(ScriptSegment {
                title: "Part 1".to_string(),
                content: body,
            });
        }
    }

    ScriptDraft::from_segments(theme, segments)
}

/// Parse `TITLES:` / `THUMBNAILS:` numbered lists, capping each at `options`
pub fn parse_title_set(raw: &str, options: u8) -> TitleSet {
    #[derive(PartialEq)]
    enum Section {
        None,
        Titles,
        Thumbnails,
    }

    let mut set = TitleSet::default();
    let mut section = Section::None;
    let cap = options as usize;

    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if strip_label(line, "titles:").is_some() || line.eq_ignore_ascii_case("titles") {
            section = Section::Titles;
        } else if strip_label(line, "thumbnails:").is_some()
            || line.eq_ignore_ascii_case("thumbnails")
        {
            section = Section::Thumbnails;
        } else if let Some((number, content)) = line.split_once(". ") {
            if number.chars().all(|c| c.is_ascii_digit()) && !number.is_empty() {
                let content = content.trim().to_string();
                match section {
                    Section::Titles if set.titles.len() < cap => set.titles.push(content),
                    Section::Thumbnails if set.thumbnails.len() < cap => {
                        set.thumbnails.push(content);
                    }
                    _ => {}
                }
            }
        }
    }

    set
}

/// Parse `SHORT n:` blocks into clips, capping at `expected`
pub fn parse_short_clips(raw: &str, expected: u8) -> Vec<ShortClip> {
    #[derive(Clone, Copy, PartialEq)]
    enum Section {
        None,
        Hook,
        Script,
        Caption,
    }

    let mut clips: Vec<ShortClip> = Vec::new();
    let mut current: Option<ShortClip> = None;
    let mut section = Section::None;

    let mut finish = |clip: Option<ShortClip>, clips: &mut Vec<ShortClip>| {
        if let Some(clip) = clip {
            if clip.is_usable() {
                clips.push(clip);
            }
        }
    };

    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(title) = short_header(line) {
            finish(current.take(), &mut clips);
            section = Section::None;
            current = Some(ShortClip {
                title: title.to_string(),
                hook: String::new(),
                script: String::new(),
                caption: String::new(),
                hashtags: Vec::new(),
            });
            continue;
        }

        let Some(clip) = current.as_mut() else {
            continue; // preamble before the first SHORT marker
        };

        if let Some(value) = strip_label(line, "hook:") {
            section = Section::Hook;
            clip.hook = value.to_string();
        } else if let Some(value) = strip_label(line, "script:") {
            section = Section::Script;
            clip.script = value.to_string();
        } else if let Some(value) = strip_label(line, "caption:") {
            section = Section::Caption;
            clip.caption = value.to_string();
        } else if let Some(value) = strip_label(line, "hashtags:") {
            section = Section::None;
            clip.hashtags = value
                .split_whitespace()
                .filter(|tag| tag.starts_with('#'))
                .map(ToString::to_string)
                .collect();
        } else if line == "---" {
            finish(current.take(), &mut clips);
            section = Section::None;
        } else {
            // Continuation of the current section
            let target = match section {
                Section::Hook => Some(&mut clip.hook),
                Section::Script => Some(&mut clip.script),
                Section::Caption => Some(&mut clip.caption),
                Section::None => None,
            };
            if let Some(target) = target {
                if !target.is_empty() {
                    target.push(' ');
                }
                target.push_str(line);
            }
        }
    }

    finish(current.take(), &mut clips);
    clips.truncate(expected as usize);
    clips
}
