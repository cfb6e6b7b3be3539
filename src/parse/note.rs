use std::ops::Range;

/// A day note as a raw line array with a heading outline on top.
///
/// Untouched lines serialize back byte-identically; structural edits only
/// ever splice whole lines. This is what keeps heading-scoped insertions
/// from corrupting unrelated markup elsewhere in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    lines: Vec<String>,
    trailing_newline: bool,
}

/// One heading in the outline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// 1–6
    pub level: usize,
    /// Text after the `#`s, trimmed
    pub text: String,
    /// Line index in the note
    pub line: usize,
}

impl Note {
    pub fn parse(text: &str) -> Note {
        Note {
            lines: text.lines().map(|l| l.to_string()).collect(),
            trailing_newline: text.ends_with('\n'),
        }
    }

    /// Verbatim serialization: join plus the source's trailing newline
    pub fn serialize(&self) -> String {
        if self.lines.is_empty() {
            return String::new();
        }
        let mut out = self.lines.join("\n");
        if self.trailing_newline {
            out.push('\n');
        }
        out
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn insert_lines(&mut self, at: usize, lines: &[String]) {
        let at = at.min(self.lines.len());
        self.lines.splice(at..at, lines.iter().cloned());
    }

    pub fn replace_lines(&mut self, range: Range<usize>, replacement: Vec<String>) {
        let start = range.start.min(self.lines.len());
        let end = range.end.clamp(start, self.lines.len());
        self.lines.splice(start..end, replacement);
    }

    /// All headings in the note, in order. Lines inside fenced code blocks
    /// are never headings.
    pub fn headings(&self) -> Vec<Heading> {
        let mut headings = Vec::new();
        let mut in_fence = false;
        for (idx, line) in self.lines.iter().enumerate() {
            if is_fence_delimiter(line) {
                in_fence = !in_fence;
                continue;
            }
            if in_fence {
                continue;
            }
            if let Some((level, text)) = parse_heading(line) {
                headings.push(Heading {
                    level,
                    text,
                    line: idx,
                });
            }
        }
        headings
    }

    /// The first heading with the given text, at any level
    pub fn find_heading(&self, text: &str) -> Option<Heading> {
        self.headings().into_iter().find(|h| h.text == text)
    }

    /// Body lines of the named heading's section: everything after the
    /// heading line up to the next heading of the same or a higher level.
    pub fn section_bounds(&self, heading_text: &str) -> Option<Range<usize>> {
        let heading = self.find_heading(heading_text)?;
        let end = self
            .headings()
            .into_iter()
            .find(|h| h.line > heading.line && h.level <= heading.level)
            .map(|h| h.line)
            .unwrap_or(self.lines.len());
        Some(heading.line + 1..end)
    }

    /// Ensure a heading exists, appending `heading_line` at the end of the
    /// note (after a blank separator) if it is missing. Returns the line
    /// index of the heading.
    pub fn ensure_section(&mut self, heading_line: &str) -> usize {
        let text = parse_heading(heading_line)
            .map(|(_, text)| text)
            .unwrap_or_else(|| heading_line.trim().to_string());
        if let Some(heading) = self.find_heading(&text) {
            return heading.line;
        }
        if self.lines.last().is_some_and(|l| !l.trim().is_empty()) {
            self.lines.push(String::new());
        }
        self.lines.push(heading_line.to_string());
        self.lines.len() - 1
    }

    /// Top-level list items within `range`: each item is its `- ` line plus
    /// following indented continuation lines. Blank lines belong to an item
    /// only when more indented content follows; trailing blanks do not.
    pub fn list_item_ranges(&self, range: Range<usize>) -> Vec<Range<usize>> {
        let mut items = Vec::new();
        let mut idx = range.start;
        let end = range.end.min(self.lines.len());
        let mut in_fence = false;

        while idx < end {
            let line = &self.lines[idx];
            if is_fence_delimiter(line) && indent_of(line) == 0 {
                in_fence = !in_fence;
                idx += 1;
                continue;
            }
            if in_fence || !is_list_item(line) {
                idx += 1;
                continue;
            }

            let start = idx;
            idx += 1;
            let mut item_end = idx;
            while idx < end {
                let line = &self.lines[idx];
                if line.trim().is_empty() {
                    if has_continuation(&self.lines[..end], idx + 1) {
                        idx += 1;
                        continue;
                    }
                    break;
                }
                if indent_of(line) == 0 {
                    break;
                }
                idx += 1;
                item_end = idx;
            }
            items.push(start..item_end);
            idx = item_end;
        }

        items
    }

    /// Insert a (possibly multi-line) list item at the end of the named
    /// heading's section, after the last existing item. Returns `false` if
    /// the heading does not exist.
    pub fn insert_list_item(&mut self, heading_text: &str, item: &str) -> bool {
        let Some(bounds) = self.section_bounds(heading_text) else {
            return false;
        };
        let at = match self.list_item_ranges(bounds.clone()).last() {
            Some(last) => last.end,
            None => {
                // No items yet: after the last non-blank body line, or
                // directly under the heading of an empty section
                let last_content = self.lines[bounds.clone()]
                    .iter()
                    .rposition(|l| !l.trim().is_empty());
                match last_content {
                    Some(offset) => bounds.start + offset + 1,
                    None => bounds.start,
                }
            }
        };
        let lines: Vec<String> = item.lines().map(|l| l.to_string()).collect();
        self.insert_lines(at, &lines);
        true
    }
}

/// `(level, text)` when the line is an ATX heading (1–6 `#`s + space)
fn parse_heading(line: &str) -> Option<(usize, String)> {
    let trimmed = line.trim_start();
    let hashes = trimmed.chars().take_while(|c| *c == '#').count();
    if !(1..=6).contains(&hashes) {
        return None;
    }
    let rest = &trimmed[hashes..];
    let text = rest.strip_prefix(' ')?;
    Some((hashes, text.trim().to_string()))
}

fn is_fence_delimiter(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("```") || trimmed.starts_with("~~~")
}

fn is_list_item(line: &str) -> bool {
    indent_of(line) == 0 && line.starts_with("- ")
}

fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start_matches([' ', '\t']).len()
}

/// Look past blank lines for indented continuation content
fn has_continuation(lines: &[String], start: usize) -> bool {
    for line in lines.iter().skip(start) {
        if line.trim().is_empty() {
            continue;
        }
        return indent_of(line) > 0;
    }
    false
}
