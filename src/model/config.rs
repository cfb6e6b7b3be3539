use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Configuration from planner.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlannerConfig {
    #[serde(default)]
    pub notes: NotesConfig,
    #[serde(default)]
    pub planner: PlannerSectionConfig,
    #[serde(default)]
    pub edit: EditConfig,
}

/// Where day notes live and how they are named.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotesConfig {
    /// Folder holding day notes, relative to the vault root ("" = root)
    #[serde(default = "default_folder")]
    pub folder: String,
    /// chrono format string for day-note file stems
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

impl Default for NotesConfig {
    fn default() -> Self {
        NotesConfig {
            folder: default_folder(),
            date_format: default_date_format(),
        }
    }
}

/// The heading section inside a day note that the planner owns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerSectionConfig {
    /// Heading text (without the leading `#`s)
    #[serde(default = "default_heading")]
    pub heading: String,
    /// Heading level (1–6)
    #[serde(default = "default_heading_level")]
    pub heading_level: usize,
    /// Create the heading at the end of the note if it is missing
    #[serde(default = "default_true")]
    pub create_heading: bool,
    /// Re-sort the planner section chronologically after each write
    #[serde(default)]
    pub sort_on_write: bool,
}

impl Default for PlannerSectionConfig {
    fn default() -> Self {
        PlannerSectionConfig {
            heading: default_heading(),
            heading_level: default_heading_level(),
            create_heading: true,
            sort_on_write: false,
        }
    }
}

/// Durations governing edit gestures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditConfig {
    /// No resize or shrink may take a block below this duration
    #[serde(default = "default_minimal_duration")]
    pub minimal_duration_minutes: i64,
    /// Duration given to newly created blocks and single-time items
    #[serde(default = "default_default_duration")]
    pub default_duration_minutes: i64,
}

impl Default for EditConfig {
    fn default() -> Self {
        EditConfig {
            minimal_duration_minutes: default_minimal_duration(),
            default_duration_minutes: default_default_duration(),
        }
    }
}

fn default_folder() -> String {
    "notes".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_heading() -> String {
    "Day planner".to_string()
}

fn default_heading_level() -> usize {
    2
}

fn default_true() -> bool {
    true
}

fn default_minimal_duration() -> i64 {
    10
}

fn default_default_duration() -> i64 {
    30
}

impl PlannerConfig {
    /// Parse a config from TOML text. Missing fields take their defaults.
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Vault-relative path of the day note for `day`
    pub fn note_path(&self, day: NaiveDate) -> String {
        let stem = day.format(&self.notes.date_format).to_string();
        if self.notes.folder.is_empty() {
            format!("{}.md", stem)
        } else {
            format!("{}/{}.md", self.notes.folder, stem)
        }
    }

    /// Reverse of `note_path`: the day a vault-relative path refers to,
    /// or `None` for paths outside the notes folder or with foreign names.
    pub fn day_for_path(&self, path: &str) -> Option<NaiveDate> {
        let rest = if self.notes.folder.is_empty() {
            path
        } else {
            path.strip_prefix(self.notes.folder.as_str())?
                .strip_prefix('/')?
        };
        let stem = rest.strip_suffix(".md")?;
        NaiveDate::parse_from_str(stem, &self.notes.date_format).ok()
    }

    /// The rendered heading line, e.g. `## Day planner`
    pub fn heading_line(&self) -> String {
        let level = self.planner.heading_level.clamp(1, 6);
        format!("{} {}", "#".repeat(level), self.planner.heading)
    }
}
