//! Typed systemd unit file
//!
//! A unit template is parsed into sections of ordered entries so that fields
//! are rewritten by name. Comments and blank lines are preserved in place.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Line {
    Entry { key: String, value: String },
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Section {
    name: String,
    lines: Vec<Line>,
}

/// A parsed unit file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitFile {
    /// Lines before the first section header
    preamble: Vec<String>,
    sections: Vec<Section>,
}

impl UnitFile {
    pub fn parse(content: &str) -> Self {
        let mut unit = UnitFile::default();

        for raw in content.lines() {
            let trimmed = raw.trim();
            if trimmed.starts_with('[') && trimmed.ends_with(']') {
                unit.sections.push(Section {
                    name: trimmed[1..trimmed.len() - 1].to_string(),
                    lines: Vec::new(),
                });
                continue;
            }

            let Some(section) = unit.sections.last_mut() else {
                unit.preamble.push(raw.to_string());
                continue;
            };

            let is_comment = trimmed.starts_with('#') || trimmed.starts_with(';');
            match trimmed.split_once('=') {
                Some((key, value)) if !is_comment => section.lines.push(Line::Entry {
                    key: key.trim().to_string(),
                    value: value.trim().to_string(),
                }),
                _ => section.lines.push(Line::Other(raw.to_string())),
            }
        }

        unit
    }

    /// First value of `key` in `section`
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .iter()
            .find(|s| s.name == section)?
            .lines
            .iter()
            .find_map(|line| match line {
                Line::Entry { key: k, value } if k == key => Some(value.as_str()),
                _ => None,
            })
    }

    /// Set `key` to a single value, replacing every existing occurrence
    ///
    /// The entry keeps the position of its first occurrence; a missing key is
    /// appended after the section's last entry, and a missing section is
    /// appended to the file.
    pub fn set(&mut self, section: &str, key: &str, value: impl Into<String>) {
        let value = value.into();
        let index = match self.sections.iter().position(|s| s.name == section) {
            Some(index) => index,
            None => {
                self.sections.push(Section {
                    name: section.to_string(),
                    lines: Vec::new(),
                });
                self.sections.len() - 1
            }
        };
        let lines = &mut self.sections[index].lines;

        let is_key = |line: &Line| matches!(line, Line::Entry { key: k, .. } if k == key);
        let new_entry = Line::Entry {
            key: key.to_string(),
            value,
        };

        match lines.iter().position(is_key) {
            Some(first) => {
                lines[first] = new_entry;
                let mut seen = 0usize;
                lines.retain(|line| {
                    if is_key(line) {
                        seen += 1;
                        seen == 1
                    } else {
                        true
                    }
                });
            }
            None => {
                let after_last_entry = lines
                    .iter()
                    .rposition(|line| matches!(line, Line::Entry { .. }))
                    .map_or(0, |i| i + 1);
                lines.insert(after_last_entry, new_entry);
            }
        }
    }

    /// Remove every occurrence of `key` from `section`
    pub fn remove(&mut self, section: &str, key: &str) {
        if let Some(s) = self.sections.iter_mut().find(|s| s.name == section) {
            s.lines
                .retain(|line| !matches!(line, Line::Entry { key: k, .. } if k == key));
        }
    }
}

impl fmt::Display for UnitFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.preamble {
            writeln!(f, "{line}")?;
        }
        for section in &self.sections {
            writeln!(f, "[{}]", section.name)?;
            for line in &section.lines {
                match line {
                    Line::Entry { key, value } => writeln!(f, "{key}={value}")?,
                    Line::Other(raw) => writeln!(f, "{raw}")?,
                }
            }
        }
        Ok(())
    }
}
