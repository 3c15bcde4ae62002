//! Bullet and step-number passes applied whenever list text is edited, and their
//! inverses for read-only display.

use crate::config::FormattingConfig;

/// Prefixes list lines with the configured bullet and step numbers
#[derive(Debug, Clone)]
pub struct ListFormatter {
    pub bullet: String,
    pub step_base: u32,
}

impl Default for ListFormatter {
    fn default() -> Self {
        Self::from(&FormattingConfig::default())
    }
}

impl From<&FormattingConfig> for ListFormatter {
    fn from(config: &FormattingConfig) -> Self {
        ListFormatter {
            bullet: config.bullet.clone(),
            step_base: config.step_base,
        }
    }
}

impl ListFormatter {
    pub fn bullets(&self, text: &str) -> String {
        apply_bullets(text, &self.bullet)
    }

    pub fn steps(&self, text: &str) -> String {
        number_steps(text, self.step_base)
    }

    /// Bulleted lines with the glyph removed, blank lines skipped
    pub fn display_bullets(&self, text: &str) -> Vec<String> {
        text.split('\n')
            .filter(|line| !line.is_empty())
            .map(|line| strip_bullet(line, &self.bullet).to_string())
            .collect()
    }

    /// Step lines with their numbers removed, blank lines skipped
    pub fn display_steps(&self, text: &str) -> Vec<String> {
        text.split('\n')
            .filter(|line| !line.is_empty())
            .map(|line| strip_step_number(line).to_string())
            .collect()
    }
}

/// Prepend `bullet` and a space to every non-empty line that does not already start
/// with it. Idempotent for a fixed bullet.
pub fn apply_bullets(text: &str, bullet: &str) -> String {
    text.split('\n')
        .map(|line| {
            if line.is_empty() || line.starts_with(bullet) {
                line.to_string()
            } else {
                format!("{bullet} {line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renumber step lines starting at `base`
///
/// Any existing `"<n>. "` prefix is dropped first. The number of a line is `base` plus
/// its position in the text, so blank lines are kept unnumbered but still use up a
/// number.
pub fn number_steps(text: &str, base: u32) -> String {
    text.split('\n')
        .map(|line| step_body(line).unwrap_or(line))
        .enumerate()
        .map(|(index, line)| {
            if line.trim().is_empty() {
                line.to_string()
            } else {
                format!("{}. {}", base as usize + index, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Text after a leading `"<digits>. "`, if the line has one
fn step_body(line: &str) -> Option<&str> {
    let digits = line.len() - line.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return None;
    }
    line[digits..].strip_prefix(". ")
}

/// Remove a leading bullet and the whitespace after it
pub fn strip_bullet<'a>(line: &'a str, bullet: &str) -> &'a str {
    match line.strip_prefix(bullet) {
        Some(rest) => rest.trim_start(),
        None => line,
    }
}

/// Remove a leading `"<digits>."` and the whitespace after it
pub fn strip_step_number(line: &str) -> &str {
    let digits = line.len() - line.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return line;
    }
    match line[digits..].strip_prefix('.') {
        Some(rest) => rest.trim_start(),
        None => line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bullets_added_once() {
        let once = apply_bullets("flour\n\n• sugar\neggs", "•");
        assert_eq!(once, "• flour\n\n• sugar\n• eggs");
        assert_eq!(apply_bullets(&once, "•"), once);
    }

    #[test]
    fn test_changing_bullet_reprefixes_old_lines() {
        let old = apply_bullets("flour\nsugar", "•");
        let mixed = format!("{old}\n- salt");
        let result = apply_bullets(&mixed, "-");
        assert_eq!(result, "- • flour\n- • sugar\n- salt");
    }

    #[test]
    fn test_steps_numbered_by_line_position() {
        assert_eq!(number_steps("A\n\nB", 1), "1. A\n\n3. B");
        assert_eq!(number_steps("4. A\nB\n\nC", 1), "1. A\n2. B\n\n4. C");
    }

    #[test]
    fn test_step_numbering_idempotent_for_fixed_base() {
        let once = number_steps("mix\nbake\ncool", 1);
        assert_eq!(once, "1. mix\n2. bake\n3. cool");
        assert_eq!(number_steps(&once, 1), once);
    }

    #[test]
    fn test_step_base_change_renumbers() {
        let once = number_steps("mix\nbake", 1);
        assert_eq!(number_steps(&once, 5), "5. mix\n6. bake");
    }

    #[test]
    fn test_only_numbered_prefix_is_stripped() {
        assert_eq!(number_steps("1.5 cups", 1), "1. 1.5 cups");
        assert_eq!(number_steps("12. long step", 1), "1. long step");
    }

    #[test]
    fn test_whitespace_only_line_not_numbered() {
        assert_eq!(number_steps("a\n  \nb", 2), "2. a\n  \n4. b");
    }

    #[test]
    fn test_display_strips_prefixes() {
        let formatter = ListFormatter::default();
        assert_eq!(
            formatter.display_bullets("• flour\n\n•sugar\nplain"),
            vec!["flour", "sugar", "plain"]
        );
        assert_eq!(
            formatter.display_steps("1. mix\n\n3.bake\nrest"),
            vec!["mix", "bake", "rest"]
        );
    }

    #[test]
    fn test_formatter_from_config() {
        let config = FormattingConfig {
            bullet: "*".to_string(),
            step_base: 3,
        };
        let formatter = ListFormatter::from(&config);
        assert_eq!(formatter.bullets("a"), "* a");
        assert_eq!(formatter.steps("a\nb"), "3. a\n4. b");
    }
}
