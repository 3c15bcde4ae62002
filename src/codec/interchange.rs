//! Clipboard interchange format.
//!
//! A recipe is flattened into short tagged lines (`T:`, `PT:`, `CT:`, `Cuisine:`),
//! three list sections introduced by `Ingredients:`, `Steps:` and `Notes:`, the
//! source URL, and one `<TAG>: Yes|No` line per nutrition flag.

use log::debug;

use crate::model::{NutritionFlag, NutritionFlags, Recipe};

const TITLE_TAG: &str = "T:";
const PREP_TIME_TAG: &str = "PT:";
const COOK_TIME_TAG: &str = "CT:";
const CUISINE_TAG: &str = "Cuisine:";
const INGREDIENTS_HEADER: &str = "Ingredients:";
const STEPS_HEADER: &str = "Steps:";
const NOTES_HEADER: &str = "Notes:";
const URL_HEADER: &str = "URL:";

/// Fields recovered from interchange text, complete or not
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedRecipe {
    pub title: String,
    pub prep_time: String,
    pub cook_time: String,
    pub cuisine: String,
    pub ingredients: String,
    pub steps: String,
    pub notes: String,
    pub recipe_url: String,
    pub nutrition: NutritionFlags,
}

impl ParsedRecipe {
    /// A recipe counts as found once it has a title, ingredients and steps
    pub fn found(&self) -> bool {
        !self.title.is_empty() && !self.ingredients.is_empty() && !self.steps.is_empty()
    }

    /// Copy the parsed fields onto a recipe record, leaving id, image and folder alone
    pub fn apply_to(&self, recipe: &mut Recipe) {
        recipe.title = self.title.clone();
        recipe.prep_time = self.prep_time.clone();
        recipe.cook_time = self.cook_time.clone();
        recipe.cuisine = self.cuisine.clone();
        recipe.ingredients = self.ingredients.clone();
        recipe.steps = self.steps.clone();
        recipe.notes = self.notes.clone();
        recipe.recipe_url = self.recipe_url.clone();
        recipe.nutrition = self.nutrition;
    }
}

/// Which list block subsequent plain lines belong to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Section {
    #[default]
    None,
    Ingredients,
    Steps,
    Notes,
    Url,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scalar {
    Title,
    PrepTime,
    CookTime,
    Cuisine,
}

/// A single input line, classified
#[derive(Debug, PartialEq)]
enum Line<'a> {
    Scalar(Scalar, &'a str),
    Flag(NutritionFlag, bool),
    Header(Section, &'a str),
    Content(&'a str),
    Blank,
}

fn classify(line: &str) -> Line<'_> {
    if let Some(rest) = line.strip_prefix(TITLE_TAG) {
        return Line::Scalar(Scalar::Title, rest.trim());
    }
    if let Some(rest) = line.strip_prefix(PREP_TIME_TAG) {
        return Line::Scalar(Scalar::PrepTime, rest.trim());
    }
    if let Some(rest) = line.strip_prefix(COOK_TIME_TAG) {
        return Line::Scalar(Scalar::CookTime, rest.trim());
    }
    for flag in NutritionFlag::ALL {
        let value = line
            .strip_prefix(flag.tag())
            .and_then(|rest| rest.strip_prefix(':'));
        if let Some(value) = value {
            return Line::Flag(flag, value.trim().to_lowercase() == "yes");
        }
    }
    if let Some(rest) = line.strip_prefix(CUISINE_TAG) {
        return Line::Scalar(Scalar::Cuisine, rest.trim());
    }

    let headers = [
        (INGREDIENTS_HEADER, Section::Ingredients),
        (STEPS_HEADER, Section::Steps),
        (NOTES_HEADER, Section::Notes),
        (URL_HEADER, Section::Url),
    ];
    for (header, section) in headers {
        if let Some(rest) = line.strip_prefix(header) {
            return Line::Header(section, rest.trim());
        }
    }

    if line.is_empty() {
        Line::Blank
    } else {
        Line::Content(line)
    }
}

#[derive(Debug, Default)]
struct ParseState {
    section: Section,
    recipe: ParsedRecipe,
}

impl ParseState {
    fn feed(&mut self, line: &str) {
        match classify(line) {
            Line::Scalar(scalar, value) => {
                let value = value.to_string();
                match scalar {
                    Scalar::Title => {
                        self.recipe.title = value;
                        self.section = Section::None;
                    }
                    Scalar::PrepTime => self.recipe.prep_time = value,
                    Scalar::CookTime => self.recipe.cook_time = value,
                    Scalar::Cuisine => self.recipe.cuisine = value,
                }
            }
            Line::Flag(flag, value) => self.recipe.nutrition.set(flag, value),
            Line::Header(section, inline) => {
                self.section = section;
                // The serializer writes the URL on its own header line
                if section == Section::Url {
                    self.recipe.recipe_url.push_str(inline);
                }
            }
            Line::Content(text) => match self.section {
                Section::None => {}
                Section::Ingredients => push_line(&mut self.recipe.ingredients, text),
                Section::Steps => push_line(&mut self.recipe.steps, text),
                Section::Notes => push_line(&mut self.recipe.notes, text),
                Section::Url => self.recipe.recipe_url.push_str(text),
            },
            Line::Blank => {}
        }
    }

    fn finish(mut self) -> ParsedRecipe {
        for block in [
            &mut self.recipe.ingredients,
            &mut self.recipe.steps,
            &mut self.recipe.notes,
        ] {
            if block.ends_with('\n') {
                block.pop();
            }
        }
        self.recipe
    }
}

fn push_line(buffer: &mut String, line: &str) {
    buffer.push_str(line);
    buffer.push('\n');
}

/// Parse interchange text into recipe fields
///
/// Never fails: lines that match nothing are dropped. Check [`ParsedRecipe::found`] to
/// learn whether the text actually held a recipe.
pub fn parse(text: &str) -> ParsedRecipe {
    let mut state = ParseState::default();
    for line in text.lines() {
        state.feed(line);
    }
    let parsed = state.finish();
    debug!(
        "Parsed interchange text: title={:?} found={}",
        parsed.title,
        parsed.found()
    );
    parsed
}

/// Flatten a recipe into interchange text
///
/// Image data is never included.
pub fn serialize(recipe: &Recipe) -> String {
    let mut out = String::new();
    out.push_str(&format!("{TITLE_TAG}{}\n", recipe.title));
    out.push_str(&format!("{PREP_TIME_TAG}{}\n", recipe.prep_time));
    out.push_str(&format!("{COOK_TIME_TAG}{}\n", recipe.cook_time));
    out.push_str(&format!("{CUISINE_TAG}{}\n", recipe.cuisine));
    out.push('\n');
    out.push_str(&format!("{INGREDIENTS_HEADER}\n{}\n\n", recipe.ingredients));
    out.push_str(&format!("{STEPS_HEADER}\n{}\n\n", recipe.steps));
    out.push_str(&format!("{NOTES_HEADER}\n{}\n\n", recipe.notes));
    out.push_str(&format!("{URL_HEADER}{}", recipe.recipe_url));
    for flag in NutritionFlag::ALL {
        let answer = if recipe.nutrition.get(flag) { "Yes" } else { "No" };
        out.push_str(&format!("\n{}: {}", flag.tag(), answer));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn carnitas() -> Recipe {
        let mut recipe = Recipe {
            id: "abc".to_string(),
            title: "Carnitas Tacos".to_string(),
            prep_time: "25m".to_string(),
            cook_time: "4hrs".to_string(),
            cuisine: "Mexican".to_string(),
            ingredients: "• 4lb pork shoulder\n• 2 limes".to_string(),
            steps: "1. Cut pork\n2. Slow cook".to_string(),
            notes: "• Serve with cilantro".to_string(),
            recipe_url: "https://example.com/carnitas?x=1".to_string(),
            ..Default::default()
        };
        recipe.nutrition.gluten_free = true;
        recipe.nutrition.dairy_free = true;
        recipe.nutrition.soy_free = true;
        recipe
    }

    #[test]
    fn test_serialize_layout() {
        let text = serialize(&carnitas());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "T:Carnitas Tacos");
        assert_eq!(lines[1], "PT:25m");
        assert_eq!(lines[2], "CT:4hrs");
        assert_eq!(lines[3], "Cuisine:Mexican");
        assert_eq!(lines[4], "");
        assert_eq!(lines[5], "Ingredients:");
        assert!(text.contains("\nURL:https://example.com/carnitas?x=1\nGLTNF: Yes\nSGF: No\n"));
        assert!(text.ends_with("CRNF: No\nSOYF: Yes"));
    }

    #[test]
    fn test_serialize_keeps_empty_fields() {
        let text = serialize(&Recipe::default());
        assert!(text.starts_with("T:\nPT:\nCT:\nCuisine:\n\nIngredients:\n"));
        assert!(text.contains("\nURL:\n"));
        assert_eq!(text.matches(": No").count(), 12);
    }

    #[test]
    fn test_round_trip() {
        let recipe = carnitas();
        let parsed = parse(&serialize(&recipe));
        assert!(parsed.found());

        let mut back = Recipe {
            id: recipe.id.clone(),
            ..Default::default()
        };
        parsed.apply_to(&mut back);
        assert_eq!(back, recipe);
    }

    #[test]
    fn test_found_threshold() {
        let parsed = parse("T:Tacos\nIngredients:\nmeat\nSteps:\ncook\n");
        assert!(parsed.found());
        assert_eq!(parsed.ingredients, "meat");
        assert_eq!(parsed.steps, "cook");

        let parsed = parse("T:Tacos\n");
        assert!(!parsed.found());
        assert_eq!(parsed.title, "Tacos");
    }

    #[test]
    fn test_boolean_tags_are_strict() {
        for line in ["O: yes", "O:Yes", "O: YES", "O:  yes  "] {
            assert!(parse(line).nutrition.organic, "{line}");
        }
        for line in ["O: sometimes", "O:", "O: y", ""] {
            assert!(!parse(line).nutrition.organic, "{line}");
        }
    }

    #[test]
    fn test_lines_outside_a_section_are_dropped() {
        let parsed = parse("hello\nT:Soup\nstray line\nSteps:\nboil\n\nstir");
        assert_eq!(parsed.title, "Soup");
        assert_eq!(parsed.steps, "boil\nstir");
        assert!(parsed.ingredients.is_empty());
    }

    #[test]
    fn test_title_line_closes_open_section() {
        let parsed = parse("Ingredients:\nflour\nT:Bread\nwater");
        assert_eq!(parsed.ingredients, "flour");
        assert_eq!(parsed.title, "Bread");
    }

    #[test]
    fn test_url_may_follow_header() {
        let parsed = parse("URL:\nhttps://example.com/a\nGLTNF: Yes");
        assert_eq!(parsed.recipe_url, "https://example.com/a");
        assert!(parsed.nutrition.gluten_free);
    }

    #[test]
    fn test_crlf_input() {
        let parsed = parse("T:Pie\r\nIngredients:\r\napples\r\nSteps:\r\nbake\r\n");
        assert!(parsed.found());
        assert_eq!(parsed.ingredients, "apples");
    }

    #[test]
    fn test_similar_tags_do_not_collide() {
        assert_eq!(classify("CT:10m"), Line::Scalar(Scalar::CookTime, "10m"));
        assert_eq!(classify("NTF: Yes"), Line::Flag(NutritionFlag::NoTransFat, true));
        assert_eq!(classify("NUTF: Yes"), Line::Flag(NutritionFlag::NutFree, true));
        assert_eq!(classify("Olive oil"), Line::Content("Olive oil"));
        assert_eq!(classify("Vinegar"), Line::Content("Vinegar"));
    }
}
