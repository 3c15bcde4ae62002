use std::sync::Mutex;

use log::{info, warn};

use crate::codec::{self, DeepLinkedRecipe, ParsedRecipe};
use crate::error::RecipeError;
use crate::model::Recipe;

/// System pasteboard holding a text item and optionally an image item
pub trait Clipboard: Send + Sync {
    fn text(&self) -> Option<String>;
    fn image(&self) -> Option<Vec<u8>>;
    /// Replace the clipboard contents
    fn set_items(&self, text: String, image: Option<Vec<u8>>);
}

/// Process-local clipboard
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    items: Mutex<(Option<String>, Option<Vec<u8>>)>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        let clipboard = Self::default();
        clipboard.set_items(text.into(), None);
        clipboard
    }
}

impl Clipboard for MemoryClipboard {
    fn text(&self) -> Option<String> {
        self.items.lock().ok().and_then(|items| items.0.clone())
    }

    fn image(&self) -> Option<Vec<u8>> {
        self.items.lock().ok().and_then(|items| items.1.clone())
    }

    fn set_items(&self, text: String, image: Option<Vec<u8>>) {
        if let Ok(mut items) = self.items.lock() {
            *items = (Some(text), image);
        }
    }
}

/// Result of reading a recipe off the clipboard
#[derive(Debug, Clone, PartialEq)]
pub enum ImportOutcome {
    /// Title, ingredients and steps were all present
    Imported(ParsedRecipe),
    /// Text was there but not a complete recipe; whatever did parse is kept
    NotFound(ParsedRecipe),
}

impl ImportOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            ImportOutcome::Imported(_) => "A recipe was successfully imported from the clipboard.",
            ImportOutcome::NotFound(_) => "No recipe data was found in the clipboard.",
        }
    }

    /// The parsed fields, complete or not
    pub fn fields(&self) -> &ParsedRecipe {
        match self {
            ImportOutcome::Imported(parsed) | ImportOutcome::NotFound(parsed) => parsed,
        }
    }

    pub fn into_recipe(self) -> Result<ParsedRecipe, RecipeError> {
        match self {
            ImportOutcome::Imported(parsed) => Ok(parsed),
            ImportOutcome::NotFound(_) => Err(RecipeError::NoRecipeFound),
        }
    }
}

/// Copy a recipe to the clipboard as interchange text, with its image if it has one
pub fn export_recipe(recipe: &Recipe, clipboard: &dyn Clipboard) {
    clipboard.set_items(codec::serialize(recipe), recipe.image_data.clone());
    info!("Copied recipe {:?} to the clipboard", recipe.title);
}

/// Read interchange text from the clipboard
pub fn import_recipe(clipboard: &dyn Clipboard) -> Result<ImportOutcome, RecipeError> {
    let text = clipboard
        .text()
        .filter(|text| !text.is_empty())
        .ok_or(RecipeError::ClipboardEmpty)?;

    let parsed = codec::parse(&text);
    if parsed.found() {
        info!("Imported recipe {:?} from the clipboard", parsed.title);
        Ok(ImportOutcome::Imported(parsed))
    } else {
        warn!("Clipboard text did not contain a complete recipe");
        Ok(ImportOutcome::NotFound(parsed))
    }
}

/// Image bytes currently on the clipboard
pub fn import_image(clipboard: &dyn Clipboard) -> Result<Vec<u8>, RecipeError> {
    clipboard.image().ok_or(RecipeError::NoImageFound)
}

/// Stage a deep-linked recipe on the clipboard so the normal import path picks it up
pub fn stage_deep_link(linked: &DeepLinkedRecipe, clipboard: &dyn Clipboard) {
    clipboard.set_items(linked.to_interchange_text(), linked.image.clone());
}
