pub mod chat;
pub mod clipboard;
pub mod codec;
pub mod config;
pub mod error;
pub mod fetchers;
pub mod model;
pub mod scan;
pub mod settings;
pub mod store;

// UniFFI bindings for mobile platforms
pub mod uniffi_bindings;

use std::time::Duration;

use log::info;

pub use crate::clipboard::{Clipboard, ImportOutcome, MemoryClipboard};
pub use crate::codec::{parse, serialize, ListFormatter, ParsedRecipe};
pub use crate::config::RecipeBoxConfig;
pub use crate::error::{ChatError, RecipeError, ScanError, StoreError};
pub use crate::model::{Folder, NutritionFlag, NutritionFlags, Recipe, RecipeDraft};
pub use crate::scan::{PageScanner, ScanCategory, ScanResult};
pub use crate::store::{JsonFileStore, RecipeSort, RecipeStore};

use crate::fetchers::RequestFetcher;
use crate::scan::RemotePageHost;

/// Download `url` and scan it for recipe lists
pub async fn scan_url(
    url: &str,
    config: &crate::config::ScanConfig,
) -> Result<ScanResult, RecipeError> {
    let fetcher = RequestFetcher::new(Some(Duration::from_secs(config.timeout)))?;
    let host = RemotePageHost::new(url, fetcher);
    let result = PageScanner::new().scan(&host).await?;
    info!("Scanned {}", url);
    Ok(result)
}

/// Open the recipe store named by the configuration
pub fn open_store(config: &RecipeBoxConfig) -> Result<JsonFileStore, StoreError> {
    JsonFileStore::open(&config.store.path, config.store.seed_preset)
}

/// Place a stored recipe on the clipboard
pub fn copy_recipe(
    store: &dyn RecipeStore,
    id: &str,
    clipboard: &dyn Clipboard,
) -> Result<Recipe, RecipeError> {
    let recipe = store
        .get(id)
        .ok_or_else(|| StoreError::RecipeNotFound(id.to_string()))?;
    clipboard::export_recipe(&recipe, clipboard);
    Ok(recipe)
}

/// Read a recipe off the clipboard and save it
///
/// The clipboard image, when present, becomes the recipe image.
pub fn import_from_clipboard(
    store: &mut dyn RecipeStore,
    clipboard: &dyn Clipboard,
) -> Result<Recipe, RecipeError> {
    let parsed = clipboard::import_recipe(clipboard)?.into_recipe()?;
    let mut draft = RecipeDraft::default();
    draft.apply_import(parsed);
    draft.image_data = clipboard.image();
    let recipe = draft.finalize()?;
    store.create(recipe.clone())?;
    Ok(recipe)
}
