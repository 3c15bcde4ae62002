//! Recipe and folder persistence.

mod json_file;
mod preset;

pub use json_file::JsonFileStore;
pub use preset::preset_recipe;

use crate::error::StoreError;
use crate::model::{Folder, Recipe};

/// Ordering applied by [`RecipeStore::fetch`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RecipeSort {
    /// Order of creation
    #[default]
    Created,
    /// Case-insensitive by title
    Title,
}

/// Create/read/update/delete access to recipes and folders
///
/// Every mutating call is saved as one change-set: either the whole change reaches
/// storage or none of it does.
pub trait RecipeStore {
    /// Store a new recipe and return its id
    fn create(&mut self, recipe: Recipe) -> Result<String, StoreError>;
    /// Overwrite every field of an existing recipe
    fn update(&mut self, recipe: Recipe) -> Result<(), StoreError>;
    fn delete(&mut self, id: &str) -> Result<(), StoreError>;
    fn get(&self, id: &str) -> Option<Recipe>;
    fn fetch(&self, predicate: &dyn Fn(&Recipe) -> bool, sort: RecipeSort) -> Vec<Recipe>;

    fn create_folder(&mut self, name: &str) -> Result<String, StoreError>;
    fn rename_folder(&mut self, folder_id: &str, name: &str) -> Result<(), StoreError>;
    /// Remove a folder; its recipes become unfiled
    fn delete_folder(&mut self, folder_id: &str) -> Result<(), StoreError>;
    fn folders(&self) -> Vec<Folder>;
    fn add_to_folder(&mut self, recipe_id: &str, folder_id: &str) -> Result<(), StoreError>;
    fn remove_from_folder(&mut self, recipe_id: &str) -> Result<(), StoreError>;
}

/// Case-insensitive search over title, cuisine and both times; empty search matches all
pub fn matches_search(recipe: &Recipe, search: &str) -> bool {
    if search.is_empty() {
        return true;
    }
    let needle = search.to_lowercase();
    [
        &recipe.title,
        &recipe.cuisine,
        &recipe.prep_time,
        &recipe.cook_time,
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(&needle))
}

/// Recipes in a folder, or the unfiled ones when `folder_id` is `None`
pub fn recipes_in(
    store: &dyn RecipeStore,
    folder_id: Option<&str>,
    sort: RecipeSort,
) -> Vec<Recipe> {
    store.fetch(&|recipe: &Recipe| recipe.folder_id.as_deref() == folder_id, sort)
}

/// Every folder with the number of recipes it holds
pub fn folder_summaries(store: &dyn RecipeStore) -> Vec<(Folder, usize)> {
    store
        .folders()
        .into_iter()
        .map(|folder| {
            let count = recipes_in(store, Some(&folder.id), RecipeSort::Created).len();
            (folder, count)
        })
        .collect()
}
