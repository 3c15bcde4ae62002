use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{preset_recipe, RecipeSort, RecipeStore};
use crate::error::StoreError;
use crate::model::{Folder, Recipe};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoreData {
    #[serde(default)]
    recipes: Vec<Recipe>,
    #[serde(default)]
    folders: Vec<Folder>,
}

/// Store backed by a single JSON document, or purely in memory
///
/// Each mutation works on a copy of the data; the copy replaces the live data only
/// after it has been written out (temp file + rename).
#[derive(Debug)]
pub struct JsonFileStore {
    path: Option<PathBuf>,
    data: StoreData,
}

impl JsonFileStore {
    /// Open the store at `path`, creating it when missing
    ///
    /// A newly created store receives the preset recipe when `seed_preset` is set. Any
    /// failure here is reported as [`StoreError::Init`].
    pub fn open(path: impl AsRef<Path>, seed_preset: bool) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let init_error = |message: String| StoreError::Init {
            path: path.display().to_string(),
            message,
        };

        match fs::read_to_string(&path) {
            Ok(contents) => {
                let data: StoreData =
                    serde_json::from_str(&contents).map_err(|e| init_error(e.to_string()))?;
                debug!(
                    "Opened store {} with {} recipes and {} folders",
                    path.display(),
                    data.recipes.len(),
                    data.folders.len()
                );
                Ok(Self {
                    path: Some(path),
                    data,
                })
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let mut data = StoreData::default();
                if seed_preset {
                    let mut preset = preset_recipe();
                    preset.id = Uuid::new_v4().to_string();
                    data.recipes.push(preset);
                }
                write_atomically(&path, &data).map_err(|e| init_error(e.to_string()))?;
                info!("Created new store at {}", path.display());
                Ok(Self {
                    path: Some(path),
                    data,
                })
            }
            Err(e) => Err(init_error(e.to_string())),
        }
    }

    /// Store that never touches the filesystem
    pub fn in_memory() -> Self {
        Self {
            path: None,
            data: StoreData::default(),
        }
    }

    /// Apply `change` to a copy of the data and keep it only if it could be saved
    fn commit<T>(
        &mut self,
        change: impl FnOnce(&mut StoreData) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut next = self.data.clone();
        let value = change(&mut next)?;
        if let Some(path) = &self.path {
            write_atomically(path, &next)?;
        }
        self.data = next;
        Ok(value)
    }
}

fn write_atomically(path: &Path, data: &StoreData) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(data)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

fn recipe_mut<'a>(data: &'a mut StoreData, id: &str) -> Result<&'a mut Recipe, StoreError> {
    data.recipes
        .iter_mut()
        .find(|r| r.id == id)
        .ok_or_else(|| StoreError::RecipeNotFound(id.to_string()))
}

impl RecipeStore for JsonFileStore {
    fn create(&mut self, mut recipe: Recipe) -> Result<String, StoreError> {
        if recipe.id.is_empty() || self.get(&recipe.id).is_some() {
            recipe.id = Uuid::new_v4().to_string();
        }
        let id = recipe.id.clone();
        self.commit(|data| {
            data.recipes.push(recipe);
            Ok(())
        })?;
        info!("Recipe {} added", id);
        Ok(id)
    }

    fn update(&mut self, recipe: Recipe) -> Result<(), StoreError> {
        self.commit(|data| {
            let slot = recipe_mut(data, &recipe.id)?;
            *slot = recipe;
            Ok(())
        })
    }

    fn delete(&mut self, id: &str) -> Result<(), StoreError> {
        self.commit(|data| {
            let before = data.recipes.len();
            data.recipes.retain(|r| r.id != id);
            if data.recipes.len() == before {
                return Err(StoreError::RecipeNotFound(id.to_string()));
            }
            Ok(())
        })?;
        info!("Recipe {} deleted", id);
        Ok(())
    }

    fn get(&self, id: &str) -> Option<Recipe> {
        self.data.recipes.iter().find(|r| r.id == id).cloned()
    }

    fn fetch(&self, predicate: &dyn Fn(&Recipe) -> bool, sort: RecipeSort) -> Vec<Recipe> {
        let mut recipes: Vec<Recipe> = self
            .data
            .recipes
            .iter()
            .filter(|r| predicate(r))
            .cloned()
            .collect();
        if sort == RecipeSort::Title {
            recipes.sort_by_key(|r| r.title.to_lowercase());
        }
        recipes
    }

    fn create_folder(&mut self, name: &str) -> Result<String, StoreError> {
        let folder = Folder::new(name);
        let id = folder.id.clone();
        self.commit(|data| {
            data.folders.push(folder);
            Ok(())
        })?;
        info!("Folder {:?} created", name);
        Ok(id)
    }

    fn rename_folder(&mut self, folder_id: &str, name: &str) -> Result<(), StoreError> {
        self.commit(|data| {
            let folder = data
                .folders
                .iter_mut()
                .find(|f| f.id == folder_id)
                .ok_or_else(|| StoreError::FolderNotFound(folder_id.to_string()))?;
            folder.name = name.to_string();
            Ok(())
        })
    }

    fn delete_folder(&mut self, folder_id: &str) -> Result<(), StoreError> {
        self.commit(|data| {
            let before = data.folders.len();
            data.folders.retain(|f| f.id != folder_id);
            if data.folders.len() == before {
                return Err(StoreError::FolderNotFound(folder_id.to_string()));
            }
            for recipe in data
                .recipes
                .iter_mut()
                .filter(|r| r.folder_id.as_deref() == Some(folder_id))
            {
                recipe.folder_id = None;
            }
            Ok(())
        })?;
        info!("Folder {} deleted, its recipes are now unfiled", folder_id);
        Ok(())
    }

    fn folders(&self) -> Vec<Folder> {
        let mut folders = self.data.folders.clone();
        folders.sort_by_key(|f| f.creation_date);
        folders
    }

    fn add_to_folder(&mut self, recipe_id: &str, folder_id: &str) -> Result<(), StoreError> {
        self.commit(|data| {
            if !data.folders.iter().any(|f| f.id == folder_id) {
                return Err(StoreError::FolderNotFound(folder_id.to_string()));
            }
            recipe_mut(data, recipe_id)?.folder_id = Some(folder_id.to_string());
            Ok(())
        })
    }

    fn remove_from_folder(&mut self, recipe_id: &str) -> Result<(), StoreError> {
        self.commit(|data| {
            recipe_mut(data, recipe_id)?.folder_id = None;
            Ok(())
        })
    }
}
