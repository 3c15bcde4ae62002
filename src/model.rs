use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::codec::ParsedRecipe;
use crate::error::RecipeError;

/// The fixed cuisine choices offered when recording a recipe
pub const CUISINES: [&str; 34] = [
    "Mexican",
    "Cuban",
    "American",
    "Italian",
    "Chinese",
    "BBQ (Barbecue)",
    "Brazilian",
    "Cajun/Creole",
    "Caribbean",
    "Ethiopian",
    "Filipino",
    "French",
    "German",
    "Greek",
    "Hawaiian",
    "Indian",
    "Irish",
    "Jamaican",
    "Japanese",
    "Jewish (deli food)",
    "Korean",
    "Lebanese",
    "Mediterranean",
    "Middle Eastern",
    "Moroccan",
    "Peruvian",
    "Polish",
    "Russian",
    "Southern (Soul Food)",
    "Spanish",
    "Tex-Mex",
    "Thai",
    "Turkish",
    "Vietnamese",
];

/// Position of a cuisine in [`CUISINES`], matched by exact display name
pub fn cuisine_index(name: &str) -> Option<usize> {
    CUISINES.iter().position(|c| *c == name)
}

/// One of the twelve independent dietary attributes of a recipe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NutritionFlag {
    GlutenFree,
    SugarFree,
    DairyFree,
    GmoFree,
    Organic,
    Vegetarian,
    PeanutFree,
    NutFree,
    EggFree,
    NoTransFat,
    CornFree,
    SoyFree,
}

impl NutritionFlag {
    /// Every flag, in interchange order
    pub const ALL: [NutritionFlag; 12] = [
        NutritionFlag::GlutenFree,
        NutritionFlag::SugarFree,
        NutritionFlag::DairyFree,
        NutritionFlag::GmoFree,
        NutritionFlag::Organic,
        NutritionFlag::Vegetarian,
        NutritionFlag::PeanutFree,
        NutritionFlag::NutFree,
        NutritionFlag::EggFree,
        NutritionFlag::NoTransFat,
        NutritionFlag::CornFree,
        NutritionFlag::SoyFree,
    ];

    /// Abbreviated tag used by the clipboard format
    pub fn tag(self) -> &'static str {
        match self {
            NutritionFlag::GlutenFree => "GLTNF",
            NutritionFlag::SugarFree => "SGF",
            NutritionFlag::DairyFree => "DARYF",
            NutritionFlag::GmoFree => "GMOF",
            NutritionFlag::Organic => "O",
            NutritionFlag::Vegetarian => "V",
            NutritionFlag::PeanutFree => "PNTF",
            NutritionFlag::NutFree => "NUTF",
            NutritionFlag::EggFree => "EGGF",
            NutritionFlag::NoTransFat => "NTF",
            NutritionFlag::CornFree => "CRNF",
            NutritionFlag::SoyFree => "SOYF",
        }
    }

    /// Human readable label used in shared text
    pub fn label(self) -> &'static str {
        match self {
            NutritionFlag::GlutenFree => "Gluten-Free",
            NutritionFlag::SugarFree => "Sugar-Free",
            NutritionFlag::DairyFree => "Dairy-Free",
            NutritionFlag::GmoFree => "GMO-Free",
            NutritionFlag::Organic => "Organic",
            NutritionFlag::Vegetarian => "Vegetarian",
            NutritionFlag::PeanutFree => "Peanut-Free",
            NutritionFlag::NutFree => "Nut-Free",
            NutritionFlag::EggFree => "Egg-Free",
            NutritionFlag::NoTransFat => "No Trans Fat",
            NutritionFlag::CornFree => "Corn-Free",
            NutritionFlag::SoyFree => "Soy-Free",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NutritionFlags {
    pub gluten_free: bool,
    pub sugar_free: bool,
    pub dairy_free: bool,
    pub gmo_free: bool,
    pub organic: bool,
    pub vegetarian: bool,
    pub peanut_free: bool,
    pub nut_free: bool,
    pub egg_free: bool,
    pub no_trans_fat: bool,
    pub corn_free: bool,
    pub soy_free: bool,
}

impl NutritionFlags {
    pub fn get(&self, flag: NutritionFlag) -> bool {
        match flag {
            NutritionFlag::GlutenFree => self.gluten_free,
            NutritionFlag::SugarFree => self.sugar_free,
            NutritionFlag::DairyFree => self.dairy_free,
            NutritionFlag::GmoFree => self.gmo_free,
            NutritionFlag::Organic => self.organic,
            NutritionFlag::Vegetarian => self.vegetarian,
            NutritionFlag::PeanutFree => self.peanut_free,
            NutritionFlag::NutFree => self.nut_free,
            NutritionFlag::EggFree => self.egg_free,
            NutritionFlag::NoTransFat => self.no_trans_fat,
            NutritionFlag::CornFree => self.corn_free,
            NutritionFlag::SoyFree => self.soy_free,
        }
    }

    pub fn set(&mut self, flag: NutritionFlag, value: bool) {
        let slot = match flag {
            NutritionFlag::GlutenFree => &mut self.gluten_free,
            NutritionFlag::SugarFree => &mut self.sugar_free,
            NutritionFlag::DairyFree => &mut self.dairy_free,
            NutritionFlag::GmoFree => &mut self.gmo_free,
            NutritionFlag::Organic => &mut self.organic,
            NutritionFlag::Vegetarian => &mut self.vegetarian,
            NutritionFlag::PeanutFree => &mut self.peanut_free,
            NutritionFlag::NutFree => &mut self.nut_free,
            NutritionFlag::EggFree => &mut self.egg_free,
            NutritionFlag::NoTransFat => &mut self.no_trans_fat,
            NutritionFlag::CornFree => &mut self.corn_free,
            NutritionFlag::SoyFree => &mut self.soy_free,
        };
        *slot = value;
    }

    /// Flag-wise OR, used when imported flags are merged into typed ones
    pub fn union(&self, other: &NutritionFlags) -> NutritionFlags {
        let mut merged = *self;
        for flag in NutritionFlag::ALL {
            if other.get(flag) {
                merged.set(flag, true);
            }
        }
        merged
    }
}

/// A user-authored recipe
///
/// Optional text fields are stored as empty strings when absent. The list fields
/// (`ingredients`, `steps`, `notes`) hold one item per line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    pub title: String,
    #[serde(with = "base64_bytes", skip_serializing_if = "Option::is_none")]
    pub image_data: Option<Vec<u8>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub prep_time: String,
    pub cook_time: String,
    pub cuisine: String,
    pub ingredients: String,
    pub steps: String,
    pub notes: String,
    #[serde(rename = "recipeURL")]
    pub recipe_url: String,
    pub nutrition: NutritionFlags,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
}

impl Recipe {
    /// Names of the required fields that are still empty, in form order
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.title.is_empty() {
            missing.push("Title");
        }
        if self.cuisine.is_empty() {
            missing.push("Cuisine");
        }
        if self.ingredients.is_empty() {
            missing.push("Ingredients");
        }
        if self.steps.is_empty() {
            missing.push("Steps");
        }
        missing
    }

    pub fn validate(&self) -> Result<(), RecipeError> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(RecipeError::Validation(missing_fields_message(&missing)))
        }
    }
}

/// "Please fill in Title." or "Please fill in Title, Cuisine and Steps."
pub fn missing_fields_message(fields: &[&str]) -> String {
    match fields {
        [] => String::new(),
        [only] => format!("Please fill in {only}."),
        [init @ .., last] => format!("Please fill in {} and {}.", init.join(", "), last),
    }
}

/// A named, user-created grouping of recipes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: String,
    pub name: String,
    pub creation_date: DateTime<Utc>,
}

impl Folder {
    pub fn new(name: impl Into<String>) -> Self {
        Folder {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            creation_date: Utc::now(),
        }
    }
}

/// State of the add-recipe form
///
/// Values typed by the user live next to whatever was imported from the clipboard; when
/// the draft is finalized an imported value wins whenever it is non-empty.
#[derive(Debug, Clone, Default)]
pub struct RecipeDraft {
    pub title: String,
    pub prep_time: String,
    pub cook_time: String,
    pub selected_cuisine: Option<usize>,
    pub ingredients: String,
    pub steps: String,
    pub notes: String,
    pub recipe_url: String,
    pub nutrition: NutritionFlags,
    pub image_data: Option<Vec<u8>>,
    pub imported: Option<ParsedRecipe>,
}

impl RecipeDraft {
    /// True once anything has been entered; importing over typed data is refused then
    pub fn has_user_input(&self) -> bool {
        !self.title.is_empty()
            || !self.prep_time.is_empty()
            || !self.cook_time.is_empty()
            || self.selected_cuisine.is_some()
            || !self.ingredients.is_empty()
            || !self.steps.is_empty()
            || !self.notes.is_empty()
            || !self.recipe_url.is_empty()
            || self.nutrition != NutritionFlags::default()
    }

    /// Keep imported fields and select the imported cuisine if it is a known one
    pub fn apply_import(&mut self, parsed: ParsedRecipe) {
        if let Some(index) = cuisine_index(&parsed.cuisine) {
            self.selected_cuisine = Some(index);
        }
        self.imported = Some(parsed);
    }

    /// Merge typed and imported values and validate the result
    pub fn finalize(self) -> Result<Recipe, RecipeError> {
        let imported = self.imported.unwrap_or_default();
        let pick = |imported: String, typed: String| {
            if imported.is_empty() {
                typed
            } else {
                imported
            }
        };

        let cuisine = self
            .selected_cuisine
            .and_then(|i| CUISINES.get(i))
            .map(|c| c.to_string())
            .unwrap_or_default();

        let recipe = Recipe {
            id: Uuid::new_v4().to_string(),
            title: pick(imported.title, self.title),
            image_data: self.image_data,
            image_url: None,
            prep_time: pick(imported.prep_time, self.prep_time),
            cook_time: pick(imported.cook_time, self.cook_time),
            cuisine,
            ingredients: pick(imported.ingredients, self.ingredients),
            steps: pick(imported.steps, self.steps),
            notes: pick(imported.notes, self.notes),
            recipe_url: pick(imported.recipe_url, self.recipe_url),
            nutrition: self.nutrition.union(&imported.nutrition),
            folder_id: None,
        };

        recipe.validate()?;
        Ok(recipe)
    }
}

mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD, Engine};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &Option<Vec<u8>>, s: S) -> Result<S::Ok, S::Error> {
        match bytes {
            Some(bytes) => s.serialize_some(&STANDARD.encode(bytes)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<u8>>, D::Error> {
        let encoded: Option<String> = Option::deserialize(d)?;
        encoded
            .map(|e| STANDARD.decode(e).map_err(serde::de::Error::custom))
            .transpose()
    }
}
