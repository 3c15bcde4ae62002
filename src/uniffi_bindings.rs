//! UniFFI bindings for recipe-box
//!
//! This module provides FFI-compatible types and functions for use with iOS and Android.
//! Async entry points are wrapped in synchronous functions that manage their own tokio runtime.

use std::fmt;

use crate::config::{DeepLinkConfig, ScanConfig};
use crate::error::{RecipeError, ScanError};
use crate::model::{NutritionFlag, Recipe};
use crate::scan::{HtmlPageHost, PageScanner, ScanCategory, ScanResult};

#[cfg(feature = "uniffi")]
uniffi::setup_scaffolding!();

/// FFI-compatible recipe structure
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FfiRecipe {
    pub id: String,
    pub title: String,
    pub prep_time: String,
    pub cook_time: String,
    pub cuisine: String,
    pub ingredients: String,
    pub steps: String,
    pub notes: String,
    pub recipe_url: String,
    /// Tags (e.g. `GLTNF`) of the nutrition flags that are set
    pub nutrition_tags: Vec<String>,
    /// Raw image bytes, if any
    pub image: Option<Vec<u8>>,
}

impl From<Recipe> for FfiRecipe {
    fn from(recipe: Recipe) -> Self {
        FfiRecipe {
            nutrition_tags: NutritionFlag::ALL
                .iter()
                .filter(|flag| recipe.nutrition.get(**flag))
                .map(|flag| flag.tag().to_string())
                .collect(),
            id: recipe.id,
            title: recipe.title,
            prep_time: recipe.prep_time,
            cook_time: recipe.cook_time,
            cuisine: recipe.cuisine,
            ingredients: recipe.ingredients,
            steps: recipe.steps,
            notes: recipe.notes,
            recipe_url: recipe.recipe_url,
            image: recipe.image_data,
        }
    }
}

impl From<FfiRecipe> for Recipe {
    fn from(ffi: FfiRecipe) -> Self {
        let mut recipe = Recipe {
            id: ffi.id,
            title: ffi.title,
            image_data: ffi.image,
            prep_time: ffi.prep_time,
            cook_time: ffi.cook_time,
            cuisine: ffi.cuisine,
            ingredients: ffi.ingredients,
            steps: ffi.steps,
            notes: ffi.notes,
            recipe_url: ffi.recipe_url,
            ..Default::default()
        };
        for flag in NutritionFlag::ALL {
            if ffi.nutrition_tags.iter().any(|tag| tag == flag.tag()) {
                recipe.nutrition.set(flag, true);
            }
        }
        recipe
    }
}

/// Interchange text parsed into a recipe
#[derive(Debug, Clone)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FfiParsedRecipe {
    pub recipe: FfiRecipe,
    /// Title, ingredients and steps were all present
    pub found: bool,
}

/// Lists lifted off a web page
#[derive(Debug, Clone)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FfiScanResult {
    pub ingredients: String,
    pub steps: String,
    pub instructions: String,
    pub directions: String,
    /// Human readable summary of every category
    pub report: String,
}

impl From<ScanResult> for FfiScanResult {
    fn from(result: ScanResult) -> Self {
        FfiScanResult {
            ingredients: result.get(ScanCategory::Ingredients).to_string(),
            steps: result.get(ScanCategory::Steps).to_string(),
            instructions: result.get(ScanCategory::Instructions).to_string(),
            directions: result.get(ScanCategory::Directions).to_string(),
            report: result.report(),
        }
    }
}

/// FFI-compatible error type
#[derive(Debug, Clone)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Error))]
pub enum FfiRecipeError {
    /// The page could not be fetched or scanned
    ScanError { message: String },
    /// No list category matched anything
    NothingFound { message: String },
    /// The deep link was malformed or not addressed to this app
    DeepLinkError { message: String },
    /// Runtime error (tokio)
    RuntimeError { message: String },
}

impl fmt::Display for FfiRecipeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FfiRecipeError::ScanError { message } => write!(f, "Scan error: {}", message),
            FfiRecipeError::NothingFound { message } => write!(f, "{}", message),
            FfiRecipeError::DeepLinkError { message } => write!(f, "Deep link error: {}", message),
            FfiRecipeError::RuntimeError { message } => write!(f, "Runtime error: {}", message),
        }
    }
}

impl std::error::Error for FfiRecipeError {}

impl From<ScanError> for FfiRecipeError {
    fn from(err: ScanError) -> Self {
        match err {
            ScanError::NothingFound => FfiRecipeError::NothingFound {
                message: err.to_string(),
            },
            _ => FfiRecipeError::ScanError {
                message: err.to_string(),
            },
        }
    }
}

impl From<RecipeError> for FfiRecipeError {
    fn from(err: RecipeError) -> Self {
        match err {
            RecipeError::Scan(e) => e.into(),
            RecipeError::DeepLink(message) => FfiRecipeError::DeepLinkError { message },
            other => FfiRecipeError::ScanError {
                message: other.to_string(),
            },
        }
    }
}

/// Create a new tokio runtime for FFI calls
fn create_runtime() -> Result<tokio::runtime::Runtime, FfiRecipeError> {
    tokio::runtime::Runtime::new().map_err(|e| FfiRecipeError::RuntimeError {
        message: format!("Failed to create async runtime: {}", e),
    })
}

/// Encode a recipe as abbreviated-tag interchange text
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn serialize_recipe(recipe: FfiRecipe) -> String {
    crate::codec::serialize(&recipe.into())
}

/// Decode interchange text; `found` is false when the text is not a complete recipe
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn parse_recipe_text(text: String) -> FfiParsedRecipe {
    let parsed = crate::codec::parse(&text);
    let found = parsed.found();
    let mut recipe = Recipe::default();
    parsed.apply_to(&mut recipe);
    FfiParsedRecipe {
        recipe: recipe.into(),
        found,
    }
}

/// Readable text for the share sheet
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn share_recipe_text(recipe: FfiRecipe) -> String {
    crate::codec::share_text(&recipe.into())
}

#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn apply_bullets(text: String, bullet: String) -> String {
    crate::codec::apply_bullets(&text, &bullet)
}

#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn number_steps(text: String, base: u32) -> String {
    crate::codec::number_steps(&text, base)
}

/// Scan HTML the host app already has (e.g. from its web view)
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn scan_html(html: String) -> Result<FfiScanResult, FfiRecipeError> {
    let rt = create_runtime()?;
    rt.block_on(async {
        let host = HtmlPageHost::new(html);
        let result = PageScanner::new().scan(&host).await?;
        Ok(result.into())
    })
}

/// Download a page and scan it
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn scan_url(url: String, timeout_seconds: Option<u64>) -> Result<FfiScanResult, FfiRecipeError> {
    let rt = create_runtime()?;
    rt.block_on(async {
        let mut config = ScanConfig::default();
        if let Some(timeout) = timeout_seconds {
            config.timeout = timeout;
        }
        let result = crate::scan_url(&url, &config).await?;
        Ok(result.into())
    })
}

/// Parse an incoming `reciperealm://recipe/new?...` link
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn parse_deep_link(link: String) -> Result<FfiRecipe, FfiRecipeError> {
    let linked = crate::codec::parse_deep_link(&link, &DeepLinkConfig::default())?;
    Ok(linked.to_recipe().into())
}

/// Get the library version
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ffi_recipe_conversion() {
        let mut recipe = Recipe {
            id: "r1".to_string(),
            title: "Test Recipe".to_string(),
            ingredients: "• 2 eggs".to_string(),
            steps: "1. Beat".to_string(),
            ..Default::default()
        };
        recipe.nutrition.vegetarian = true;

        let ffi_recipe: FfiRecipe = recipe.clone().into();
        assert_eq!(ffi_recipe.title, "Test Recipe");
        assert_eq!(ffi_recipe.nutrition_tags, vec!["V".to_string()]);

        let back: Recipe = ffi_recipe.into();
        assert_eq!(back, recipe);
    }

    #[test]
    fn test_parse_recipe_text_ffi() {
        let parsed = parse_recipe_text("T:Toast\n\nIngredients:\n• bread\n\nSteps:\n1. toast".to_string());
        assert!(parsed.found);
        assert_eq!(parsed.recipe.title, "Toast");

        let partial = parse_recipe_text("T:Toast".to_string());
        assert!(!partial.found);
    }

    #[test]
    fn test_scan_html_ffi() {
        let html = r#"<html><body><ul class="ingredients"><li>salt</li></ul></body></html>"#;
        let result = scan_html(html.to_string()).unwrap();
        assert_eq!(result.ingredients, "salt");
        assert!(result
            .report
            .contains("The steps list was NOT found on the webpage."));

        let err = scan_html("<p>nothing</p>".to_string()).unwrap_err();
        assert!(matches!(err, FfiRecipeError::NothingFound { .. }));
    }

    #[test]
    fn test_parse_deep_link_ffi() {
        let recipe =
            parse_deep_link("reciperealm://recipe/new?title=Chili&cuisine=Tex-Mex".to_string())
                .unwrap();
        assert_eq!(recipe.title, "Chili");
        assert_eq!(recipe.cuisine, "Tex-Mex");

        let err = parse_deep_link("https://example.com/new?title=x".to_string()).unwrap_err();
        assert!(matches!(err, FfiRecipeError::DeepLinkError { .. }));
    }

    #[test]
    fn test_get_version() {
        let version = get_version();
        assert!(!version.is_empty());
    }
}
