use base64::{engine::general_purpose::STANDARD, Engine};
use log::{debug, warn};
use reqwest::Url;

use crate::codec::interchange;
use crate::config::DeepLinkConfig;
use crate::error::RecipeError;
use crate::model::Recipe;

/// Recipe fields carried in the query string of a deep link
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeepLinkedRecipe {
    pub id: Option<String>,
    pub title: Option<String>,
    pub prep_time: Option<String>,
    pub cook_time: Option<String>,
    pub cuisine: Option<String>,
    pub ingredients: Option<String>,
    pub steps: Option<String>,
    pub notes: Option<String>,
    pub url: Option<String>,
    pub image: Option<Vec<u8>>,
}

impl DeepLinkedRecipe {
    /// Recipe record holding the linked fields; the flag set is not carried by links
    pub fn to_recipe(&self) -> Recipe {
        let text = |value: &Option<String>| value.clone().unwrap_or_default();
        Recipe {
            id: text(&self.id),
            title: text(&self.title),
            image_data: self.image.clone(),
            prep_time: text(&self.prep_time),
            cook_time: text(&self.cook_time),
            cuisine: text(&self.cuisine),
            ingredients: text(&self.ingredients),
            steps: text(&self.steps),
            notes: text(&self.notes),
            recipe_url: text(&self.url),
            ..Default::default()
        }
    }

    /// Interchange text for the linked recipe, ready for the clipboard import path
    pub fn to_interchange_text(&self) -> String {
        interchange::serialize(&self.to_recipe())
    }
}

/// Parse an incoming link such as `reciperealm://recipe/new?title=Tacos&steps=...`
///
/// Links with a different scheme, host or path are rejected.
pub fn parse_deep_link(link: &str, config: &DeepLinkConfig) -> Result<DeepLinkedRecipe, RecipeError> {
    let url = Url::parse(link).map_err(|e| RecipeError::DeepLink(e.to_string()))?;

    if url.scheme() != config.scheme
        || url.host_str() != Some(config.host.as_str())
        || url.path() != config.path
    {
        return Err(RecipeError::DeepLink(format!(
            "unexpected target {}://{}{}",
            url.scheme(),
            url.host_str().unwrap_or_default(),
            url.path()
        )));
    }

    let mut linked = DeepLinkedRecipe::default();
    for (key, value) in url.query_pairs() {
        let value = value.into_owned();
        match key.as_ref() {
            "id" => linked.id = Some(value),
            "title" => linked.title = Some(value),
            "preptime" => linked.prep_time = Some(value),
            "cooktime" => linked.cook_time = Some(value),
            "cuisine" => linked.cuisine = Some(value),
            "ingredients" => linked.ingredients = Some(value),
            "steps" => linked.steps = Some(value),
            "notes" => linked.notes = Some(value),
            "url" => linked.url = Some(value),
            "image" => match STANDARD.decode(value.as_bytes()) {
                Ok(bytes) => linked.image = Some(bytes),
                Err(e) => warn!("Ignoring undecodable image in deep link: {}", e),
            },
            other => debug!("Ignoring unknown deep link key: {}", other),
        }
    }

    debug!("Deep link opened for recipe {:?}", linked.title);
    Ok(linked)
}

/// Build a shareable link for a recipe; image data is embedded only when asked for
pub fn build_deep_link(
    recipe: &Recipe,
    config: &DeepLinkConfig,
    include_image: bool,
) -> Result<String, RecipeError> {
    let base = format!("{}://{}{}", config.scheme, config.host, config.path);
    let mut url = Url::parse(&base).map_err(|e| RecipeError::DeepLink(e.to_string()))?;

    {
        let mut query = url.query_pairs_mut();
        query
            .append_pair("id", &recipe.id)
            .append_pair("title", &recipe.title)
            .append_pair("preptime", &recipe.prep_time)
            .append_pair("cooktime", &recipe.cook_time)
            .append_pair("cuisine", &recipe.cuisine)
            .append_pair("ingredients", &recipe.ingredients)
            .append_pair("steps", &recipe.steps)
            .append_pair("notes", &recipe.notes)
            .append_pair("url", &recipe.recipe_url);
        if include_image {
            if let Some(image) = &recipe.image_data {
                query.append_pair("image", &STANDARD.encode(image));
            }
        }
    }

    Ok(url.to_string())
}
