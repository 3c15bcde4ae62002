use crate::model::{NutritionFlag, Recipe};

fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.is_empty() {
        placeholder
    } else {
        value
    }
}

/// Readable text handed to the share sheet
///
/// Unlike the interchange format this uses full labels and placeholders for empty
/// fields, so it is meant for people rather than for re-import.
pub fn share_text(recipe: &Recipe) -> String {
    let mut text = format!(
        "Recipe: {}\nCuisine: {}\nPrep Time: {}\nCook Time: {}\n\nIngredients:\n{}\n\nSteps:\n{}\n\nNotes:\n{}\n",
        or_placeholder(&recipe.title, "Untitled Recipe"),
        or_placeholder(&recipe.cuisine, "N/A"),
        or_placeholder(&recipe.prep_time, "N/A"),
        or_placeholder(&recipe.cook_time, "N/A"),
        or_placeholder(&recipe.ingredients, "No ingredients provided"),
        or_placeholder(&recipe.steps, "No steps provided"),
        or_placeholder(&recipe.notes, "No notes available"),
    );

    for flag in NutritionFlag::ALL {
        let answer = if recipe.nutrition.get(flag) { "Yes" } else { "No" };
        text.push_str(&format!("\n{}: {}", flag.label(), answer));
    }
    text
}
