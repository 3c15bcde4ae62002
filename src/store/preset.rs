use crate::model::Recipe;

/// Sample recipe added to a freshly created store
pub fn preset_recipe() -> Recipe {
    let mut recipe = Recipe {
        title: "Carnitas Tacos (Slow Cooker)".to_string(),
        prep_time: "25m".to_string(),
        cook_time: "4hrs".to_string(),
        cuisine: "Mexican".to_string(),
        ingredients: [
            "• 4-5lb pork butt shoulder boneless",
            "• 2 medium white onion (chopped or diced)",
            "• 6 cloves of garlic or 3tbsp of minced garlic",
            "• 1/2 cup of chopped cilantro",
            "• 6-10 (depends on spice level) chipotle peppers in adobo sauce",
            "• 1 cup of chicken broth",
            "• 1tsp of chili powder",
            "• 2tsp of ground cumin",
            "• 1tsp of black pepper",
            "• 1 1/2tsp of salt",
            "• 2 limes",
        ]
        .join("\n"),
        steps: [
            "1. Cut pork into chunks & place into slow cooker",
            "2. Pour cup of chicken broth",
            "3. Slice 1 medium white onion, then add it to the pot along with minced garlic or garlic cloves",
            "4. Then add all other spices to pork & mix together",
            "5. Put slow cooker on high to cook for 4hrs",
            "6. Once pork is cooked, shred to your liking then place on baking sheet",
            "7. Broil on high for 5-6 minutes on each side",
            "8. Warm up tortillas & serve w/ lime, chopped onion & cilantro",
        ]
        .join("\n"),
        ..Default::default()
    };
    recipe.nutrition.dairy_free = true;
    recipe.nutrition.gluten_free = true;
    recipe.nutrition.sugar_free = true;
    recipe
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_is_complete() {
        let recipe = preset_recipe();
        assert!(recipe.missing_fields().is_empty());
        assert_eq!(recipe.steps.lines().count(), 8);
    }
}
