#[cfg(test)]
mod tests {
    use recipe_box::clipboard::{self, Clipboard, MemoryClipboard};
    use recipe_box::codec::{build_deep_link, parse_deep_link};
    use recipe_box::config::DeepLinkConfig;
    use recipe_box::{import_from_clipboard, JsonFileStore, Recipe, RecipeError, RecipeStore};

    #[test]
    fn test_link_imports_through_clipboard() {
        let config = DeepLinkConfig::default();
        let shared = Recipe {
            id: "shared-1".to_string(),
            title: "Ropa Vieja".to_string(),
            prep_time: "20m".to_string(),
            cook_time: "3hrs".to_string(),
            cuisine: "Cuban".to_string(),
            ingredients: "• flank steak\n• peppers".to_string(),
            steps: "1. braise\n2. shred".to_string(),
            image_data: Some(vec![0xFF, 0xD8, 0xFF]),
            ..Default::default()
        };

        let link = build_deep_link(&shared, &config, true).unwrap();
        let linked = parse_deep_link(&link, &config).unwrap();

        let board = MemoryClipboard::new();
        clipboard::stage_deep_link(&linked, &board);
        assert!(board.text().unwrap().starts_with("T:Ropa Vieja\n"));

        let mut store = JsonFileStore::in_memory();
        let saved = import_from_clipboard(&mut store, &board).unwrap();
        assert_eq!(saved.title, "Ropa Vieja");
        assert_eq!(saved.cuisine, "Cuban");
        assert_eq!(saved.steps, "1. braise\n2. shred");
        assert_eq!(saved.image_data, Some(vec![0xFF, 0xD8, 0xFF]));
        assert!(store.get(&saved.id).is_some());
    }

    #[test]
    fn test_custom_scheme() {
        let config = DeepLinkConfig {
            scheme: "recipebox".to_string(),
            host: "import".to_string(),
            path: "/".to_string(),
        };
        let linked = parse_deep_link("recipebox://import/?title=Flan", &config).unwrap();
        assert_eq!(linked.title.as_deref(), Some("Flan"));

        let err = parse_deep_link("reciperealm://recipe/new?title=Flan", &config).unwrap_err();
        assert!(matches!(err, RecipeError::DeepLink(_)));
    }

    #[test]
    fn test_partial_link_is_not_a_recipe() {
        let linked = parse_deep_link(
            "reciperealm://recipe/new?title=Only%20a%20title",
            &DeepLinkConfig::default(),
        )
        .unwrap();
        let board = MemoryClipboard::new();
        clipboard::stage_deep_link(&linked, &board);

        let mut store = JsonFileStore::in_memory();
        let err = import_from_clipboard(&mut store, &board).unwrap_err();
        assert!(matches!(err, RecipeError::NoRecipeFound));
    }
}
