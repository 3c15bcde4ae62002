use std::env;
use std::io::Read;
use std::process;

use chrono::Local;
use log::error;

use recipe_box::chat::{ChatSession, OpenAiChatService};
use recipe_box::clipboard::{self, Clipboard, MemoryClipboard};
use recipe_box::codec::{self, parse_deep_link};
use recipe_box::config::RecipeBoxConfig;
use recipe_box::settings::{DailyQuota, SettingsStore};
use recipe_box::store::{folder_summaries, matches_search, RecipeSort, RecipeStore};
use recipe_box::{import_from_clipboard, open_store, scan_url, JsonFileStore, Recipe};

const USAGE: &str = "Usage: recipe-box <command>

Commands:
  list [search]       List saved recipes, optionally filtered
  export <id>         Print a recipe as interchange text
  share <id>          Print a recipe in the readable share layout
  import <file|->     Save a recipe from interchange text
  scan <url>          Scan a web page for ingredient and step lists
  chat <message>      Ask the recipe assistant
  deep-link <url>     Save the recipe carried by a deep link
  folders             List folders with their recipe counts";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let command = args.get(1).ok_or(USAGE)?;
    let argument = args.get(2).map(String::as_str);
    let config = RecipeBoxConfig::load()?;

    match (command.as_str(), argument) {
        ("scan", Some(url)) => {
            let result = scan_url(url, &config.scan).await?;
            print!("{}", result.report());
        }
        ("chat", Some(message)) => {
            let mut settings = SettingsStore::open(&config.settings.path)?;
            let service = OpenAiChatService::new(&config.chat)?;
            let mut session = ChatSession::new(DailyQuota::new(config.chat.daily_limit));
            session
                .send(message, &service, &mut settings, Local::now().date_naive())
                .await?;
            if let Some(reply) = session.last_reply() {
                println!("{}", reply.content);
            }
        }
        ("list", search) => {
            let store = open_or_exit(&config);
            let search = search.unwrap_or_default();
            for recipe in store.fetch(&|r: &Recipe| matches_search(r, search), RecipeSort::Title) {
                println!("{}\t{}\t{}", recipe.id, recipe.title, recipe.cuisine);
            }
        }
        ("export", Some(id)) => {
            let store = open_or_exit(&config);
            let pasteboard = MemoryClipboard::new();
            recipe_box::copy_recipe(&store, id, &pasteboard)?;
            println!("{}", pasteboard.text().unwrap_or_default());
        }
        ("import", Some(source)) => {
            let text = if source == "-" {
                let mut text = String::new();
                std::io::stdin().read_to_string(&mut text)?;
                text
            } else {
                tokio::fs::read_to_string(source).await?
            };
            let mut store = open_or_exit(&config);
            let recipe = import_from_clipboard(&mut store, &MemoryClipboard::with_text(text))?;
            println!("{}", recipe.id);
        }
        ("deep-link", Some(link)) => {
            let linked = parse_deep_link(link, &config.deep_link)?;
            let pasteboard = MemoryClipboard::new();
            clipboard::stage_deep_link(&linked, &pasteboard);
            let mut store = open_or_exit(&config);
            let recipe = import_from_clipboard(&mut store, &pasteboard)?;
            println!("{}", recipe.id);
        }
        ("share", Some(id)) => {
            let store = open_or_exit(&config);
            let recipe = store.get(id).ok_or_else(|| format!("Recipe not found: {}", id))?;
            print!("{}", codec::share_text(&recipe));
        }
        ("folders", _) => {
            let store = open_or_exit(&config);
            for (folder, count) in folder_summaries(&store) {
                println!("{}\t{}\t{}", folder.id, folder.name, count);
            }
        }
        _ => {
            eprintln!("{}", USAGE);
            process::exit(2);
        }
    }
    Ok(())
}

/// The store is required for every recipe command; without it there is nothing to do
fn open_or_exit(config: &RecipeBoxConfig) -> JsonFileStore {
    match open_store(config) {
        Ok(store) => store,
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", e);
            process::exit(1);
        }
    }
}
