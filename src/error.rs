use thiserror::Error;

/// Errors that can occur during recipe box operations
#[derive(Error, Debug)]
pub enum RecipeError {
    /// A required field was left empty before saving
    #[error("{0}")]
    Validation(String),

    /// Nothing was on the clipboard
    #[error("The clipboard is empty.")]
    ClipboardEmpty,

    /// Clipboard text did not contain a recipe
    #[error("No recipe data was found in the clipboard.")]
    NoRecipeFound,

    /// Clipboard did not hold an image
    #[error("No image was found in the clipboard.")]
    NoImageFound,

    /// Deep link could not be handled
    #[error("Invalid deep link: {0}")]
    DeepLink(String),

    /// Persistent store failure
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Web page scan failure
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// Chat assistant failure
    #[error(transparent)]
    Chat(#[from] ChatError),

    /// Failed to fetch a web page
    #[error("Failed to fetch URL: {0}")]
    Fetch(#[from] reqwest::Error),
}

/// Errors raised by the recipe and settings stores
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store could not be opened; callers treat this as unrecoverable
    #[error("Failed to initialize store at {path}: {message}")]
    Init { path: String, message: String },

    /// Reading or writing the backing file failed
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file could not be encoded or decoded
    #[error("Store serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Recipe not found: {0}")]
    RecipeNotFound(String),

    #[error("Folder not found: {0}")]
    FolderNotFound(String),
}

/// Errors raised while scanning a web page for recipe lists
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    /// The page host failed to evaluate the scan
    #[error("An error occurred while scanning the web page: {0}")]
    Evaluation(String),

    /// None of the list categories matched anything
    #[error("No keywords found on the webpage.")]
    NothingFound,

    /// A scan is already running against this page
    #[error("A scan is already in progress.")]
    AlreadyScanning,
}

/// Errors raised by the chat assistant
#[derive(Error, Debug)]
pub enum ChatError {
    /// The daily message allowance is used up
    #[error("You've hit the maximum number of messages allowed for today.")]
    QuotaExceeded,

    #[error("Chat API key not found in config or environment")]
    MissingApiKey,

    #[error("Chat request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Chat service returned status {0}")]
    Status(u16),

    /// The event stream broke off or was malformed
    #[error("Chat stream error: {0}")]
    Stream(String),

    /// Quota bookkeeping could not be persisted
    #[error(transparent)]
    Store(#[from] StoreError),
}
