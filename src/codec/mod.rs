pub mod deep_link;
pub mod formatting;
pub mod interchange;
pub mod share;

pub use deep_link::{build_deep_link, parse_deep_link, DeepLinkedRecipe};
pub use formatting::{apply_bullets, number_steps, strip_bullet, strip_step_number, ListFormatter};
pub use interchange::{parse, serialize, ParsedRecipe, Section};
pub use share::share_text;
