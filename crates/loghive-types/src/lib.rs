pub mod card;
pub mod content;
pub mod correlate;
pub mod error;
pub mod message;
pub mod project;
pub mod session;
mod util;

pub use card::{CardType, RenderableMessage};
pub use content::{ContentBlock, blocks_to_text};
pub use correlate::correlate;
pub use error::{Error, Result};
pub use message::{InfoStyle, ParsedMessage, ToolResult};
pub use project::{normalize_project_path, project_id_from_path, project_name_from_path};
pub use session::{ModelCounter, SessionDetail, SessionMetadata, SessionWithProject};
pub use util::{epoch_to_rfc3339, system_time_to_rfc3339, truncate_title};
