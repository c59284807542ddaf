mod continuation;
mod cursor;
mod error;
mod event;
mod phase;
mod scene;
mod session;
mod story_draft;

pub use continuation::*;
pub use cursor::*;
pub use error::*;
pub use event::*;
pub use phase::*;
pub use scene::*;
pub use session::*;
pub use story_draft::*;

pub use taleweave_client::StoryClient;
pub use taleweave_client::StoryClientBox;
