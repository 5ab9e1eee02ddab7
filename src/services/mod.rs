pub mod chat;
pub mod metadata;
pub mod poster;
pub mod providers;
pub mod rating;
pub mod recommendations;
pub mod sessions;
pub mod suggestions;

pub use chat::{ChatEngine, ChatSession, ChatState};
pub use metadata::MetadataClient;
pub use poster::PosterResolver;
pub use sessions::SessionStore;
pub use suggestions::SuggestionEngine;
