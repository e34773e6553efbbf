// ABOUTME: Search preferences module: the persisted ignore-list cache and its editor.
// ABOUTME: Re-exports the store and list-editing types.

pub mod editor;
pub mod store;

pub use editor::IgnoreList;
pub use store::{
    NONE_SENTINEL, SearchPreferences, default_request, load_preferences, load_preferences_from,
    save_preferences, save_preferences_to,
};
