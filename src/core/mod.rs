//! Domain logic: settings, profile, session, the local style library, and
//! everything that talks to the platform.  Commands in `crate::commands` are
//! thin wrappers over the functions exported here.

pub mod auth;
pub mod config;
pub mod crypto;
pub mod export;
pub mod index;
pub mod paths;
pub mod profile;
pub mod remote;
pub mod settings;
pub mod strutils;
pub mod styles;
pub mod updates;
pub mod usercss;

pub use auth::{current_session, login, logout, session_token, Session};
pub use config::{load_config, AppConfig};
pub use export::{export_library, import_library, ImportSummary};
pub use index::{index_len, open_index_db, refresh_cached_index, refresh_index, search_index};
pub use paths::{get_styledesk_dir, get_styles_dir, is_valid_name};
pub use profile::{read_profile, save_profile, UserProfile};
pub use remote::{
    fetch_compact_index, fetch_preview_data_uri, fetch_style_code, install_style,
    open_style_page, read_style_sources, search_styles, submit_review, CompactStyle, StyleCard,
    StyleSource,
};
pub use settings::{read_settings, store_new_settings, write_settings, PartialSettings, UserSettings};
pub use strutils::slugify_url;
pub use styles::{
    create_style, delete_style, list_styles, machine_name_for, read_style, save_style, Style,
    StyleEntry,
};
pub use updates::{check_style_updates, StyleUpdate, UpdateReport};
