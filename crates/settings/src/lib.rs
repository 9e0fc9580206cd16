pub mod events;
pub mod global;
pub mod project;

mod util;

pub use events::{NoopEvents, SettingsEvents};
pub use global::{GlobalConfig, GlobalConfigError, GlobalConfigStore};
pub use project::{
    load_project_config, project_config_path, save_project_config, update_font_settings,
    FontSettings, ProjectConfig, ProjectConfigError,
};
