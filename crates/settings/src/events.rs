use crate::project::FontSettings;

/// 設定變更通知的接收端；由展示層實作。 / Receives settings-changed notifications; implemented by the presentation layer.
pub trait SettingsEvents {
    /// 新的字型設定已儲存；僅通知，不需回覆。 / A new font-settings record was saved; fire-and-forget, no acknowledgment.
    fn font_settings_updated(&self, settings: &FontSettings);
}

/// 忽略所有通知的預設接收端。 / Listener that ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopEvents;

impl SettingsEvents for NoopEvents {
    fn font_settings_updated(&self, _settings: &FontSettings) {}
}
