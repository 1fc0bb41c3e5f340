//! Translation table for notices emitted by the screens.

use marketdesk_core::{AppError, Language};

/// Notice templates. `{label}` is replaced by the localized record label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    /// Collection fetch failed.
    LoadFailed,
    /// Create succeeded.
    Created,
    /// Create failed.
    CreateFailed,
    /// Update succeeded.
    Updated,
    /// Update failed.
    UpdateFailed,
    /// Delete succeeded.
    Deleted,
    /// Delete failed.
    DeleteFailed,
    /// Request approved.
    Approved,
    /// Request rejected.
    Rejected,
    /// Review decision failed.
    ReviewFailed,
    /// Label shown instead of actions on an approved request.
    AlreadyApproved,
    /// Label shown instead of actions on a rejected request.
    AlreadyRejected,
    /// Interface language changed.
    LanguageChanged,
}

fn template(language: Language, key: MessageKey) -> &'static str {
    match (language, key) {
        (Language::En, MessageKey::LoadFailed) => "Failed to load {label} list",
        (Language::En, MessageKey::Created) => "{label} created successfully",
        (Language::En, MessageKey::CreateFailed) => "Failed to create {label}",
        (Language::En, MessageKey::Updated) => "{label} updated successfully",
        (Language::En, MessageKey::UpdateFailed) => "Failed to update {label}",
        (Language::En, MessageKey::Deleted) => "{label} deleted successfully",
        (Language::En, MessageKey::DeleteFailed) => "Failed to delete {label}",
        (Language::En, MessageKey::Approved) => "{label} approved",
        (Language::En, MessageKey::Rejected) => "{label} rejected",
        (Language::En, MessageKey::ReviewFailed) => "Failed to review {label}",
        (Language::En, MessageKey::AlreadyApproved) => "Already approved",
        (Language::En, MessageKey::AlreadyRejected) => "Already rejected",
        (Language::En, MessageKey::LanguageChanged) => "Language set to English",
        (Language::Ar, MessageKey::LoadFailed) => "فشل تحميل قائمة {label}",
        (Language::Ar, MessageKey::Created) => "تم إنشاء {label} بنجاح",
        (Language::Ar, MessageKey::CreateFailed) => "فشل إنشاء {label}",
        (Language::Ar, MessageKey::Updated) => "تم تحديث {label} بنجاح",
        (Language::Ar, MessageKey::UpdateFailed) => "فشل تحديث {label}",
        (Language::Ar, MessageKey::Deleted) => "تم حذف {label} بنجاح",
        (Language::Ar, MessageKey::DeleteFailed) => "فشل حذف {label}",
        (Language::Ar, MessageKey::Approved) => "تمت الموافقة على {label}",
        (Language::Ar, MessageKey::Rejected) => "تم رفض {label}",
        (Language::Ar, MessageKey::ReviewFailed) => "فشلت مراجعة {label}",
        (Language::Ar, MessageKey::AlreadyApproved) => "تمت الموافقة مسبقاً",
        (Language::Ar, MessageKey::AlreadyRejected) => "تم الرفض مسبقاً",
        (Language::Ar, MessageKey::LanguageChanged) => "تم تغيير اللغة إلى العربية",
    }
}

/// Returns the localized label for a record type.
#[must_use]
pub fn record_label(language: Language, label: &str) -> String {
    let localized = match (language, label) {
        (Language::Ar, "admin") => "المسؤول",
        (Language::Ar, "category") => "الفئة",
        (Language::Ar, "area") => "المنطقة",
        (Language::Ar, "governorate") => "المحافظة",
        (Language::Ar, "plan") => "الخطة",
        (Language::Ar, "subscription") => "الاشتراك",
        (Language::Ar, "subscription request") => "طلب الاشتراك",
        _ => label,
    };

    match language {
        Language::En => capitalize(localized),
        Language::Ar => localized.to_owned(),
    }
}

fn capitalize(value: &str) -> String {
    let mut characters = value.chars();
    match characters.next() {
        Some(first) => first.to_uppercase().chain(characters).collect(),
        None => String::new(),
    }
}

/// Renders a notice message for a record type.
#[must_use]
pub fn render(language: Language, key: MessageKey, label: &str) -> String {
    let label = match language {
        Language::En if !template(language, key).starts_with("{label}") => {
            label.to_owned()
        }
        _ => record_label(language, label),
    };
    template(language, key).replace("{label}", label.as_str())
}

/// Renders a failure notice with the error detail appended.
#[must_use]
pub fn render_failure(language: Language, key: MessageKey, label: &str, error: &AppError) -> String {
    format!("{}: {error}", render(language, key, label))
}
