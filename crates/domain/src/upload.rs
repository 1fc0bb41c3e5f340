use marketdesk_core::{AppError, AppResult};

/// Maximum category icon size in bytes.
pub const ICON_MAX_BYTES: usize = 2 * 1024 * 1024;

/// Maximum payment proof size in bytes.
pub const PAYMENT_PROOF_MAX_BYTES: usize = 5 * 1024 * 1024;

/// Acceptance rule applied to a file before it is attached to a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadRule {
    accepted_prefixes: &'static [&'static str],
    max_bytes: usize,
}

impl UploadRule {
    /// Images only, up to [`ICON_MAX_BYTES`].
    pub const ICON: Self = Self {
        accepted_prefixes: &["image/"],
        max_bytes: ICON_MAX_BYTES,
    };

    /// Images or PDF documents, up to [`PAYMENT_PROOF_MAX_BYTES`].
    pub const PAYMENT_PROOF: Self = Self {
        accepted_prefixes: &["image/", "application/pdf"],
        max_bytes: PAYMENT_PROOF_MAX_BYTES,
    };

    /// Returns the maximum accepted size in bytes.
    #[must_use]
    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Checks an already built file against this rule.
    pub fn admits(&self, file: &UploadFile) -> AppResult<()> {
        self.check(file.content_type(), file.bytes().len())
    }

    fn check(&self, content_type: &str, len: usize) -> AppResult<()> {
        if !self
            .accepted_prefixes
            .iter()
            .any(|prefix| content_type.starts_with(prefix))
        {
            return Err(AppError::Validation(format!(
                "file type '{content_type}' is not accepted"
            )));
        }

        if len == 0 {
            return Err(AppError::Validation("file must not be empty".to_owned()));
        }

        if len > self.max_bytes {
            return Err(AppError::Validation(format!(
                "file must not exceed {} bytes",
                self.max_bytes
            )));
        }

        Ok(())
    }
}

/// A file picked by the administrator, validated against an [`UploadRule`].
#[derive(Clone, PartialEq, Eq)]
pub struct UploadFile {
    file_name: String,
    content_type: String,
    bytes: Vec<u8>,
}

impl UploadFile {
    /// Creates a file after checking MIME-type prefix and size.
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
        rule: UploadRule,
    ) -> AppResult<Self> {
        let file_name = file_name.into().trim().to_owned();
        let content_type = content_type.into().trim().to_ascii_lowercase();

        if file_name.is_empty() {
            return Err(AppError::Validation(
                "file name must not be empty".to_owned(),
            ));
        }

        rule.check(content_type.as_str(), bytes.len())?;

        Ok(Self {
            file_name,
            content_type,
            bytes,
        })
    }

    /// Returns the original file name.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.file_name.as_str()
    }

    /// Returns the lowercased MIME type.
    #[must_use]
    pub fn content_type(&self) -> &str {
        self.content_type.as_str()
    }

    /// Returns the file contents.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl std::fmt::Debug for UploadFile {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("UploadFile")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}
