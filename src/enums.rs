use serde::{Deserialize, Serialize};

use crate::settings::CsvSettings;

/// Naming convention a property marker was declared under.
///
/// Markers let a property be ignored, renamed or formatted without the core
/// knowing anything about the ecosystem the convention comes from. Each
/// convention other than [`Convention::Native`] can be switched off through
/// [`CsvSettings`], in which case its markers are simply not consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Convention {
    /// The crate's own markers. Always honoured.
    Native,

    /// Data-contract style markers ("non-serialized", data member names).
    ///
    /// Gated by `use_serializer_markers`.
    Serializer,

    /// XML style markers ("xml ignore", element names).
    ///
    /// Gated by `use_xml_markers`.
    Xml,

    /// JSON style markers ("json ignore", property names).
    ///
    /// Gated by `use_json_markers`.
    Json,
}

impl Convention {
    /// All conventions in precedence order. The first enabled rename wins.
    pub const ALL: [Convention; 4] =
        [Convention::Native, Convention::Serializer, Convention::Xml, Convention::Json];

    /// Whether markers declared under this convention are observed for `settings`.
    #[inline]
    pub fn is_enabled(self, settings: &CsvSettings) -> bool {
        match self {
            Convention::Native => true,
            Convention::Serializer => settings.use_serializer_markers,
            Convention::Xml => settings.use_xml_markers,
            Convention::Json => settings.use_json_markers,
        }
    }
}
