//! Closed vocabularies of the mask grammar
//!
//! Mask components are classified by membership in these registries, not by
//! position: `NOTE.AC.ENG@X` and `NOTE.ENG.AC@X` describe the same mask.
//! Classification checks areas first, then status, access and format. The
//! four registries are disjoint, so the priority order only becomes visible
//! if they ever drift.

use serde::{Deserialize, Serialize};

/// Registered knowledge-area codes.
pub const AREAS: &[&str] = &[
    "LLM", "MED", "ENG", "HYP", "HLTH", "ACC", "KB", "LNX", "WIN", "TRIZ", "SYSAN", "DEV", "ELEC",
    "CNMKT",
];

/// Returns true if `token` is a registered knowledge-area code.
pub fn is_area(token: &str) -> bool {
    AREAS.contains(&token)
}

/// Lifecycle status of a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    /// Being written
    #[serde(rename = "DRA")]
    Draft,

    /// Actively maintained
    #[serde(rename = "AC")]
    Active,

    /// On hold
    #[serde(rename = "PAU")]
    Paused,

    /// Finished
    #[serde(rename = "DON")]
    Done,

    /// Kept for history only
    #[serde(rename = "DEP")]
    Deprecated,
}

impl Status {
    /// Returns the grammar code for this status.
    pub fn code(&self) -> &'static str {
        match self {
            Status::Draft => "DRA",
            Status::Active => "AC",
            Status::Paused => "PAU",
            Status::Done => "DON",
            Status::Deprecated => "DEP",
        }
    }

    /// Looks a status up by its grammar code.
    pub fn from_code(code: &str) -> Option<Status> {
        Status::all().iter().copied().find(|s| s.code() == code)
    }

    /// Returns all status values.
    pub fn all() -> &'static [Status] {
        &[
            Status::Draft,
            Status::Active,
            Status::Paused,
            Status::Done,
            Status::Deprecated,
        ]
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::from_code(s).ok_or_else(|| format!("Unknown status code: {}", s))
    }
}

/// Access level of a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Access {
    /// Shareable outside the vault
    #[serde(rename = "PUB")]
    Public,

    /// Vault-internal
    #[serde(rename = "INT")]
    Internal,

    /// Personal
    #[serde(rename = "PRV")]
    Private,
}

impl Access {
    /// Returns the grammar code for this access level.
    pub fn code(&self) -> &'static str {
        match self {
            Access::Public => "PUB",
            Access::Internal => "INT",
            Access::Private => "PRV",
        }
    }

    /// Looks an access level up by its grammar code.
    pub fn from_code(code: &str) -> Option<Access> {
        Access::all().iter().copied().find(|a| a.code() == code)
    }

    /// Returns all access values.
    pub fn all() -> &'static [Access] {
        &[Access::Public, Access::Internal, Access::Private]
    }
}

impl std::fmt::Display for Access {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Access {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Access::from_code(s).ok_or_else(|| format!("Unknown access code: {}", s))
    }
}

/// Primary format of a note's payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Format {
    /// Markdown text
    #[serde(rename = "MD")]
    Markdown,

    /// Packed glTF model
    #[serde(rename = "GLB")]
    Glb,

    /// CAD source
    #[serde(rename = "CAD")]
    Cad,

    /// PDF document
    #[serde(rename = "PDF")]
    Pdf,

    /// Raster image
    #[serde(rename = "PNG")]
    Png,

    /// Source code
    #[serde(rename = "SRC")]
    Source,
}

impl Format {
    /// Returns the grammar code for this format.
    pub fn code(&self) -> &'static str {
        match self {
            Format::Markdown => "MD",
            Format::Glb => "GLB",
            Format::Cad => "CAD",
            Format::Pdf => "PDF",
            Format::Png => "PNG",
            Format::Source => "SRC",
        }
    }

    /// Looks a format up by its grammar code.
    pub fn from_code(code: &str) -> Option<Format> {
        Format::all().iter().copied().find(|f| f.code() == code)
    }

    /// Returns all format values.
    pub fn all() -> &'static [Format] {
        &[
            Format::Markdown,
            Format::Glb,
            Format::Cad,
            Format::Pdf,
            Format::Png,
            Format::Source,
        ]
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Format::from_code(s).ok_or_else(|| format!("Unknown format code: {}", s))
    }
}

/// A classified mask component.
///
/// The grammar captures up to six positional tokens after the entity; each
/// one lands here. Tokens outside every registry are dropped by the parser
/// rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Component {
    Area(String),
    Status(Status),
    Access(Access),
    Format(Format),
    Unrecognized,
}

impl Component {
    /// Classifies a captured token. Areas win over status, status over
    /// access, access over format.
    pub fn classify(token: &str) -> Component {
        if is_area(token) {
            Component::Area(token.to_string())
        } else if let Some(status) = Status::from_code(token) {
            Component::Status(status)
        } else if let Some(access) = Access::from_code(token) {
            Component::Access(access)
        } else if let Some(format) = Format::from_code(token) {
            Component::Format(format)
        } else {
            Component::Unrecognized
        }
    }
}
