//! Data models for a conversion job
//!
//! Everything here is job-scoped and transient: records are produced by one stage
//! and consumed by a later one, nothing is persisted.

use std::collections::BTreeMap;
use std::path::PathBuf;

/// Component identifier reserved for the generated login view
pub const RESERVED_LOGIN_COMPONENT: &str = "Login";

/// Identifiers the generated project declares or imports itself; a page view
/// mapping to one of them would shadow it
pub const RESERVED_COMPONENTS: [&str; 9] = [
    "App",
    "AuthProvider",
    "Footer",
    RESERVED_LOGIN_COMPONENT,
    "Navbar",
    "React",
    "Route",
    "Router",
    "Routes",
];

/// One discovered HTML page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRecord {
    /// Absolute path inside the extract directory
    pub path: PathBuf,
    /// File name without extension (`about` for `about.html`)
    pub name: String,
}

impl PageRecord {
    pub fn new(path: PathBuf, name: impl Into<String>) -> Self {
        Self {
            path,
            name: name.into(),
        }
    }

    /// Identifier of the emitted page view
    pub fn component_name(&self) -> String {
        component_identifier(&self.name)
    }

    /// Router path: `index` maps to `/`, anything else to `/<name>`
    pub fn route(&self) -> String {
        if self.name == "index" {
            "/".to_string()
        } else {
            format!("/{}", self.name)
        }
    }
}

/// Turn a file stem into a React component identifier
///
/// First character capitalized; characters that cannot appear in an identifier
/// are dropped and the following character capitalized. A leading digit gets a
/// `Page` prefix, and a name in [`RESERVED_COMPONENTS`] a `Page` suffix.
pub fn component_identifier(name: &str) -> String {
    let mut ident = String::with_capacity(name.len());
    let mut upper_next = true;

    for ch in name.chars() {
        if ch.is_alphanumeric() || ch == '_' || ch == '$' {
            if upper_next {
                ident.extend(ch.to_uppercase());
                upper_next = false;
            } else {
                ident.push(ch);
            }
        } else {
            upper_next = true;
        }
    }

    if ident.is_empty() {
        return "Page".to_string();
    }
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert_str(0, "Page");
    }
    if RESERVED_COMPONENTS
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(&ident))
    {
        ident.push_str("Page");
    }
    ident
}

/// A non-page file to relocate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRecord {
    /// Absolute path inside the extract directory
    pub path: PathBuf,
    /// Path relative to the extract root
    pub relative_path: PathBuf,
}

/// Result of project analysis
#[derive(Debug, Clone, Default)]
pub struct ProjectInventory {
    pub pages: Vec<PageRecord>,
    pub stylesheets: Vec<AssetRecord>,
    pub scripts: Vec<AssetRecord>,
    /// Images and fonts
    pub assets: Vec<AssetRecord>,
    /// Files matching no category
    pub ignored: usize,
}

impl ProjectInventory {
    pub fn summary(&self) -> String {
        format!(
            "{} page(s), {} stylesheet(s), {} script(s), {} asset(s)",
            self.pages.len(),
            self.stylesheets.len(),
            self.scripts.len(),
            self.assets.len()
        )
    }
}

/// Markup block hoisted into its own reusable view
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FragmentKind {
    Navigation,
    Footer,
}

impl FragmentKind {
    pub const ALL: [FragmentKind; 2] = [FragmentKind::Navigation, FragmentKind::Footer];

    /// Emitted component identifier
    pub fn component_name(self) -> &'static str {
        match self {
            FragmentKind::Navigation => "Navbar",
            FragmentKind::Footer => "Footer",
        }
    }

    /// CSS selector locating the fragment; the first match wins
    pub fn selector(self) -> &'static str {
        match self {
            FragmentKind::Navigation => "nav, .navbar, .navigation, header",
            FragmentKind::Footer => "footer, .footer",
        }
    }
}

/// A discovered shared fragment
#[derive(Debug, Clone)]
pub struct SharedFragment {
    pub kind: FragmentKind,
    /// Page the fragment was taken from
    pub source: PathBuf,
    /// Inner markup already rendered as JSX
    pub jsx: String,
}

/// Shared fragments found in one job
///
/// Built once by the discovery pass and handed to every later step, so all page
/// views of a job agree on which components they reference.
#[derive(Debug, Clone, Default)]
pub struct FragmentRegistry {
    fragments: BTreeMap<FragmentKind, SharedFragment>,
}

impl FragmentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fragment; the first registration of a kind is kept
    pub fn register(&mut self, fragment: SharedFragment) -> bool {
        if self.fragments.contains_key(&fragment.kind) {
            return false;
        }
        self.fragments.insert(fragment.kind, fragment);
        true
    }

    pub fn contains(&self, kind: FragmentKind) -> bool {
        self.fragments.contains_key(&kind)
    }

    pub fn get(&self, kind: FragmentKind) -> Option<&SharedFragment> {
        self.fragments.get(&kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = FragmentKind> + '_ {
        self.fragments.keys().copied()
    }

    pub fn fragments(&self) -> impl Iterator<Item = &SharedFragment> {
        self.fragments.values()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }
}

/// A page view that was written to the output project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedPage {
    pub component: String,
    pub route: String,
    pub source: PathBuf,
}
