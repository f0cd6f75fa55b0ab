//! Discovery document model and link selection strategies

use crate::path_resolver::{DEFAULT_EXTENSION, group_name_to_slug};
use crate::types::ResourceLink;
use serde::Deserialize;
use url::Url;

/// Support levels, lowest first
pub const SUPPORT_LEVELS: &[&str] = &["internal", "alpha", "beta", "production"];

/// File name of the link-less groups index published next to the documents
pub const GROUPS_INDEX_FILE_NAME: &str = "groups.json";

/// Whether `url` points at a groups index rather than a resource-groups document
///
/// A groups index names groups without listing their links, so it is paired
/// with [`SupportLevelSelector`] and slug file names.
///
/// ```
/// use api_docs_dl::discovery::is_groups_index;
/// use url::Url;
///
/// assert!(is_groups_index(&Url::parse("https://x/rest_docs/1/groups.json").unwrap()));
/// assert!(!is_groups_index(&Url::parse("https://x/a/resource_groups").unwrap()));
/// ```
#[must_use]
pub fn is_groups_index(url: &Url) -> bool {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .is_some_and(|last| last == GROUPS_INDEX_FILE_NAME)
}

/// Index document enumerating groups of downloadable documents
///
/// Both `{"groups": [...]}` and a bare array of groups are accepted.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum DiscoveryDocument {
    /// `{"groups": [...]}`
    Groups {
        /// Groups in document order
        groups: Vec<Group>,
    },
    /// `[...]`
    List(Vec<Group>),
}

impl DiscoveryDocument {
    /// Groups in document order
    #[must_use]
    pub fn groups(&self) -> &[Group] {
        match self {
            DiscoveryDocument::Groups { groups } | DiscoveryDocument::List(groups) => groups,
        }
    }

    /// Consume into the groups
    #[must_use]
    pub fn into_groups(self) -> Vec<Group> {
        match self {
            DiscoveryDocument::Groups { groups } | DiscoveryDocument::List(groups) => groups,
        }
    }
}

/// Named group of document versions
#[derive(Clone, Debug, Deserialize)]
pub struct Group {
    /// Display name, e.g. "Line Item Types (Cost Types)"
    pub name: String,

    /// Document locators, oldest first
    #[serde(default)]
    pub links: Vec<Link>,

    /// Most stable support level of the group's endpoints, if published
    #[serde(default)]
    pub highest_support_level: Option<String>,
}

/// A document locator: a bare string or an object with an `href`/`url` field
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Link {
    /// `"/a/todos?v=2"`
    Href(String),
    /// `{"href": "/a/todos?v=2"}`
    Object {
        /// The locator
        #[serde(alias = "url")]
        href: String,
    },
}

impl Link {
    /// The locator string
    #[must_use]
    pub fn href(&self) -> &str {
        match self {
            Link::Href(href) | Link::Object { href } => href,
        }
    }
}

/// Strategy for choosing which documents to download
///
/// Closures of type `Fn(&[Group]) -> Vec<ResourceLink>` implement this trait.
pub trait GroupSelector: Send + Sync {
    /// Links to download, in download order
    fn select(&self, groups: &[Group]) -> Vec<ResourceLink>;
}

impl<F> GroupSelector for F
where
    F: Fn(&[Group]) -> Vec<ResourceLink> + Send + Sync,
{
    fn select(&self, groups: &[Group]) -> Vec<ResourceLink> {
        self(groups)
    }
}

/// Select the last (most recent) link of every group (default)
#[derive(Clone, Copy, Debug, Default)]
pub struct LastLinkPerGroup;

impl GroupSelector for LastLinkPerGroup {
    fn select(&self, groups: &[Group]) -> Vec<ResourceLink> {
        groups
            .iter()
            .filter_map(|group| {
                group
                    .links
                    .last()
                    .map(|link| ResourceLink::new(&group.name, link.href()))
            })
            .collect()
    }
}

/// Select groups at or above a support level, each as `{slug}.json`
///
/// This matches the older `groups.json` index, which lists groups without
/// links; each group's document sits next to the index under the group's slug.
#[derive(Clone, Debug)]
pub struct SupportLevelSelector {
    min_rank: usize,
}

impl Default for SupportLevelSelector {
    fn default() -> Self {
        Self {
            min_rank: SUPPORT_LEVELS.len() - 1,
        }
    }
}

impl SupportLevelSelector {
    /// Select groups at `min_level` or above; `None` if the level is unknown
    #[must_use]
    pub fn new(min_level: &str) -> Option<Self> {
        support_rank(min_level).map(|min_rank| Self { min_rank })
    }
}

impl GroupSelector for SupportLevelSelector {
    fn select(&self, groups: &[Group]) -> Vec<ResourceLink> {
        groups
            .iter()
            .filter(|group| {
                let level = group.highest_support_level.as_deref().unwrap_or_default();
                match support_rank(level) {
                    Some(rank) => rank >= self.min_rank,
                    None => {
                        tracing::debug!(group = %group.name, level = ?level, "unrecognized highest_support_level");
                        false
                    }
                }
            })
            .map(|group| {
                let href = format!("{}.{DEFAULT_EXTENSION}", group_name_to_slug(&group.name));
                ResourceLink::new(&group.name, href)
            })
            .collect()
    }
}

fn support_rank(level: &str) -> Option<usize> {
    SUPPORT_LEVELS.iter().position(|l| *l == level)
}
