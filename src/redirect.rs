use crate::category::Category;
use crate::error::{Error, Result};
use crate::models::{Entity, PageSelector};
use crate::thing::Thing;
use crate::wikipedia::{PageInfo, WikipediaApi};
use tracing::info;

const ARTICLE_NAMESPACE: i64 = 0;
const CATEGORY_NAMESPACE: i64 = 14;

/// Identity of the page a redirect points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRef {
    pub page_id: u64,
    pub title: String,
}

impl From<&PageInfo> for PageRef {
    fn from(info: &PageInfo) -> Self {
        Self {
            page_id: info.page_id,
            title: info.title.clone(),
        }
    }
}

/// Outcome of looking up a page. Upstream and transport failures travel as `Err` instead.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<T> {
    Resolved(T),
    Redirected(PageRef),
    NotFound,
    UnsupportedNamespace { page_id: u64, namespace: i64 },
}

impl<T> Resolution<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Resolution<U> {
        match self {
            Resolution::Resolved(value) => Resolution::Resolved(f(value)),
            Resolution::Redirected(target) => Resolution::Redirected(target),
            Resolution::NotFound => Resolution::NotFound,
            Resolution::UnsupportedNamespace { page_id, namespace } => {
                Resolution::UnsupportedNamespace { page_id, namespace }
            }
        }
    }

    pub fn resolved(self) -> Option<T> {
        match self {
            Resolution::Resolved(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self, Resolution::Redirected(_))
    }
}

/// Loads things and categories, dispatching on namespace.
pub struct Resolver<'a> {
    api: &'a WikipediaApi,
}

impl<'a> Resolver<'a> {
    pub fn new(api: &'a WikipediaApi) -> Self {
        Self { api }
    }

    pub fn thing(&self, page_id: u64) -> Result<Resolution<Entity>> {
        Ok(Thing::load(self.api, page_id)?.map(Entity::Thing))
    }

    pub fn category(&self, page_id: u64) -> Result<Resolution<Entity>> {
        Ok(Category::load(self.api, page_id)?.map(Entity::Category))
    }

    /// Single lookup of a page id of unknown kind.
    pub fn resolve(&self, page_id: u64) -> Result<Resolution<Entity>> {
        let info = match self.api.page_info(&PageSelector::Id(page_id)) {
            Ok(info) => info,
            Err(Error::NotFound(_)) => return Ok(Resolution::NotFound),
            Err(err) => return Err(err),
        };

        if info.page_id != page_id {
            return Ok(Resolution::Redirected(PageRef::from(&info)));
        }
        self.dispatch(&info)
    }

    /// Like `resolve`, but follows one redirect. Whatever the second lookup yields is returned.
    pub fn resolve_following(&self, page_id: u64) -> Result<Resolution<Entity>> {
        match self.resolve(page_id)? {
            Resolution::Redirected(target) => {
                info!(from = page_id, to = target.page_id, title = %target.title, "Following redirect");
                self.resolve(target.page_id)
            }
            other => Ok(other),
        }
    }

    /// `thing`, following one redirect. The target must itself be an article.
    pub fn thing_following(&self, page_id: u64) -> Result<Resolution<Entity>> {
        self.follow_once(page_id, |id| self.thing(id))
    }

    /// `category`, following one redirect. The target must itself be a category.
    pub fn category_following(&self, page_id: u64) -> Result<Resolution<Entity>> {
        self.follow_once(page_id, |id| self.category(id))
    }

    fn follow_once(
        &self,
        page_id: u64,
        load: impl Fn(u64) -> Result<Resolution<Entity>>,
    ) -> Result<Resolution<Entity>> {
        match load(page_id)? {
            Resolution::Redirected(target) => {
                info!(from = page_id, to = target.page_id, title = %target.title, "Following redirect");
                load(target.page_id)
            }
            other => Ok(other),
        }
    }

    /// Maps a title to its page and loads it. Redirects are reported, not followed.
    pub fn resolve_title(&self, title: &str) -> Result<Resolution<Entity>> {
        let info = match self.api.page_info(&PageSelector::Title(title.to_string())) {
            Ok(info) => info,
            Err(Error::NotFound(_)) => return Ok(Resolution::NotFound),
            Err(err) => return Err(err),
        };
        self.dispatch(&info)
    }

    fn dispatch(&self, info: &PageInfo) -> Result<Resolution<Entity>> {
        match info.ns {
            ARTICLE_NAMESPACE => self.thing(info.page_id),
            CATEGORY_NAMESPACE => self.category(info.page_id),
            namespace => Ok(Resolution::UnsupportedNamespace {
                page_id: info.page_id,
                namespace,
            }),
        }
    }
}
