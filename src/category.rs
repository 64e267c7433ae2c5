use crate::error::{Error, Result};
use crate::models::{Kind, Page, PageSelector};
use crate::redirect::{PageRef, Resolution};
use crate::thing::Thing;
use crate::wikipedia::{PageInfo, WikipediaApi};
use tracing::{info, warn};

const CATEGORY_PREFIX: &str = "Category:";

/// A category page with its article members and subcategories.
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub page: Page,
    pub members: Vec<Thing>,
    pub subcategories: Vec<Category>,
}

impl Category {
    pub fn new(page_id: u64, title: impl Into<String>) -> Self {
        Self::from_page(Page::new(Kind::Category, page_id, title))
    }

    pub fn from_info(info: &PageInfo) -> Self {
        Self::from_page(Page::from_info(Kind::Category, info))
    }

    fn from_page(page: Page) -> Self {
        Self {
            page,
            members: Vec::new(),
            subcategories: Vec::new(),
        }
    }

    pub fn load(api: &WikipediaApi, page_id: u64) -> Result<Resolution<Category>> {
        let info = match api.page_info(&PageSelector::Id(page_id)) {
            Ok(info) => info,
            Err(Error::NotFound(_)) => return Ok(Resolution::NotFound),
            Err(err) => return Err(err),
        };

        if info.page_id != page_id {
            return Ok(Resolution::Redirected(PageRef::from(&info)));
        }
        if info.ns != 14 {
            return Ok(Resolution::UnsupportedNamespace {
                page_id,
                namespace: info.ns,
            });
        }

        let mut category = Category::from_info(&info);
        category.add_members(api.category_members(page_id)?);

        info!(
            page_id,
            title = %category.page.title,
            members = category.members.len(),
            subcategories = category.subcategories.len(),
            "Loaded category"
        );
        Ok(Resolution::Resolved(category))
    }

    /// Sorts members into articles and subcategories. Other namespaces are logged and dropped.
    pub fn add_members(&mut self, members: Vec<PageInfo>) {
        for member in members {
            match member.ns {
                0 => self.members.push(Thing::from_info(&member)),
                14 => self.subcategories.push(Category::from_info(&member)),
                ns => warn!(
                    category = self.page.page_id(),
                    page_id = member.page_id,
                    ns,
                    title = %member.title,
                    "Unknown type of member"
                ),
            }
        }
    }

    /// Display title (or title) without the `Category:` prefix.
    pub fn label(&self) -> String {
        let label = self.page.label();
        label.strip_prefix(CATEGORY_PREFIX).unwrap_or(label).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(page_id: u64, ns: i64, title: &str) -> PageInfo {
        PageInfo {
            page_id,
            ns,
            title: title.to_string(),
            display_title: None,
            touched: None,
        }
    }

    #[test]
    fn label_strips_prefix() {
        let category = Category::new(4309010, "Category:Villages in Fife");
        assert_eq!(category.label(), "Villages in Fife");
    }

    #[test]
    fn label_prefers_display_title() {
        let mut category = Category::new(1, "Category:Rats");
        category.page.display_title = Some("Category:Rats and mice".to_string());
        assert_eq!(category.label(), "Rats and mice");
    }

    #[test]
    fn partition_members() {
        let mut category = Category::new(4309010, "Category:Villages in Fife");
        category.add_members(vec![
            member(52780, 0, "Anstruther"),
            member(934787, 0, "Ceres, Fife"),
            member(1041471, 14, "Category:Crail"),
            member(2000000, 10, "Template:Fife"),
        ]);

        assert_eq!(category.members.len(), 2);
        assert_eq!(category.subcategories.len(), 1);
        assert_eq!(category.members[1].page.title, "Ceres, Fife");
        assert_eq!(category.subcategories[0].label(), "Crail");
        assert_eq!(
            category.subcategories[0].page.uri(),
            "http://www.dbpedialite.org/categories/1041471#id"
        );
    }
}
