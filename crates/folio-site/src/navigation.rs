//! Sidebar navigation tree.

use folio_content::DocSection;
use serde::Serialize;

/// Navigation item with children.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NavItem {
    /// Display title.
    pub title: String,
    /// Link target path (`/web-development/react`).
    pub path: String,
    /// Documents first, then subsections.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NavItem>,
}

/// Navigation tree for the whole site.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Navigation {
    /// One item per top-level section.
    pub items: Vec<NavItem>,
}

impl Navigation {
    pub(crate) fn build(sections: &[DocSection]) -> Self {
        Self {
            items: sections.iter().map(|s| section_item(s, "")).collect(),
        }
    }

    /// Find an item by its path.
    pub fn find(&self, path: &str) -> Option<&NavItem> {
        find_in(&self.items, path)
    }
}

fn section_item(section: &DocSection, parent: &str) -> NavItem {
    let path = format!("{parent}/{}", section.slug);
    let documents = section.items.iter().map(|doc| NavItem {
        title: doc.title().to_owned(),
        path: format!("{path}/{}", doc.slug),
        children: Vec::new(),
    });
    let children = documents
        .chain(section.subsections.iter().map(|child| section_item(child, &path)))
        .collect();
    NavItem {
        title: section.title.clone(),
        path,
        children,
    }
}

fn find_in<'a>(items: &'a [NavItem], path: &str) -> Option<&'a NavItem> {
    items.iter().find_map(|item| {
        if item.path == path {
            Some(item)
        } else {
            find_in(&item.children, path)
        }
    })
}
