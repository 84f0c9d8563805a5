//! Static resource declarations: the dashboard and the `posts` collection.

use serde::Serialize;

pub const DASHBOARD: &str = "dashboard";
pub const POSTS: &str = "posts";

const TITLE_SUFFIX: &str = "refine";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    List,
    Show,
    Edit,
}

/// A named, routable collection and its page paths.
///
/// Paths use `:id` as the record placeholder.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub name: &'static str,
    pub label: &'static str,
    #[serde(skip)]
    pub singular: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edit: Option<&'static str>,
}

impl Resource {
    #[must_use]
    pub fn route(&self, action: Action) -> Option<&'static str> {
        match action {
            Action::List => self.list,
            Action::Show => self.show,
            Action::Edit => self.edit,
        }
    }

    /// Concrete path for `action`, with `:id` replaced when given.
    #[must_use]
    pub fn path(&self, action: Action, id: Option<&str>) -> Option<String> {
        let route = self.route(action)?;
        match id {
            Some(id) => Some(route.replace(":id", id)),
            None if route.contains(":id") => None,
            None => Some(route.to_string()),
        }
    }

    /// Document title for a page of this resource.
    #[must_use]
    pub fn title(&self, action: Action, id: Option<&str>) -> String {
        match (action, id) {
            (Action::List, _) => format!("{} | {TITLE_SUFFIX}", self.label),
            (Action::Show, Some(id)) => format!("#{id} Show {} | {TITLE_SUFFIX}", self.singular),
            (Action::Edit, Some(id)) => format!("#{id} Edit {} | {TITLE_SUFFIX}", self.singular),
            (Action::Show, None) => format!("Show {} | {TITLE_SUFFIX}", self.singular),
            (Action::Edit, None) => format!("Edit {} | {TITLE_SUFFIX}", self.singular),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub name: &'static str,
    pub label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<&'static str>,
    pub path: &'static str,
}

#[derive(Debug, Clone)]
pub struct Resources {
    items: Vec<Resource>,
}

impl Resources {
    /// The panel's declared resources, in menu order.
    #[must_use]
    pub fn declared() -> Self {
        Self {
            items: vec![
                Resource {
                    name: DASHBOARD,
                    label: "Dashboard",
                    singular: "Dashboard",
                    icon: Some("dashboard"),
                    list: Some("/"),
                    show: None,
                    edit: None,
                },
                Resource {
                    name: POSTS,
                    label: "Posts",
                    singular: "Post",
                    icon: None,
                    list: Some("/posts"),
                    show: Some("/posts/show/:id"),
                    edit: Some("/posts/edit/:id"),
                },
            ],
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Resource> {
        self.items.iter().find(|r| r.name == name)
    }

    #[must_use]
    pub fn iter(&self) -> std::slice::Iter<'_, Resource> {
        self.items.iter()
    }

    /// Navigation entries for every resource with a list page.
    #[must_use]
    pub fn menu(&self) -> Vec<MenuItem> {
        self.items
            .iter()
            .filter_map(|r| {
                r.list.map(|path| MenuItem {
                    name: r.name,
                    label: r.label,
                    icon: r.icon,
                    path,
                })
            })
            .collect()
    }

    /// Path of a resource page, when the resource declares it.
    #[must_use]
    pub fn path(&self, name: &str, action: Action, id: Option<&str>) -> Option<String> {
        self.get(name)?.path(action, id)
    }
}

impl Default for Resources {
    fn default() -> Self {
        Self::declared()
    }
}
