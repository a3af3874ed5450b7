//! HTML form payloads for adding categories and pages.

use serde::Deserialize;

use crate::db::{category::validate_name, page};

#[derive(Debug, Default, Clone, Deserialize)]
pub struct CategoryForm {
    #[serde(default)]
    pub name: String,
}

impl CategoryForm {
    /// Returns the trimmed name, or the messages to show next to the form.
    pub fn clean(&self) -> Result<String, Vec<String>> {
        match validate_name(&self.name) {
            Ok(_) => Ok(self.name.trim().to_string()),
            Err(e) => Err(vec![e.to_string()]),
        }
    }
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct PageForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanPage {
    pub title: String,
    pub url: String,
}

impl PageForm {
    pub fn clean(&self) -> Result<CleanPage, Vec<String>> {
        let title = page::validate_title(&self.title).map(str::to_string);
        let url = page::clean_url(&self.url);

        match (title, url) {
            (Ok(title), Ok(url)) => Ok(CleanPage { title, url }),
            (title, url) => Err(title
                .err()
                .into_iter()
                .chain(url.err())
                .map(|e| e.to_string())
                .collect()),
        }
    }
}
