//! Built-in wiki templates using the Tera template engine
//!
//! All templates are embedded in the binary. Autoescaping stays on for the
//! `.html` templates since titles and form values come from users; rendered
//! entry HTML is marked `safe` explicitly.

use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Filter, Tera};

use crate::error::Result;
use crate::helpers::{edit_url, entry_url, html_escape, new_url, search_url};

/// Stylesheet served at `/styles.css`
pub const STYLESHEET: &str = include_str!("wiki/styles.css");

/// Template renderer with the embedded wiki theme
pub struct TemplateRenderer {
    tera: Tera,
    site: SiteData,
}

impl TemplateRenderer {
    /// Create a new renderer with all wiki templates loaded
    pub fn new(site_title: &str) -> Result<Self> {
        let mut tera = Tera::default();

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("wiki/layout.html")),
            ("index.html", include_str!("wiki/index.html")),
            ("entry.html", include_str!("wiki/entry.html")),
            ("search.html", include_str!("wiki/search.html")),
            ("form.html", include_str!("wiki/form.html")),
            ("error.html", include_str!("wiki/error.html")),
        ])?;

        // URL filters escape their own output, see `UrlFilter`
        tera.register_filter("entry_url", UrlFilter(entry_url));
        tera.register_filter("edit_url", UrlFilter(edit_url));
        tera.register_filter("new_url", UrlFilter(new_url));
        tera.register_filter("search_url", UrlFilter(search_url));

        Ok(Self {
            tera,
            site: SiteData {
                title: site_title.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        let mut context = context.clone();
        context.insert("site", &self.site);
        Ok(self.tera.render(template_name, &context)?)
    }

    /// List of all entries
    pub fn index(&self, entries: &[String]) -> Result<String> {
        let mut context = Context::new();
        context.insert("entries", entries);
        self.render("index.html", &context)
    }

    /// A single rendered entry
    pub fn entry(&self, entry: &EntryData) -> Result<String> {
        let mut context = Context::new();
        context.insert("entry", entry);
        self.render("entry.html", &context)
    }

    /// Title search results
    pub fn search(&self, query: &str, results: &[String]) -> Result<String> {
        let mut context = Context::new();
        context.insert("query", query);
        context.insert("results", results);
        self.render("search.html", &context)
    }

    /// Create or edit form
    pub fn form(&self, form: &FormData) -> Result<String> {
        let mut context = Context::new();
        context.insert("form", form);
        self.render("form.html", &context)
    }

    /// Error page. `missing` names a title the user looked for, which adds
    /// search and create links.
    pub fn error(&self, message: &str, missing: Option<&str>) -> Result<String> {
        let mut context = Context::new();
        context.insert("message", message);
        context.insert("missing", &missing);
        self.render("error.html", &context)
    }
}

/// Tera filter turning a title into an HTML-escaped URL.
///
/// Marked safe so Tera's autoescape does not mangle the `/` separators.
struct UrlFilter(fn(&str) -> String);

impl Filter for UrlFilter {
    fn filter(
        &self,
        value: &tera::Value,
        _args: &HashMap<String, tera::Value>,
    ) -> tera::Result<tera::Value> {
        let s = tera::try_get_value!("url", "value", String, value);
        Ok(tera::Value::String(html_escape(&(self.0)(&s))))
    }

    fn is_safe(&self) -> bool {
        true
    }
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EntryData {
    pub title: String,
    /// Rendered HTML
    pub content: String,
    pub updated: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct FormData {
    pub page_title: String,
    pub heading: String,
    pub submit: String,
    /// Title of the entry being edited, `None` when creating
    pub original: Option<String>,
    pub title: String,
    pub content: String,
    pub message: Option<String>,
    pub errors: FieldErrors,
}

impl FormData {
    /// Blank create form
    pub fn create(title: &str) -> Self {
        Self {
            page_title: "Add Page".to_string(),
            heading: "Create a new page.".to_string(),
            submit: "Save".to_string(),
            title: title.to_string(),
            ..Self::default()
        }
    }

    /// Edit form pre-filled with an entry
    pub fn edit(original: &str, title: &str, content: &str) -> Self {
        Self {
            page_title: format!("Edit {}", original),
            heading: format!("Edit \"{}\"", original),
            submit: "Save changes".to_string(),
            original: Some(original.to_string()),
            title: title.to_string(),
            content: content.to_string(),
            ..Self::default()
        }
    }
}

/// Per-field validation messages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }
}
