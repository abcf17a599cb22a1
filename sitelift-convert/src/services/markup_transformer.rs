//! HTML page → React view conversion
//!
//! Two passes over the job's pages:
//! 1. **Discovery**: find the first navigation-like and footer-like element of
//!    each page; the first page supplying a kind registers it in the job's
//!    [`FragmentRegistry`].
//! 2. **Rendering**: write one component per registered fragment, then one page
//!    view per page that references every registered fragment in place of the
//!    page's own copy.
//!
//! Parsing and rendering are synchronous; only file I/O awaits, so no parsed
//! document is ever held across an await point.

use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

use super::jsx_writer::render_children;
use crate::error::{ConversionError, ConversionResult};
use crate::models::{ConvertedPage, FragmentKind, FragmentRegistry, PageRecord, SharedFragment};

/// A page record with its markup loaded
#[derive(Debug, Clone)]
pub struct PageSource {
    pub page: PageRecord,
    pub html: String,
}

/// Outcome of the markup stage
#[derive(Debug, Clone, Default)]
pub struct MarkupSummary {
    /// Fragment kinds that got their own component
    pub fragments: Vec<FragmentKind>,
    /// Page views written, in page order
    pub pages: Vec<ConvertedPage>,
    /// Pages dropped because their component name was already taken
    pub duplicates_skipped: usize,
}

fn first_match<'a>(document: &'a Html, kind: FragmentKind) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(kind.selector()).ok()?;
    let found = document.select(&selector).next();
    found
}

fn document_body(document: &Html) -> Option<ElementRef<'_>> {
    let selector = Selector::parse("body").ok()?;
    let body = document.select(&selector).next();
    body
}

/// `<title>` text, falling back to the page name
pub fn page_title(document: &Html, fallback: &str) -> String {
    Selector::parse("title")
        .ok()
        .and_then(|selector| document.select(&selector).next())
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

/// Register any fragment kinds this page supplies that are not yet known
pub fn discover_in_page(source: &PageSource, registry: &mut FragmentRegistry) {
    let document = Html::parse_document(&source.html);

    for kind in FragmentKind::ALL {
        if registry.contains(kind) {
            continue;
        }
        if let Some(element) = first_match(&document, kind) {
            let jsx = render_children(element, &[]);
            debug!(
                kind = ?kind,
                page = %source.page.path.display(),
                "Shared fragment discovered"
            );
            registry.register(SharedFragment {
                kind,
                source: source.page.path.clone(),
                jsx,
            });
        }
    }
}

/// Discovery pass over all pages
pub fn discover_fragments(sources: &[PageSource]) -> FragmentRegistry {
    let mut registry = FragmentRegistry::new();
    for source in sources {
        discover_in_page(source, &mut registry);
        if registry.len() == FragmentKind::ALL.len() {
            break;
        }
    }
    registry
}

/// Indent every line; preformatted text is emitted as string expressions by
/// the JSX writer, so no line break here falls inside it
fn indent(markup: &str, spaces: usize) -> String {
    let pad = " ".repeat(spaces);
    markup
        .lines()
        .map(|line| {
            if line.trim().is_empty() {
                String::new()
            } else {
                format!("{}{}", pad, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Source of a reusable fragment component
pub fn render_fragment_view(fragment: &SharedFragment) -> String {
    let name = fragment.kind.component_name();
    let body = indent(&fragment.jsx, 6);
    let body = if body.is_empty() {
        String::new()
    } else {
        format!("{}\n", body)
    };

    format!(
        "import React from 'react';\n\
         \n\
         const {name}: React.FC = () => {{\n\
         \x20 return (\n\
         \x20   <>\n\
         {body}\
         \x20   </>\n\
         \x20 );\n\
         }};\n\
         \n\
         export default {name};\n"
    )
}

/// Source of a page view
pub fn render_page_view(source: &PageSource, registry: &FragmentRegistry) -> String {
    let document = Html::parse_document(&source.html);
    let component = source.page.component_name();
    let title = page_title(&document, &source.page.name);

    // The page's own copy of a registered fragment is replaced by the component
    let skip: Vec<ElementRef<'_>> = registry
        .kinds()
        .filter_map(|kind| first_match(&document, kind))
        .collect();

    let body_jsx = document_body(&document)
        .map(|body| render_children(body, &skip))
        .unwrap_or_default();

    let mut imports = vec!["import React, { useEffect } from 'react';".to_string()];
    for kind in registry.kinds() {
        imports.push(format!(
            "import {0} from '../components/{0}';",
            kind.component_name()
        ));
    }

    let mut children = Vec::new();
    if registry.contains(FragmentKind::Navigation) {
        children.push(format!("      <{} />", FragmentKind::Navigation.component_name()));
    }
    let body = indent(&body_jsx, 6);
    if !body.is_empty() {
        children.push(body);
    }
    if registry.contains(FragmentKind::Footer) {
        children.push(format!("      <{} />", FragmentKind::Footer.component_name()));
    }

    let title_literal = serde_json::to_string(&title).unwrap_or_else(|_| "\"\"".to_string());
    let imports = imports.join("\n");
    let children = children.join("\n");

    format!(
        "{imports}\n\
         \n\
         const {component}: React.FC = () => {{\n\
         \x20 useEffect(() => {{\n\
         \x20   document.title = {title_literal};\n\
         \x20 }}, []);\n\
         \n\
         \x20 return (\n\
         \x20   <div>\n\
         {children}\n\
         \x20   </div>\n\
         \x20 );\n\
         }};\n\
         \n\
         export default {component};\n"
    )
}

/// Read every page; invalid UTF-8 is replaced rather than rejected
pub async fn load_pages(pages: &[PageRecord]) -> ConversionResult<Vec<PageSource>> {
    let mut sources = Vec::with_capacity(pages.len());
    for page in pages {
        let bytes = fs::read(&page.path)
            .await
            .map_err(ConversionError::fs(&page.path))?;
        sources.push(PageSource {
            page: page.clone(),
            html: String::from_utf8_lossy(&bytes).into_owned(),
        });
    }
    Ok(sources)
}

async fn write_file(path: PathBuf, contents: String) -> ConversionResult<()> {
    fs::write(&path, contents)
        .await
        .map_err(ConversionError::fs(&path))
}

/// Convert all pages into `src/components` and `src/pages` under `output_dir`
///
/// `on_page(done, total, page)` is called after each page view is written.
pub async fn transform_pages<F>(
    pages: &[PageRecord],
    output_dir: &Path,
    mut on_page: F,
) -> ConversionResult<MarkupSummary>
where
    F: FnMut(usize, usize, &PageRecord),
{
    let sources = load_pages(pages).await?;
    let registry = discover_fragments(&sources);

    let components_dir = output_dir.join("src").join("components");
    let pages_dir = output_dir.join("src").join("pages");

    let mut summary = MarkupSummary::default();

    for fragment in registry.fragments() {
        let path = components_dir.join(format!("{}.tsx", fragment.kind.component_name()));
        write_file(path, render_fragment_view(fragment)).await?;
        summary.fragments.push(fragment.kind);
    }

    let total = sources.len();
    let mut taken = HashSet::new();

    for (index, source) in sources.iter().enumerate() {
        let component = source.page.component_name();

        if taken.insert(component.clone()) {
            let path = pages_dir.join(format!("{}.tsx", component));
            write_file(path, render_page_view(source, &registry)).await?;

            summary.pages.push(ConvertedPage {
                component,
                route: source.page.route(),
                source: source.page.path.clone(),
            });
        } else {
            warn!(
                page = %source.page.path.display(),
                component = %component,
                "Skipping page: component name already used by another page"
            );
            summary.duplicates_skipped += 1;
        }

        on_page(index + 1, total, &source.page);
    }

    info!(
        pages = summary.pages.len(),
        fragments = summary.fragments.len(),
        "Markup conversion complete"
    );

    Ok(summary)
}
