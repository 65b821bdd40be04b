//! End-to-end tests: content directory to site snapshot, pages and search.

use std::fs;
use std::path::Path;

use folio_site::{DiagnosticKind, Site, SiteConfig, SiteError};
use pretty_assertions::assert_eq;

fn write(root: &Path, rel: &str, text: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, text).unwrap();
}

fn fixture() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(
        root,
        "01-intro/overview.md",
        "---\ntitle: Overview\norder: 0\n---\n## Overview\n\nWelcome.\n\n## Overview\n\nAgain.\n",
    );
    write(
        root,
        "01-intro/advanced.md",
        "---\ntitle: Advanced\norder: 1\ndescription: Lifetimes in depth\n---\nSee the [overview](./overview.md).\n",
    );
    write(
        root,
        "02-web-development/react/hooks.mdx",
        "import { Demo } from './demo'\n\n# Hooks\n\n<Demo />\n\n```\nconst [x, setX] = useState(0);\nconsole.log(x);\n```\n",
    );
    write(root, "02-web-development/react/meta.yaml", "title: React Guide\n");
    write(root, "02-web-development/broken.md", "---\ntitle: [unterminated\n---\nbody");
    write(root, "notes/ignored.md", "# Not a section");
    dir
}

#[test]
fn test_intro_section_items_in_order() {
    let dir = fixture();
    let site = Site::build(dir.path(), &SiteConfig::default()).unwrap();

    let intro = site.section("intro").unwrap();
    let slugs: Vec<_> = intro.items.iter().map(|d| d.slug.as_str()).collect();
    assert_eq!(slugs, vec!["overview", "advanced"]);
    assert_eq!(intro.title, "Intro");
}

#[test]
fn test_routes_in_discovery_order() {
    let dir = fixture();
    let site = Site::build(dir.path(), &SiteConfig::default()).unwrap();

    let routes: Vec<_> = site.routes().iter().map(|r| r.path()).collect();
    assert_eq!(
        routes,
        vec![
            "/intro/overview",
            "/intro/advanced",
            "/web-development/react/hooks",
        ]
    );
}

#[test]
fn test_malformed_file_is_a_diagnostic() {
    let dir = fixture();
    let site = Site::build(dir.path(), &SiteConfig::default()).unwrap();

    assert_eq!(site.document_count(), 3);
    assert_eq!(site.diagnostics().len(), 1);
    let diagnostic = &site.diagnostics()[0];
    assert_eq!(diagnostic.kind, DiagnosticKind::InvalidDocument);
    assert!(diagnostic.path.ends_with("broken.md"));
}

#[test]
fn test_building_twice_is_idempotent() {
    let dir = fixture();
    let first = Site::build(dir.path(), &SiteConfig::default()).unwrap();
    let second = Site::build(dir.path(), &SiteConfig::default()).unwrap();

    assert_eq!(first.sections(), second.sections());
    assert_eq!(first.diagnostics(), second.diagnostics());
}

#[test]
fn test_duplicate_headings_get_distinct_anchors() {
    let dir = fixture();
    let site = Site::build(dir.path(), &SiteConfig::default()).unwrap();

    let page = site.render("intro", "overview").unwrap();
    let ids: Vec<_> = page.toc.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["overview", "overview-1"]);
    assert!(page.html.contains(r#"<h2 id="overview-1">"#));
}

#[test]
fn test_mdx_page_renders() {
    let dir = fixture();
    let site = Site::build(dir.path(), &SiteConfig::default()).unwrap();

    assert_eq!(site.section("web-development/react").unwrap().title, "React Guide");
    let page = site.render("web-development/react", "hooks").unwrap();
    assert!(page.error.is_none());
    assert!(!page.html.contains("import"));
    assert!(page.html.contains(r#"class="language-javascript" data-detected="true""#));
}

#[test]
fn test_relative_links_become_routes() {
    let dir = fixture();
    let site = Site::build(dir.path(), &SiteConfig::default()).unwrap();

    let page = site.render("intro", "advanced").unwrap();
    assert!(page.html.contains(r#"<a href="/intro/overview">overview</a>"#));
}

#[test]
fn test_search() {
    let dir = fixture();
    let site = Site::build(dir.path(), &SiteConfig::default()).unwrap();

    assert!(site.search("").is_empty());
    let hits = site.search("lifetimes");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].slug, "advanced");
    assert_eq!(hits[0].description.as_deref(), Some("Lifetimes in depth"));
}

#[test]
fn test_missing_lookup_is_not_found() {
    let dir = fixture();
    let site = Site::build(dir.path(), &SiteConfig::default()).unwrap();

    let err = site.document("missing", "x").unwrap_err();
    assert!(matches!(err, SiteError::SectionNotFound(_)));
    assert!(err.is_not_found());
}

#[test]
fn test_missing_root_fails() {
    let dir = tempfile::tempdir().unwrap();
    let err = Site::build(dir.path().join("absent"), &SiteConfig::default()).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_navigation_serializes() {
    let dir = fixture();
    let site = Site::build(dir.path(), &SiteConfig::default()).unwrap();

    let json = serde_json::to_value(site.navigation()).unwrap();
    assert_eq!(json["items"][0]["path"], "/intro");
    assert_eq!(json["items"][1]["children"][0]["title"], "React Guide");
}
