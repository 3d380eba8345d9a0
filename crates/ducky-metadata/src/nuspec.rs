//! .nuspec manifest generation
//!
//! Renders the package manifest consumed by the NuGet CLI. Free text goes
//! through XML-entity escaping; long or multi-line description blocks are
//! CDATA-wrapped instead, since escaped Markdown becomes unreadable in
//! package galleries.

use crate::metadata::ModMetadata;

/// Tags appended to every generated manifest, after the user's own tags
const DEFAULT_TAGS: [&str; 2] = ["duckymod", "game-mod"];

/// Target framework for the single dependency group
const DEPENDENCY_GROUP_FRAMEWORK: &str = "netstandard2.1";

/// Content longer than this is CDATA-wrapped even without newlines
const CDATA_LENGTH_THRESHOLD: usize = 400;

/// Render a .nuspec manifest for the given metadata and resolved content
///
/// `description` and `release_notes` are the outputs of the content
/// resolver (empty string means absent). `readme_src` is the path of a
/// readme file to pack, relative to the nuspec base path; when present the
/// manifest carries both the `<readme>` pointer and a `<files>` entry that
/// places the file at the package root.
pub fn generate_nuspec(
    metadata: &ModMetadata,
    description: &str,
    release_notes: &str,
    readme_src: Option<&str>,
) -> String {
    let title = metadata.display_name.as_deref().unwrap_or(&metadata.name);

    let mut xml = String::new();
    xml.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
    xml.push_str(
        "<package xmlns=\"http://schemas.microsoft.com/packaging/2013/05/nuspec.xsd\">\n",
    );
    xml.push_str("  <metadata>\n");

    push_element(&mut xml, "id", &metadata.name);
    push_element(&mut xml, "version", &metadata.version);
    push_element(&mut xml, "title", title);

    if let Some(author) = metadata.author.as_deref() {
        push_element(&mut xml, "authors", author);
    }
    if !description.is_empty() {
        push_text_block(&mut xml, "description", description);
    }
    if !release_notes.is_empty() {
        push_text_block(&mut xml, "releaseNotes", release_notes);
    }
    if let Some(url) = metadata.project_url.as_deref() {
        push_element(&mut xml, "projectUrl", url);
    }
    if let Some(license) = metadata.license.as_deref() {
        xml.push_str(&format!(
            "    <license type=\"expression\">{}</license>\n",
            escape_xml(license)
        ));
    }
    if let Some(copyright) = metadata.copyright.as_deref() {
        push_element(&mut xml, "copyright", copyright);
    }
    if let Some(icon) = metadata.icon.as_deref() {
        push_element(&mut xml, "icon", icon);
    }
    if readme_src.is_some() {
        push_element(&mut xml, "readme", "README.md");
    }

    push_element(&mut xml, "tags", &format_tags(metadata.tags.as_deref()));

    xml.push_str("    <dependencies>\n");
    xml.push_str(&format!(
        "      <group targetFramework=\"{}\">\n",
        DEPENDENCY_GROUP_FRAMEWORK
    ));
    for dependency in metadata.dependencies.as_deref().unwrap_or_default() {
        xml.push_str(&format_dependency(dependency));
    }
    xml.push_str("      </group>\n");
    xml.push_str("    </dependencies>\n");

    xml.push_str("  </metadata>\n");

    if let Some(src) = readme_src {
        xml.push_str("  <files>\n");
        xml.push_str(&format!(
            "    <file src=\"{}\" target=\"README.md\" />\n",
            escape_xml(src)
        ));
        xml.push_str("  </files>\n");
    }

    xml.push_str("</package>\n");
    xml
}

/// Join user tags with the fixed default tags
///
/// The manifest format treats whitespace as a tag delimiter, so internal
/// whitespace runs inside a tag are replaced by single hyphens.
fn format_tags(tags: Option<&[String]>) -> String {
    let mut parts: Vec<String> = tags
        .unwrap_or_default()
        .iter()
        .map(|tag| tag.split_whitespace().collect::<Vec<_>>().join("-"))
        .collect();
    parts.extend(DEFAULT_TAGS.iter().map(|t| (*t).to_string()));
    parts.join(" ")
}

fn format_dependency(dependency: &str) -> String {
    match dependency.split_once(':') {
        Some((id, version)) => format!(
            "        <dependency id=\"{}\" version=\"{}\" />\n",
            escape_xml(id),
            escape_xml(version)
        ),
        None => format!("        <dependency id=\"{}\" />\n", escape_xml(dependency)),
    }
}

fn push_element(xml: &mut String, tag: &str, value: &str) {
    xml.push_str(&format!("    <{tag}>{}</{tag}>\n", escape_xml(value)));
}

/// Emit a free-text element, CDATA-wrapped when the content contains a
/// newline or exceeds the length threshold
fn push_text_block(xml: &mut String, tag: &str, content: &str) {
    if content.contains('\n') || content.chars().count() > CDATA_LENGTH_THRESHOLD {
        xml.push_str(&format!("    <{tag}><![CDATA[{content}]]></{tag}>\n"));
    } else {
        push_element(xml, tag, content);
    }
}

fn escape_xml(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
