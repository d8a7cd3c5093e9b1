//! Readers for the WordprocessingML numbering and styles parts
//!
//! Both parts arrive as parsed `XmlNode` trees. The numbering part becomes
//! `RawDefinitions` for the definition store; the styles part becomes a map of
//! paragraph styles that carry numbering (typically outline-numbered headings).

use numbering_model::{
    Indentation, NumId, NumberingReference, RawAbstractDefinition, RawDefinitions, RawInstance,
    RawLevel, RawLevelOverride, RunProperties, XmlNode,
};
use std::collections::{HashMap, HashSet};

/// Read abstract definitions and instances from a `w:numbering` tree
pub fn numbering_definitions(part: &XmlNode) -> RawDefinitions {
    let mut raw = RawDefinitions::default();

    for node in &part.children {
        if node.is("abstractNum") {
            match parse_u32(node.attr("abstractNumId")) {
                Some(id) => raw.abstracts.push(RawAbstractDefinition {
                    id,
                    name: node.child("name").and_then(|n| n.val()).map(str::to_string),
                    levels: node.children_named("lvl").filter_map(parse_level).collect(),
                }),
                None => tracing::debug!("Skipping w:abstractNum without a numeric id"),
            }
        } else if node.is("num") {
            let id = parse_u32(node.attr("numId"));
            let abstract_id = parse_u32(node.child("abstractNumId").and_then(|n| n.val()));
            match (id, abstract_id) {
                (Some(id), Some(abstract_id)) => raw.instances.push(RawInstance {
                    id,
                    abstract_id,
                    overrides: node.children_named("lvlOverride").filter_map(parse_override).collect(),
                }),
                _ => tracing::debug!("Skipping w:num without numId or abstractNumId"),
            }
        }
    }

    raw
}

fn parse_override(node: &XmlNode) -> Option<RawLevelOverride> {
    let ilvl = parse_u32(node.attr("ilvl"))?;
    Some(RawLevelOverride {
        ilvl,
        start_override: parse_u32(node.child("startOverride").and_then(|n| n.val())),
        level: node.child("lvl").and_then(parse_level),
    })
}

fn parse_level(node: &XmlNode) -> Option<RawLevel> {
    let ilvl = match parse_u32(node.attr("ilvl")) {
        Some(ilvl) => ilvl,
        None => {
            tracing::debug!("Skipping w:lvl without a numeric ilvl");
            return None;
        }
    };

    let child_val = |name: &str| node.child(name).and_then(|n| n.val()).map(str::to_string);

    Some(RawLevel {
        ilvl,
        format: child_val("numFmt"),
        start: parse_u32(node.child("start").and_then(|n| n.val())),
        restart: parse_u32(node.child("lvlRestart").and_then(|n| n.val())),
        restart_period: None,
        level_text: child_val("lvlText"),
        is_legal: node.child("isLgl").map(on_off).unwrap_or(false),
        suffix: child_val("suff"),
        indentation: node
            .path(&["pPr", "ind"])
            .map(parse_indentation)
            .unwrap_or_default(),
        run_properties: node.child("rPr").map(parse_run_properties).unwrap_or_default(),
    })
}

fn parse_indentation(ind: &XmlNode) -> Indentation {
    Indentation {
        left: ind.attr("left").or_else(|| ind.attr("start")).and_then(parse_twips),
        hanging: ind.attr("hanging").and_then(parse_twips),
        first_line: ind.attr("firstLine").and_then(parse_twips),
    }
}

fn parse_run_properties(rpr: &XmlNode) -> RunProperties {
    RunProperties {
        bold: rpr.child("b").map(on_off),
        italic: rpr.child("i").map(on_off),
        font: rpr
            .child("rFonts")
            .and_then(|f| f.attr("ascii").or_else(|| f.attr("hAnsi")))
            .map(str::to_string),
        color: rpr
            .child("color")
            .and_then(|c| c.val())
            .filter(|v| *v != "auto")
            .map(|v| format!("#{}", v)),
    }
}

/// A toggle property: present means on unless `w:val` says otherwise
fn on_off(node: &XmlNode) -> bool {
    node.val()
        .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "on"))
        .unwrap_or(true)
}

fn parse_u32(value: Option<&str>) -> Option<u32> {
    value.and_then(|v| v.trim().parse().ok())
}

/// Twips (1/20 point) to points
fn parse_twips(value: &str) -> Option<f32> {
    value.parse::<f32>().ok().map(|v| v / 20.0)
}

// =============================================================================
// Style numbering
// =============================================================================

#[derive(Debug, Clone, Default)]
struct StyleEntry {
    based_on: Option<String>,
    num_id: Option<u32>,
    level: Option<u8>,
}

/// Numbering inherited from paragraph styles, following `w:basedOn` chains
#[derive(Debug, Clone, Default)]
pub struct StyleNumberingMap {
    styles: HashMap<String, StyleEntry>,
}

impl StyleNumberingMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read paragraph styles from a `w:styles` tree
    pub fn from_styles_part(part: &XmlNode) -> Self {
        let mut map = Self::new();

        for style in part.children_named("style") {
            if style.attr("type").is_some_and(|t| t != "paragraph") {
                continue;
            }
            let Some(style_id) = style.attr("styleId") else {
                continue;
            };

            let num_pr = style.path(&["pPr", "numPr"]);
            map.styles.insert(
                style_id.to_string(),
                StyleEntry {
                    based_on: style.child("basedOn").and_then(|n| n.val()).map(str::to_string),
                    num_id: num_pr.and_then(|n| parse_u32(n.child("numId").and_then(|c| c.val()))),
                    level: num_pr
                        .and_then(|n| parse_u32(n.child("ilvl").and_then(|c| c.val())))
                        .map(|l| l.min(u8::MAX as u32) as u8),
                },
            );
        }

        map
    }

    /// Builder: register a style directly
    pub fn with_style(
        mut self,
        style_id: impl Into<String>,
        based_on: Option<&str>,
        num_id: Option<u32>,
        level: Option<u8>,
    ) -> Self {
        self.styles.insert(
            style_id.into(),
            StyleEntry {
                based_on: based_on.map(str::to_string),
                num_id,
                level,
            },
        );
        self
    }

    /// Level declared by the style chain, if any
    pub fn level_for(&self, style_id: &str) -> Option<u8> {
        self.chain(style_id).find_map(|entry| entry.level)
    }

    /// Numbering carried by a style, walking its `basedOn` ancestors.
    ///
    /// The nearest style declaring a numId wins; numId 0 removes numbering.
    /// The level comes from the nearest style declaring one, defaulting to 0.
    pub fn lookup(&self, style_id: &str) -> Option<NumberingReference> {
        let num_id = self.chain(style_id).find_map(|entry| entry.num_id)?;
        if num_id == 0 {
            return None;
        }
        let level = self.level_for(style_id).unwrap_or(0);
        Some(NumberingReference::new(NumId::new(num_id), level))
    }

    fn chain<'a>(&'a self, style_id: &'a str) -> impl Iterator<Item = &'a StyleEntry> + 'a {
        let mut visited = HashSet::new();
        let mut next = Some(style_id);

        std::iter::from_fn(move || {
            let id = next.take()?;
            if !visited.insert(id) {
                tracing::debug!("Style inheritance cycle at '{}'", id);
                return None;
            }
            let entry = self.styles.get(id)?;
            next = entry.based_on.as_deref();
            Some(entry)
        })
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn w(name: &str) -> XmlNode {
        XmlNode::new(format!("w:{}", name))
    }

    fn val(name: &str, value: &str) -> XmlNode {
        w(name).with_attr("w:val", value)
    }

    fn level_node(ilvl: u32, fmt: &str, text: &str) -> XmlNode {
        w("lvl")
            .with_attr("w:ilvl", ilvl.to_string())
            .with_child(val("start", "1"))
            .with_child(val("numFmt", fmt))
            .with_child(val("lvlText", text))
            .with_child(
                w("pPr").with_child(w("ind").with_attr("w:left", "720").with_attr("w:hanging", "360")),
            )
    }

    #[test]
    fn test_numbering_definitions() {
        let part = w("numbering")
            .with_child(
                w("abstractNum")
                    .with_attr("w:abstractNumId", "0")
                    .with_child(level_node(0, "decimal", "%1."))
                    .with_child(
                        level_node(1, "lowerLetter", "%1.%2.")
                            .with_child(val("lvlRestart", "0"))
                            .with_child(w("isLgl"))
                            .with_child(
                                w("rPr")
                                    .with_child(w("b"))
                                    .with_child(val("i", "0"))
                                    .with_child(w("rFonts").with_attr("w:ascii", "Symbol"))
                                    .with_child(val("color", "FF0000")),
                            ),
                    ),
            )
            .with_child(
                w("num")
                    .with_attr("w:numId", "1")
                    .with_child(val("abstractNumId", "0"))
                    .with_child(
                        w("lvlOverride")
                            .with_attr("w:ilvl", "0")
                            .with_child(val("startOverride", "5")),
                    ),
            );

        let raw = numbering_definitions(&part);
        assert_eq!(raw.abstracts.len(), 1);
        assert_eq!(raw.instances.len(), 1);

        let levels = &raw.abstracts[0].levels;
        assert_eq!(levels[0].format.as_deref(), Some("decimal"));
        assert_eq!(levels[0].indentation.left, Some(36.0));
        assert_eq!(levels[0].indentation.hanging, Some(18.0));
        assert_eq!(levels[1].restart, Some(0));
        assert!(levels[1].is_legal);
        assert_eq!(levels[1].run_properties.bold, Some(true));
        assert_eq!(levels[1].run_properties.italic, Some(false));
        assert_eq!(levels[1].run_properties.font.as_deref(), Some("Symbol"));
        assert_eq!(levels[1].run_properties.color.as_deref(), Some("#FF0000"));

        let instance = &raw.instances[0];
        assert_eq!((instance.id, instance.abstract_id), (1, 0));
        assert_eq!(instance.overrides[0].start_override, Some(5));
        assert!(instance.overrides[0].level.is_none());
    }

    #[test]
    fn test_skips_incomplete_num() {
        let part = w("numbering").with_child(w("num").with_attr("w:numId", "3"));
        let raw = numbering_definitions(&part);
        assert!(raw.instances.is_empty());
    }

    #[test]
    fn test_style_numbering_inheritance() {
        let part = w("styles")
            .with_child(
                w("style")
                    .with_attr("w:type", "paragraph")
                    .with_attr("w:styleId", "Heading1")
                    .with_child(
                        w("pPr").with_child(
                            w("numPr")
                                .with_child(val("ilvl", "0"))
                                .with_child(val("numId", "4")),
                        ),
                    ),
            )
            .with_child(
                w("style")
                    .with_attr("w:type", "paragraph")
                    .with_attr("w:styleId", "Heading2")
                    .with_child(val("basedOn", "Heading1"))
                    .with_child(w("pPr").with_child(w("numPr").with_child(val("ilvl", "1")))),
            )
            .with_child(
                w("style")
                    .with_attr("w:type", "character")
                    .with_attr("w:styleId", "Emphasis"),
            );

        let map = StyleNumberingMap::from_styles_part(&part);
        assert_eq!(map.lookup("Heading1"), Some(NumberingReference::new(NumId::new(4), 0)));
        assert_eq!(map.lookup("Heading2"), Some(NumberingReference::new(NumId::new(4), 1)));
        assert_eq!(map.lookup("Emphasis"), None);
        assert_eq!(map.lookup("Missing"), None);
    }

    #[test]
    fn test_style_cycle_terminates() {
        let map = StyleNumberingMap::new()
            .with_style("A", Some("B"), None, None)
            .with_style("B", Some("A"), None, None);
        assert_eq!(map.lookup("A"), None);
    }

    #[test]
    fn test_style_num_id_zero_removes_numbering() {
        let map = StyleNumberingMap::new()
            .with_style("Base", None, Some(2), Some(1))
            .with_style("Plain", Some("Base"), Some(0), None);
        assert_eq!(map.lookup("Plain"), None);
        assert_eq!(map.lookup("Base"), Some(NumberingReference::new(NumId::new(2), 1)));
    }
}
