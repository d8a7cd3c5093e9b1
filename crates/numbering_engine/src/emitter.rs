//! Attribute and counter emission
//!
//! The same resolved numbering drives two outputs: four attributes on each
//! numbered element and a CSS counter stylesheet keyed on those attributes.
//! Both read the level format from one place, so an element's format
//! attribute and the counter style its selector matches always agree.

use crate::resolver::ResolvedDocument;
use crate::settings::{AttributeNames, NumberingSettings, RenderMode};
use numbering_model::{
    AbstractNumId, DefinitionStore, Diagnostic, DiagnosticKind, Indentation, LevelDefinition, LevelRestart, NumId,
    NumberFormat, ResolvedNumbering, RunProperties, TemplateSegment,
};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

/// The four numbering attributes for one numbered element.
///
/// All four keys are always present.
pub fn emit_attributes(numbering: &ResolvedNumbering, names: &AttributeNames) -> BTreeMap<String, String> {
    BTreeMap::from([
        (names.numbering_id.clone(), numbering.num_id.to_string()),
        (
            names.abstract_numbering_id.clone(),
            numbering.abstract_num_id.to_string(),
        ),
        (names.level.clone(), numbering.level.to_string()),
        (names.format.clone(), numbering.format.keyword().to_string()),
    ])
}

/// CSS declarations for the character formatting of a number glyph
pub fn run_property_declarations(props: &RunProperties) -> Vec<(&'static str, String)> {
    let mut declarations = Vec::new();
    if let Some(bold) = props.bold {
        declarations.push(("font-weight", if bold { "bold" } else { "normal" }.to_string()));
    }
    if let Some(italic) = props.italic {
        declarations.push(("font-style", if italic { "italic" } else { "normal" }.to_string()));
    }
    if let Some(font) = &props.font {
        declarations.push(("font-family", css_string(font)));
    }
    if let Some(color) = &props.color {
        declarations.push(("color", color.clone()));
    }
    declarations
}

fn indentation_declarations(indent: &Indentation) -> Vec<(&'static str, String)> {
    let mut declarations = Vec::new();
    if let Some(left) = indent.left {
        declarations.push(("padding-left", format!("{}pt", left)));
    }
    if let Some(hanging) = indent.hanging {
        declarations.push(("text-indent", format!("{}pt", -hanging)));
    } else if let Some(first_line) = indent.first_line {
        declarations.push(("text-indent", format!("{}pt", first_line)));
    }
    declarations
}

/// Quote a value as a CSS string literal
fn css_string(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\A "),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

// =============================================================================
// Counter stylesheet
// =============================================================================

/// Rule set for one (abstract definition, level) pair
#[derive(Debug, Clone, PartialEq)]
pub struct CounterRule {
    pub abstract_num_id: AbstractNumId,
    pub level: u8,
    pub format: NumberFormat,
    /// Attribute selector matching elements of this pair
    pub selector: String,
    pub counter: String,
    /// Deeper counters reset by this level, with their reset values
    pub resets: Vec<(String, i64)>,
    /// Value of `content` on the `::before` pseudo-element
    pub content: String,
    /// Declarations on the element itself
    pub block: Vec<(&'static str, String)>,
    /// Declarations on the `::before` pseudo-element besides `content`
    pub marker: Vec<(&'static str, String)>,
}

/// Counter stylesheet for the pairs a resolved document uses
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CounterStylesheet {
    /// Initial values set on `body`
    initial: Vec<(String, i64)>,
    rules: Vec<CounterRule>,
    mode: RenderMode,
    /// First paragraph of each further instance of an already used abstract
    /// definition
    shared: Vec<Diagnostic>,
}

impl CounterStylesheet {
    /// Build one rule set per (abstract id, level) that at least one numbered
    /// paragraph references.
    pub fn build(store: &DefinitionStore, resolved: &ResolvedDocument, settings: &NumberingSettings) -> Self {
        // First instance seen for each pair supplies the level definition
        let mut used: BTreeMap<(AbstractNumId, u8), NumId> = BTreeMap::new();
        let mut instances: HashMap<AbstractNumId, Vec<NumId>> = HashMap::new();
        let mut shared = Vec::new();
        for (paragraph, numbering) in resolved.numbered() {
            used.entry((numbering.abstract_num_id, numbering.level))
                .or_insert(numbering.num_id);

            let seen = instances.entry(numbering.abstract_num_id).or_default();
            if !seen.contains(&numbering.num_id) {
                if let Some(&first_num_id) = seen.first() {
                    shared.push(Diagnostic {
                        paragraph,
                        kind: DiagnosticKind::SharedCounter {
                            abstract_num_id: numbering.abstract_num_id,
                            num_id: numbering.num_id,
                            first_num_id,
                        },
                    });
                }
                seen.push(numbering.num_id);
            }
        }

        let counter_name = |abstract_id: AbstractNumId, level: u8| {
            format!("{}-{}-{}", settings.counter_prefix, abstract_id, level)
        };

        let mut rules = Vec::with_capacity(used.len());
        let mut referenced: BTreeSet<(AbstractNumId, u8)> = BTreeSet::new();

        for &(abstract_id, level) in used.keys() {
            let Some(def) = used_level(store, &used, abstract_id, level) else {
                continue;
            };

            let resets = used
                .keys()
                .filter(|(a, l)| *a == abstract_id && *l > level)
                .filter_map(|&(_, deeper)| {
                    let deeper_def = used_level(store, &used, abstract_id, deeper)?;
                    resets_on(deeper_def, level)
                        .then(|| (counter_name(abstract_id, deeper), i64::from(deeper_def.start) - 1))
                })
                .collect();

            let mut parts = Vec::new();
            match def.format {
                NumberFormat::Bullet => parts.push(css_string(def.glyph(&settings.default_bullet))),
                NumberFormat::None if def.template.is_none() => {}
                _ => {
                    for segment in def.effective_template().segments {
                        match segment {
                            TemplateSegment::Literal(literal) => parts.push(css_string(&literal)),
                            TemplateSegment::Level(l) if l <= level => {
                                let format = if l == level {
                                    def.format
                                } else {
                                    match used_level(store, &used, abstract_id, l) {
                                        Some(parent) => parent.format,
                                        None => continue,
                                    }
                                };
                                if format.is_bullet() || format.is_hidden() {
                                    continue;
                                }
                                let style = if def.is_legal { NumberFormat::Decimal } else { format };
                                parts.push(format!(
                                    "counter({}, {})",
                                    counter_name(abstract_id, l),
                                    style.css_counter_style()
                                ));
                                referenced.insert((abstract_id, l));
                            }
                            TemplateSegment::Level(_) => {}
                        }
                    }
                }
            }

            // Same shape as the literal prefix: nothing at all, or the text
            // followed by the suffix separator
            let content = if parts.is_empty() {
                if def.format.is_hidden() {
                    "none".to_string()
                } else {
                    css_string("")
                }
            } else {
                let separator = def.suffix.separator();
                if !separator.is_empty() {
                    parts.push(css_string(separator));
                }
                parts.join(" ")
            };

            let block = if settings.emit_indentation {
                indentation_declarations(&def.indentation)
            } else {
                Vec::new()
            };

            rules.push(CounterRule {
                abstract_num_id: abstract_id,
                level,
                format: def.format,
                selector: format!(
                    "[{}=\"{}\"][{}=\"{}\"]",
                    settings.attributes.abstract_numbering_id, abstract_id, settings.attributes.level, level
                ),
                counter: counter_name(abstract_id, level),
                resets,
                content,
                block,
                marker: run_property_declarations(&def.run_properties),
            });
        }

        // Used counters start one below their start value so the first
        // increment yields it; referenced but never counted parents hold
        // their start value, matching literal composition.
        let used_keys: BTreeSet<_> = used.keys().copied().collect();
        let mut initial = Vec::new();
        for &(abstract_id, level) in used_keys.iter().chain(referenced.difference(&used_keys)) {
            if let Some(def) = used_level(store, &used, abstract_id, level) {
                let start = i64::from(def.start);
                let value = if used_keys.contains(&(abstract_id, level)) { start - 1 } else { start };
                initial.push((counter_name(abstract_id, level), value));
            }
        }

        tracing::debug!(rules = rules.len(), counters = initial.len(), "Built counter stylesheet");

        Self {
            initial,
            rules,
            mode: RenderMode::Counter,
            shared,
        }
    }

    /// Where a further instance of an abstract definition starts sharing
    /// counters with the first one. Counter-rendered numbers continue across
    /// such instances where the literal numbers restart.
    pub fn shared_counters(&self) -> &[Diagnostic] {
        &self.shared
    }

    /// Stylesheet variant for a render mode.
    ///
    /// Literal output carries no counters at all. With both, counters are
    /// maintained but generate no content since the number text is already
    /// present in the markup.
    pub fn for_mode(mut self, mode: RenderMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn rules(&self) -> &[CounterRule] {
        &self.rules
    }

    /// Rule for one (abstract id, level) pair
    pub fn rule(&self, abstract_num_id: AbstractNumId, level: u8) -> Option<&CounterRule> {
        self.rules
            .iter()
            .find(|r| r.abstract_num_id == abstract_num_id && r.level == level)
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Level definition for a pair, taken from the first instance that used it
/// (or any instance of the same abstract definition for unused parents)
fn used_level<'s>(
    store: &'s DefinitionStore,
    used: &BTreeMap<(AbstractNumId, u8), NumId>,
    abstract_id: AbstractNumId,
    level: u8,
) -> Option<&'s LevelDefinition> {
    let num_id = used.get(&(abstract_id, level)).copied().or_else(|| {
        used.iter()
            .find(|((a, _), _)| *a == abstract_id)
            .map(|(_, num_id)| *num_id)
    })?;
    store.level_for(num_id, level)
}

/// Whether a deeper level restarts when `shallower` is counted
fn resets_on(deeper: &LevelDefinition, shallower: u8) -> bool {
    match deeper.restart {
        LevelRestart::AnyShallower => true,
        LevelRestart::AfterLevel(after) => shallower <= after,
        LevelRestart::Never => false,
    }
}

fn write_declarations(f: &mut fmt::Formatter<'_>, declarations: &[(&str, String)]) -> fmt::Result {
    for (property, value) in declarations {
        writeln!(f, "  {}: {};", property, value)?;
    }
    Ok(())
}

fn counter_list(counters: &[(String, i64)]) -> String {
    counters
        .iter()
        .map(|(name, value)| format!("{} {}", name, value))
        .collect::<Vec<_>>()
        .join(" ")
}

impl fmt::Display for CounterStylesheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rules.is_empty() {
            return Ok(());
        }

        let counters = self.mode.uses_counters();
        if counters && !self.initial.is_empty() {
            writeln!(f, "body {{\n  counter-reset: {};\n}}", counter_list(&self.initial))?;
        }

        for rule in &self.rules {
            let mut block = Vec::new();
            if counters {
                block.push(("counter-increment", rule.counter.clone()));
                if !rule.resets.is_empty() {
                    block.push(("counter-reset", counter_list(&rule.resets)));
                }
            }
            block.extend(rule.block.iter().cloned());
            if !block.is_empty() {
                writeln!(f, "{} {{", rule.selector)?;
                write_declarations(f, &block)?;
                writeln!(f, "}}")?;
            }

            if self.mode == RenderMode::Counter {
                writeln!(f, "{}::before {{", rule.selector)?;
                writeln!(f, "  content: {};", rule.content)?;
                write_declarations(f, &rule.marker)?;
                writeln!(f, "}}")?;
            }
        }

        Ok(())
    }
}
