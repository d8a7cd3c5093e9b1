//! Format renderer
//!
//! Turns an actual number plus its level definition into the per-level token
//! and the full composed text. Composition never recomputes shallower levels:
//! their values are read from the tracker snapshot taken at this document
//! position.

use crate::format::{FormatRangeViolation, NumberFormat};
use crate::ids::{AbstractNumId, NumId};
use crate::level::{LevelDefinition, TemplateSegment};
use crate::paragraph::ResolvedNumbering;
use crate::MAX_LEVELS;

/// Current value and format of one level at the time of rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelSnapshot {
    pub value: u32,
    pub format: NumberFormat,
}

/// Per-level values of a sequence tracker, frozen for one render call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackerSnapshot {
    levels: [Option<LevelSnapshot>; MAX_LEVELS],
}

impl TrackerSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the value of a level. Indices past level 8 are ignored.
    pub fn set(&mut self, level: u8, value: u32, format: NumberFormat) {
        if let Some(slot) = self.levels.get_mut(level as usize) {
            *slot = Some(LevelSnapshot { value, format });
        }
    }

    pub fn get(&self, level: u8) -> Option<&LevelSnapshot> {
        self.levels.get(level as usize).and_then(|s| s.as_ref())
    }
}

/// Which instance the rendered number belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderTarget {
    pub num_id: NumId,
    pub abstract_num_id: AbstractNumId,
}

/// Render output: the numbering plus any values that fell back to decimal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub numbering: ResolvedNumbering,
    pub violations: Vec<FormatRangeViolation>,
}

/// Render the number for one paragraph.
///
/// `actual` is the paragraph's own number at `level.level`. Template segments
/// for shallower levels read `snapshot`; segments for deeper levels render
/// nothing. Out-of-range values render as plain integers and are reported in
/// `violations` rather than failing.
pub fn render(
    target: RenderTarget,
    actual: u32,
    level: &LevelDefinition,
    snapshot: &TrackerSnapshot,
    default_bullet: &str,
) -> Rendered {
    let mut violations = Vec::new();

    let (token, text) = match level.format {
        NumberFormat::Bullet => {
            let glyph = level.glyph(default_bullet).to_string();
            (glyph.clone(), glyph)
        }
        NumberFormat::None => {
            let text = match level.template {
                Some(_) => compose(actual, level, snapshot, &mut violations),
                None => String::new(),
            };
            (String::new(), text)
        }
        format => {
            let (token, violation) = format.format_or_decimal(actual);
            violations.extend(violation);
            let text = compose(actual, level, snapshot, &mut violations);
            (token, text)
        }
    };

    Rendered {
        numbering: ResolvedNumbering {
            num_id: target.num_id,
            abstract_num_id: target.abstract_num_id,
            level: level.level,
            value: actual,
            token,
            text,
            format: level.format,
            suffix: level.suffix,
            run_properties: level.run_properties.clone(),
        },
        violations,
    }
}

fn compose(
    actual: u32,
    level: &LevelDefinition,
    snapshot: &TrackerSnapshot,
    violations: &mut Vec<FormatRangeViolation>,
) -> String {
    let mut text = String::new();

    for segment in level.effective_template().segments {
        match segment {
            TemplateSegment::Literal(literal) => text.push_str(&literal),
            TemplateSegment::Level(l) if l == level.level => {
                if level.format.is_hidden() {
                    continue;
                }
                let format = if level.is_legal { NumberFormat::Decimal } else { level.format };
                let (part, violation) = format.format_or_decimal(actual);
                if format != level.format {
                    // Own-token violations are already reported
                    violations.extend(violation);
                }
                text.push_str(&part);
            }
            TemplateSegment::Level(l) if l < level.level => {
                if let Some(parent) = snapshot.get(l) {
                    let format = if level.is_legal { NumberFormat::Decimal } else { parent.format };
                    match format {
                        NumberFormat::Bullet | NumberFormat::None => {}
                        _ => {
                            let (part, violation) = format.format_or_decimal(parent.value);
                            violations.extend(violation);
                            text.push_str(&part);
                        }
                    }
                }
            }
            TemplateSegment::Level(_) => {}
        }
    }

    text
}
