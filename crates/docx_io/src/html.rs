//! HTML output for converted documents

use numbering_engine::{emitter::run_property_declarations, CounterStylesheet, NumberingSettings, RenderedElement};

/// Writes rendered elements as a standalone HTML document
pub struct HtmlWriter<'a> {
    settings: &'a NumberingSettings,
    title: Option<String>,
}

impl<'a> HtmlWriter<'a> {
    pub fn new(settings: &'a NumberingSettings) -> Self {
        Self { settings, title: None }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Generate the HTML document with the stylesheet embedded
    pub fn write(&self, elements: &[RenderedElement], stylesheet: &CounterStylesheet) -> String {
        let mut html = String::new();

        html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
        if let Some(title) = &self.title {
            html.push_str(&format!("<title>{}</title>\n", escape_html(title)));
        }

        let css = stylesheet.clone().for_mode(self.settings.render_mode).to_string();
        if !css.is_empty() {
            html.push_str("<style>\n");
            html.push_str(&css);
            html.push_str("</style>\n");
        }
        html.push_str("</head>\n<body>\n");

        for element in elements {
            self.write_element(&mut html, element);
        }

        html.push_str("</body>\n</html>\n");
        html
    }

    fn write_element(&self, html: &mut String, element: &RenderedElement) {
        html.push('<');
        html.push_str(&element.tag);
        for (name, value) in &element.attributes {
            html.push_str(&format!(" {}=\"{}\"", name, escape_html_attr(value)));
        }
        html.push('>');

        if let Some(numbering) = element.numbering.as_ref().filter(|_| self.settings.render_mode.writes_literal()) {
            if !numbering.text.is_empty() {
                let style: Vec<String> = run_property_declarations(&numbering.run_properties)
                    .into_iter()
                    .map(|(property, value)| format!("{}: {}", property, value))
                    .collect();
                if style.is_empty() {
                    html.push_str("<span class=\"numbering\">");
                } else {
                    html.push_str(&format!(
                        "<span class=\"numbering\" style=\"{}\">",
                        escape_html_attr(&style.join("; "))
                    ));
                }
                html.push_str(&escape_html(&numbering.text));
                html.push_str("</span>");
                html.push_str(numbering.suffix.separator());
            }
        }

        html.push_str(&escape_html(&element.text).replace('\n', "<br>"));
        html.push_str("</");
        html.push_str(&element.tag);
        html.push_str(">\n");
    }
}

/// Escape HTML text content
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape HTML attribute value
fn escape_html_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use numbering_engine::{attach, RenderMode, SequenceResolver};
    use numbering_model::{
        AbstractNumId, AbstractNumberingDefinition, ConcreteNumberingInstance, DefinitionStore, LevelDefinition,
        NumId, NumberFormat, ParagraphId, ParagraphNumberingContext,
    };

    fn render(mode: RenderMode) -> String {
        let mut level = LevelDefinition::numbered(0, NumberFormat::UpperLetter);
        level.run_properties.bold = Some(true);
        let store = DefinitionStore::from_definitions(
            vec![AbstractNumberingDefinition::new(AbstractNumId::new(4)).with_level(level)],
            vec![ConcreteNumberingInstance::new(NumId::new(2), AbstractNumId::new(4))],
        )
        .unwrap();
        let contexts = vec![
            ParagraphNumberingContext::numbered(0, NumId::new(2), 0, "Fish & chips"),
            ParagraphNumberingContext::plain(1, "<Aside>"),
        ];
        let resolved = SequenceResolver::new().resolve(&contexts, &store);

        let settings = NumberingSettings {
            render_mode: mode,
            ..Default::default()
        };
        let mut elements = vec![
            RenderedElement::new(ParagraphId::new(0), "p", "Fish & chips"),
            RenderedElement::new(ParagraphId::new(1), "p", "<Aside>"),
        ];
        attach(&resolved, &mut elements, &settings.attributes);
        let sheet = CounterStylesheet::build(&store, &resolved, &settings);

        HtmlWriter::new(&settings).with_title("Menu").write(&elements, &sheet)
    }

    #[test]
    fn test_literal_mode() {
        let html = render(RenderMode::Literal);
        assert!(html.contains("<title>Menu</title>"));
        assert!(html.contains(
            "<p data-abstract-numbering-id=\"4\" data-numbering-format=\"upperLetter\" \
             data-numbering-id=\"2\" data-numbering-level=\"0\">\
             <span class=\"numbering\" style=\"font-weight: bold\">A.</span> Fish &amp; chips</p>"
        ));
        assert!(html.contains("<p>&lt;Aside&gt;</p>"));
        assert!(!html.contains("counter-increment"));
    }

    #[test]
    fn test_counter_mode() {
        let html = render(RenderMode::Counter);
        assert!(!html.contains("class=\"numbering\""));
        assert!(html.contains("content: counter(num-4-0, upper-alpha) \".\" \" \";"));
        assert!(html.contains("data-numbering-id=\"2\" data-numbering-level=\"0\">Fish &amp; chips</p>"));
    }

    fn render_bullets(mode: RenderMode) -> String {
        let store = DefinitionStore::from_definitions(
            vec![AbstractNumberingDefinition::new(AbstractNumId::new(1)).with_level(LevelDefinition::bullet(0, "*"))],
            vec![ConcreteNumberingInstance::new(NumId::new(1), AbstractNumId::new(1))],
        )
        .unwrap();
        let resolved =
            SequenceResolver::new().resolve(&[ParagraphNumberingContext::numbered(0, NumId::new(1), 0, "Item")], &store);
        let settings = NumberingSettings {
            render_mode: mode,
            ..Default::default()
        };
        let mut elements = vec![RenderedElement::new(ParagraphId::new(0), "p", "Item")];
        attach(&resolved, &mut elements, &settings.attributes);
        let sheet = CounterStylesheet::build(&store, &resolved, &settings);
        HtmlWriter::new(&settings).write(&elements, &sheet)
    }

    #[test]
    fn test_bullet_separator_in_both_paths() {
        let literal = render_bullets(RenderMode::Literal);
        assert!(literal.contains("<span class=\"numbering\">*</span> Item</p>"));

        let counter = render_bullets(RenderMode::Counter);
        assert!(counter.contains("  content: \"*\" \" \";\n"));
        assert!(counter.contains(">Item</p>"));
    }

    #[test]
    fn test_both_mode() {
        let html = render(RenderMode::Both);
        assert!(html.contains("<span class=\"numbering\""));
        assert!(html.contains("counter-increment: num-4-0;"));
        assert!(!html.contains("content:"));
    }
}
