//! Askama templates for the static components.

use askama::Template;
use patternkit_core::{Badge, Cta, DualListProps, IntroProps, NarrativeSectionProps};

#[derive(Template)]
#[template(path = "intro.html")]
pub struct IntroTemplate<'a> {
    pub props: &'a IntroProps,
    pub badges: Vec<Badge>,
    pub cta: Option<&'a Cta>,
}

impl<'a> IntroTemplate<'a> {
    pub fn new(props: &'a IntroProps) -> Self {
        Self {
            props,
            badges: props.effective_badges(),
            cta: props.cta.as_ref(),
        }
    }
}

#[derive(Template)]
#[template(path = "narrative_section.html")]
pub struct NarrativeSectionTemplate<'a> {
    pub props: &'a NarrativeSectionProps,
    /// Aside text rendered as markdown; empty when absent
    pub aside_html: String,
}

pub struct ListColumn<'a> {
    pub variant: &'static str,
    pub title: &'a str,
    pub items: &'a [String],
}

#[derive(Template)]
#[template(path = "dual_list.html")]
pub struct DualListTemplate<'a> {
    pub columns: [ListColumn<'a>; 2],
    pub footnote: Option<&'a str>,
}

impl<'a> DualListTemplate<'a> {
    pub fn new(props: &'a DualListProps) -> Self {
        Self {
            columns: [
                ListColumn {
                    variant: "left",
                    title: &props.left_title,
                    items: &props.left_items,
                },
                ListColumn {
                    variant: "right",
                    title: &props.right_title,
                    items: &props.right_items,
                },
            ],
            footnote: props.footnote.as_deref().filter(|f| !f.is_empty()),
        }
    }
}

#[derive(Template)]
#[template(path = "editorial_example.html")]
pub struct EditorialExampleTemplate {
    /// Already-rendered component fragments
    pub parts: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use patternkit_core::BadgeTone;

    #[test]
    fn intro_escapes_and_defaults_badges() {
        let props = IntroProps {
            title: "Fábrica <abstracta>".into(),
            category: "Creacional".into(),
            level: "avanzado".into(),
            ..IntroProps::default()
        };

        let html = IntroTemplate::new(&props).render().unwrap();
        assert!(html.contains("<h1>Fábrica "));
        assert!(!html.contains("<abstracta>"));
        assert!(html.contains("badge--primary\">Creacional</span>"));
        assert!(html.contains("badge--neutral\">Nivel avanzado</span>"));
        assert!(!html.contains("pattern-intro__cta"));
    }

    #[test]
    fn intro_with_custom_badges_and_cta() {
        let props = IntroProps {
            badges: vec![Badge::new("GoF", BadgeTone::Accent)],
            cta: Some(Cta {
                label: "Ver ejemplos".into(),
                href: "/patterns/singleton#ejemplos".into(),
            }),
            ..IntroProps::default()
        };

        let html = IntroTemplate::new(&props).render().unwrap();
        assert!(html.contains("badge--accent\">GoF</span>"));
        assert!(!html.contains("Nivel"));
        assert!(html.contains("href=\"/patterns/singleton#ejemplos\""));
    }

    #[test]
    fn narrative_section_omits_empty_parts() {
        let props = NarrativeSectionProps {
            label: "Por qué existe".into(),
            title: "Coordinación".into(),
            ..NarrativeSectionProps::default()
        };
        let html = NarrativeSectionTemplate {
            props: &props,
            aside_html: String::new(),
        }
        .render()
        .unwrap();

        assert!(html.contains("<h3>Coordinación</h3>"));
        assert!(!html.contains("<ul"));
        assert!(!html.contains("__aside"));
    }

    #[test]
    fn dual_list_columns() {
        let props = DualListProps {
            left_title: "Ventajas".into(),
            left_items: vec!["Simple".into()],
            right_title: "Desventajas".into(),
            right_items: vec!["Acoplamiento".into()],
            footnote: None,
        };
        let html = DualListTemplate::new(&props).render().unwrap();

        assert!(html.contains("column--left"));
        assert!(html.contains("<li>Acoplamiento</li>"));
        assert!(!html.contains("__footnote"));
    }
}
