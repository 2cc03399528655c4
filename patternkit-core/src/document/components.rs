//! The closed set of components an entry body may embed.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

use crate::lenient;

/// Registry of embeddable component names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Intro,
    NarrativeSection,
    DualList,
    EditorialExample,
    CodeTabs,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 5] = [
        ComponentKind::Intro,
        ComponentKind::NarrativeSection,
        ComponentKind::DualList,
        ComponentKind::EditorialExample,
        ComponentKind::CodeTabs,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ComponentKind::Intro => "Intro",
            ComponentKind::NarrativeSection => "NarrativeSection",
            ComponentKind::DualList => "DualList",
            ComponentKind::EditorialExample => "EditorialExample",
            ComponentKind::CodeTabs => "CodeTabs",
        }
    }

    /// Look up a tag name. Content written for the site uses a `Pattern`
    /// prefix (`PatternIntro`), which resolves to the same component.
    pub fn resolve(tag: &str) -> Option<Self> {
        let bare = tag
            .strip_prefix("Pattern")
            .filter(|rest| !rest.is_empty())
            .unwrap_or(tag);

        Self::ALL.into_iter().find(|kind| kind.name() == bare)
    }
}

/// A resolved component invocation with its bound parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "component", content = "props")]
pub enum Component {
    Intro(IntroProps),
    NarrativeSection(NarrativeSectionProps),
    DualList(DualListProps),
    EditorialExample,
    CodeTabs(CodeTabsProps),
}

impl Component {
    pub fn kind(&self) -> ComponentKind {
        match self {
            Component::Intro(_) => ComponentKind::Intro,
            Component::NarrativeSection(_) => ComponentKind::NarrativeSection,
            Component::DualList(_) => ComponentKind::DualList,
            Component::EditorialExample => ComponentKind::EditorialExample,
            Component::CodeTabs(_) => ComponentKind::CodeTabs,
        }
    }

    /// Bind parsed attributes (and paired-tag children) to a component.
    ///
    /// Absent parameters take their defaults; only shapes that cannot be
    /// coerced are errors.
    pub fn bind(
        kind: ComponentKind,
        params: Mapping,
        children: Option<String>,
    ) -> Result<Self, serde_yaml::Error> {
        let children = children.filter(|c| !c.trim().is_empty());

        let component = match kind {
            ComponentKind::Intro => Component::Intro(from_params(params)?),
            ComponentKind::NarrativeSection => {
                let mut props: NarrativeSectionProps = from_params(params)?;
                if props.aside.is_none() {
                    props.aside = children.as_deref().map(|c| c.trim().to_string());
                }
                Component::NarrativeSection(props)
            }
            ComponentKind::DualList => Component::DualList(from_params(params)?),
            ComponentKind::EditorialExample => {
                if !params.is_empty() {
                    tracing::warn!("EditorialExample takes no parameters; ignoring them");
                }
                Component::EditorialExample
            }
            ComponentKind::CodeTabs => Component::CodeTabs(from_params(params)?),
        };

        if children.is_some() && kind != ComponentKind::NarrativeSection {
            tracing::warn!("<{}> ignores its children", kind.name());
        }

        Ok(component)
    }

    /// The fixed illustration `EditorialExample` stands for
    pub fn editorial_example() -> Vec<Component> {
        vec![
            Component::Intro(IntroProps {
                title: "Singleton".into(),
                category: "Creacional".into(),
                level: "básico".into(),
                summary: "Garantiza una única instancia global y provee una forma controlada de acceder a ella.".into(),
                problem: "Cuando múltiples componentes intentan crear sus propias instancias, se duplican recursos y se rompen invariantes compartidos.".into(),
                badges: Vec::new(),
                cta: Some(Cta {
                    label: "Ver ejemplos".into(),
                    href: "/patrones/singleton#ejemplos".into(),
                }),
            }),
            Component::NarrativeSection(NarrativeSectionProps {
                label: "Por qué existe".into(),
                title: "Coordinación centralizada".into(),
                body: "Aparece cuando un recurso debe ser único, ya sea una conexión, un logger o un registro de configuración.".into(),
                bullets: vec![
                    "Evita doble inicialización".into(),
                    "Ofrece punto de acceso controlado".into(),
                ],
                aside: None,
            }),
            Component::DualList(DualListProps {
                left_title: "Ventajas".into(),
                left_items: vec![
                    "Reduce consumo de memoria".into(),
                    "Simplifica orquestación".into(),
                ],
                right_title: "Desventajas".into(),
                right_items: vec!["Aumenta acoplamiento".into(), "Complica pruebas".into()],
                footnote: Some(
                    "Evalúa alternativas como inyección de dependencias antes de adoptarlo.".into(),
                ),
            }),
        ]
    }
}

fn from_params<T: DeserializeOwned>(params: Mapping) -> Result<T, serde_yaml::Error> {
    serde_yaml::from_value(Value::Mapping(params))
}

/// Colour of an intro badge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BadgeTone {
    #[default]
    Neutral,
    Primary,
    Accent,
}

impl BadgeTone {
    /// Unknown tones render as neutral
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "primary" => BadgeTone::Primary,
            "accent" => BadgeTone::Accent,
            _ => BadgeTone::Neutral,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BadgeTone::Neutral => "neutral",
            BadgeTone::Primary => "primary",
            BadgeTone::Accent => "accent",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Badge {
    #[serde(default, deserialize_with = "lenient::string")]
    pub label: String,

    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub tone: Option<String>,
}

impl Badge {
    pub fn new(label: impl Into<String>, tone: BadgeTone) -> Self {
        Self {
            label: label.into(),
            tone: Some(tone.as_str().to_string()),
        }
    }

    pub fn tone(&self) -> BadgeTone {
        self.tone
            .as_deref()
            .map(BadgeTone::from_name)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cta {
    #[serde(default, deserialize_with = "lenient::string")]
    pub label: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntroProps {
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub category: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub level: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub summary: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub problem: String,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub badges: Vec<Badge>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta: Option<Cta>,
}

impl IntroProps {
    /// Authored badges, or category and level when none were given
    pub fn effective_badges(&self) -> Vec<Badge> {
        if !self.badges.is_empty() {
            return self.badges.clone();
        }

        vec![
            Badge::new(self.category.clone(), BadgeTone::Primary),
            Badge::new(format!("Nivel {}", self.level), BadgeTone::Neutral),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrativeSectionProps {
    #[serde(default, deserialize_with = "lenient::string")]
    pub label: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub body: String,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub bullets: Vec<String>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub aside: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DualListProps {
    #[serde(default, deserialize_with = "lenient::string")]
    pub left_title: String,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub left_items: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub right_title: String,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub right_items: Vec<String>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub footnote: Option<String>,
}

/// One tab of a code-tabs block
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CodeSample {
    #[serde(default, deserialize_with = "lenient::string")]
    pub lang: String,
    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub label: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub code: String,
}

impl CodeSample {
    pub fn new(lang: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            lang: lang.into(),
            label: None,
            code: code.into(),
        }
    }

    /// Tab caption: the label, or the language in upper case
    pub fn display_label(&self) -> String {
        self.label
            .clone()
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| self.lang.to_uppercase())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CodeTabsProps {
    #[serde(default, deserialize_with = "lenient::seq")]
    pub samples: Vec<CodeSample>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(yaml: &str) -> Mapping {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn resolves_bare_and_prefixed_names() {
        assert_eq!(ComponentKind::resolve("Intro"), Some(ComponentKind::Intro));
        assert_eq!(
            ComponentKind::resolve("PatternCodeTabs"),
            Some(ComponentKind::CodeTabs)
        );
        assert_eq!(ComponentKind::resolve("Pattern"), None);
        assert_eq!(ComponentKind::resolve("PatternQuiz"), None);
        assert_eq!(ComponentKind::resolve("intro"), None);
    }

    #[test]
    fn missing_parameters_default() {
        let component =
            Component::bind(ComponentKind::DualList, params("leftTitle: Pros"), None).unwrap();
        assert_eq!(
            component,
            Component::DualList(DualListProps {
                left_title: "Pros".into(),
                ..DualListProps::default()
            })
        );
    }

    #[test]
    fn scalars_are_coerced() {
        let component = Component::bind(
            ComponentKind::NarrativeSection,
            params("label: 1\ntitle: true\nbullets: solo uno\n"),
            None,
        )
        .unwrap();

        let Component::NarrativeSection(props) = component else {
            panic!("expected NarrativeSection");
        };
        assert_eq!(props.label, "1");
        assert_eq!(props.title, "true");
        assert_eq!(props.bullets, vec!["solo uno"]);
    }

    #[test]
    fn impossible_shapes_fail() {
        let result = Component::bind(ComponentKind::CodeTabs, params("samples: 42"), None);
        assert!(result.is_err());

        let result = Component::bind(ComponentKind::Intro, params("title: [a, b]"), None);
        assert!(result.is_err());
    }

    #[test]
    fn children_become_aside() {
        let component = Component::bind(
            ComponentKind::NarrativeSection,
            params("label: Nota"),
            Some("\n  Texto aparte.\n".into()),
        )
        .unwrap();
        let Component::NarrativeSection(props) = component else {
            panic!("expected NarrativeSection");
        };
        assert_eq!(props.aside.as_deref(), Some("Texto aparte."));
    }

    #[test]
    fn editorial_example_ignores_params() {
        let component =
            Component::bind(ComponentKind::EditorialExample, params("title: x"), None).unwrap();
        assert_eq!(component, Component::EditorialExample);
        assert_eq!(Component::editorial_example().len(), 3);
    }

    #[test]
    fn intro_badges_fall_back_to_category_and_level() {
        let props = IntroProps {
            category: "Creacional".into(),
            level: "básico".into(),
            ..IntroProps::default()
        };
        let badges = props.effective_badges();
        assert_eq!(badges[0].label, "Creacional");
        assert_eq!(badges[0].tone(), BadgeTone::Primary);
        assert_eq!(badges[1].label, "Nivel básico");

        let custom = Badge {
            label: "Nuevo".into(),
            tone: Some("sparkly".into()),
        };
        assert_eq!(custom.tone(), BadgeTone::Neutral);
    }

    #[test]
    fn sample_labels() {
        let mut sample = CodeSample::new("ts", "let x = 1");
        assert_eq!(sample.display_label(), "TS");
        sample.label = Some("TypeScript".into());
        assert_eq!(sample.display_label(), "TypeScript");
    }
}
