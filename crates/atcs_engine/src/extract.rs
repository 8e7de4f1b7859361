use atcs_core::{Category, KeywordTable, RecordDraft, StatementRecord};
use atcs_logging::atcs_debug;
use ego_tree::{NodeId, NodeRef};
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};

/// Selectors and keywords describing a judge's statement markup.
///
/// The defaults match AtCoder task pages read in Japanese.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractorConfig {
    /// Main statement region of the page.
    pub statement_selector: String,
    /// Class of the reader-language wrapper inside the region, e.g. `lang-ja`.
    pub locale_class: String,
    pub section_selector: String,
    /// Only the first match inside a section is treated as its heading.
    pub heading_selector: String,
    pub image_selector: String,
    pub keywords: KeywordTable,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self::for_language("ja")
    }
}

impl ExtractorConfig {
    /// AtCoder layout for the `lang-{language}` statement variant.
    pub fn for_language(language: &str) -> Self {
        Self {
            statement_selector: "#task-statement".to_string(),
            locale_class: format!("lang-{language}"),
            section_selector: ".part".to_string(),
            heading_selector: "h3".to_string(),
            image_selector: "img[src]".to_string(),
            keywords: KeywordTable::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    #[error("problem statement not found")]
    NotFound,
    #[error("invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },
}

pub trait Extractor: Send + Sync {
    fn extract(&self, document: &Html) -> Result<StatementRecord, ExtractError>;
}

struct Selectors {
    statement: Selector,
    /// Localized wrapper anywhere inside the statement region.
    container: Selector,
    /// Localized wrapper relative to an already selected region.
    locale: Selector,
    section: Selector,
    heading: Selector,
    image: Selector,
}

impl Selectors {
    fn compile(config: &ExtractorConfig) -> Result<Self, ExtractError> {
        let locale = format!(".{}", config.locale_class);
        Ok(Self {
            statement: compile(&config.statement_selector)?,
            container: compile(&format!("{} {}", config.statement_selector, locale))?,
            locale: compile(&locale)?,
            section: compile(&config.section_selector)?,
            heading: compile(&config.heading_selector)?,
            image: compile(&config.image_selector)?,
        })
    }
}

fn compile(selector: &str) -> Result<Selector, ExtractError> {
    Selector::parse(selector).map_err(|err| ExtractError::Selector {
        selector: selector.to_string(),
        message: err.to_string(),
    })
}

/// Document plus compiled configuration, shared by all strategies.
struct Page<'a> {
    document: &'a Html,
    selectors: &'a Selectors,
    keywords: &'a KeywordTable,
}

impl<'a> Page<'a> {
    fn containers(&self) -> impl Iterator<Item = ElementRef<'a>> + 'a {
        let selectors = self.selectors;
        self.document.select(&selectors.container)
    }

    fn regions(&self) -> impl Iterator<Item = ElementRef<'a>> + 'a {
        let selectors = self.selectors;
        self.document.select(&selectors.statement)
    }

    fn collect_images(&self, scope: ElementRef<'_>, draft: &mut RecordDraft) {
        for img in scope.select(&self.selectors.image) {
            if let Some(src) = img.value().attr("src") {
                draft.push_image(src);
            }
        }
    }

    /// Section images first, then whatever else the container holds.
    fn collect_container_images(&self, container: ElementRef<'_>, draft: &mut RecordDraft) {
        for section in container.select(&self.selectors.section) {
            self.collect_images(section, draft);
        }
        self.collect_images(container, draft);
    }
}

/// One extraction tier. Yields a draft only when it found some text.
trait ExtractionStrategy: Send + Sync {
    fn name(&self) -> &'static str;
    fn apply(&self, page: &Page<'_>) -> Option<RecordDraft>;
}

/// Headed sections inside the localized container, classified by keyword.
struct SectionStrategy;

impl ExtractionStrategy for SectionStrategy {
    fn name(&self) -> &'static str {
        "sections"
    }

    fn apply(&self, page: &Page<'_>) -> Option<RecordDraft> {
        let mut draft = RecordDraft::new();
        for container in page.containers() {
            for section in container.select(&page.selectors.section) {
                let heading = section.select(&page.selectors.heading).next();
                let heading_text = heading.map(trimmed_text).unwrap_or_default();

                if let Some(category) = page.keywords.classify(&heading_text) {
                    let body = text_without(section, heading.map(|h| h.id()));
                    if draft.assign(category, body.trim()) {
                        atcs_debug!("section '{}' classified as {}", heading_text, category);
                    }
                }
                page.collect_images(section, &mut draft);
            }
            page.collect_images(container, &mut draft);
        }
        draft.has_content().then_some(draft)
    }
}

/// The localized container's whole text when no section could be classified.
struct ContainerStrategy;

impl ExtractionStrategy for ContainerStrategy {
    fn name(&self) -> &'static str {
        "container"
    }

    fn apply(&self, page: &Page<'_>) -> Option<RecordDraft> {
        let mut draft = RecordDraft::new();
        for container in page.containers() {
            draft.assign(Category::Problem, trimmed_text(container));
            page.collect_container_images(container, &mut draft);
        }
        draft.has_content().then_some(draft)
    }
}

/// The statement region itself, preferring its localized parts when present.
struct RegionStrategy;

impl ExtractionStrategy for RegionStrategy {
    fn name(&self) -> &'static str {
        "region"
    }

    fn apply(&self, page: &Page<'_>) -> Option<RecordDraft> {
        let mut draft = RecordDraft::new();
        for region in page.regions() {
            let localized: Vec<ElementRef<'_>> = region.select(&page.selectors.locale).collect();
            let sources = if localized.is_empty() {
                vec![region]
            } else {
                localized
            };

            let text: String = sources.iter().map(|el| el.text().collect::<String>()).collect();
            if draft.assign(Category::Problem, text.trim()) {
                for source in sources {
                    page.collect_images(source, &mut draft);
                }
                break;
            }
        }
        draft.has_content().then_some(draft)
    }
}

/// Tiered statement extractor: sections, then container text, then the region.
pub struct StatementExtractor {
    selectors: Selectors,
    keywords: KeywordTable,
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl StatementExtractor {
    pub fn new(config: ExtractorConfig) -> Result<Self, ExtractError> {
        Ok(Self {
            selectors: Selectors::compile(&config)?,
            keywords: config.keywords,
            strategies: vec![
                Box::new(SectionStrategy),
                Box::new(ContainerStrategy),
                Box::new(RegionStrategy),
            ],
        })
    }

    pub fn extract_html(&self, html: &str) -> Result<StatementRecord, ExtractError> {
        self.extract(&Html::parse_document(html))
    }
}

impl Extractor for StatementExtractor {
    fn extract(&self, document: &Html) -> Result<StatementRecord, ExtractError> {
        let page = Page {
            document,
            selectors: &self.selectors,
            keywords: &self.keywords,
        };
        self.strategies
            .iter()
            .find_map(|strategy| {
                let draft = strategy.apply(&page)?;
                atcs_debug!("statement extracted by {} tier", strategy.name());
                draft.finish()
            })
            .ok_or(ExtractError::NotFound)
    }
}

fn trimmed_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// All text below `element`, leaving out the subtree rooted at `skip`.
fn text_without(element: ElementRef<'_>, skip: Option<NodeId>) -> String {
    let mut out = String::new();
    push_text(*element, skip, &mut out);
    out
}

fn push_text(node: NodeRef<'_, Node>, skip: Option<NodeId>, out: &mut String) {
    for child in node.children() {
        if Some(child.id()) == skip {
            continue;
        }
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(_) => push_text(child, skip, out),
            _ => {}
        }
    }
}
