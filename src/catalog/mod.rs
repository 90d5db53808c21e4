//! Prompt Catalog
//!
//! Static mapping from artifact kind to a prompt template and generation
//! options. This is the single source of truth for prompt text; the original
//! deployment targets each carried near-duplicate copies of every prompt,
//! collapsed here into one registration per kind.
//!
//! Read-only after construction: `lookup` never mutates, so the catalog is
//! freely shareable across concurrent requests.

use std::collections::HashMap;

use crate::constants::{model, tokens};
use crate::types::{ArtifactKind, GatewayError, SdlcPhase};

// =============================================================================
// Template & Options
// =============================================================================

/// System prompt plus a pure builder turning caller free text into the final
/// user message. Owned exclusively by the catalog; never mutated after
/// registration.
#[derive(Clone)]
pub struct PromptTemplate {
    system_text: &'static str,
    user_builder: fn(&str) -> String,
}

impl PromptTemplate {
    pub fn new(system_text: &'static str, user_builder: fn(&str) -> String) -> Self {
        Self {
            system_text,
            user_builder,
        }
    }

    pub fn system_text(&self) -> &str {
        self.system_text
    }

    pub fn user_text(&self, input: &str) -> String {
        (self.user_builder)(input)
    }
}

impl std::fmt::Debug for PromptTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let preview: String = self.system_text.chars().take(40).collect();
        f.debug_struct("PromptTemplate")
            .field("system_text", &format!("{}...", preview))
            .finish()
    }
}

/// Per-kind generation options, constant for a process lifetime
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOptions {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl GenerationOptions {
    pub fn new(model: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            model: model.into(),
            max_tokens,
            temperature: model::DEFAULT_TEMPERATURE,
        }
    }

    /// Contract check: positive token budget, temperature within [0, 2]
    pub fn is_valid(&self) -> bool {
        self.max_tokens > 0 && (0.0..=2.0).contains(&self.temperature)
    }
}

#[derive(Debug, Clone)]
struct CatalogEntry {
    template: PromptTemplate,
    options: GenerationOptions,
}

// =============================================================================
// Catalog
// =============================================================================

/// Registry with exactly one template and one options entry per kind
#[derive(Debug, Clone)]
pub struct PromptCatalog {
    entries: HashMap<ArtifactKind, CatalogEntry>,
}

impl PromptCatalog {
    /// Catalog with no registrations. Lookups all fail; used to exercise the
    /// unknown-kind path.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Full standard catalog with the default model
    pub fn standard() -> Self {
        Self::standard_with_model(model::DEFAULT_MODEL)
    }

    /// Full standard catalog with a configured model name
    pub fn standard_with_model(model_name: &str) -> Self {
        let mut catalog = Self::empty();

        catalog.register(
            ArtifactKind::Analysis,
            PromptTemplate::new(ANALYSIS_SYSTEM, analysis_user),
            GenerationOptions::new(model_name, tokens::ANALYSIS_MAX_TOKENS),
        );
        catalog.register(
            ArtifactKind::Design,
            PromptTemplate::new(DESIGN_SYSTEM, design_user),
            GenerationOptions::new(model_name, tokens::DOCUMENT_MAX_TOKENS),
        );
        catalog.register(
            ArtifactKind::Erd,
            PromptTemplate::new(ERD_SYSTEM, erd_user),
            GenerationOptions::new(model_name, tokens::DOCUMENT_MAX_TOKENS),
        );
        catalog.register(
            ArtifactKind::LowLevel,
            PromptTemplate::new(LOWLEVEL_SYSTEM, lowlevel_user),
            GenerationOptions::new(model_name, tokens::DOCUMENT_MAX_TOKENS),
        );
        catalog.register(
            ArtifactKind::WebsiteStructure,
            PromptTemplate::new(WEBSITE_STRUCTURE_SYSTEM, website_structure_user),
            GenerationOptions::new(model_name, tokens::DOCUMENT_MAX_TOKENS),
        );
        catalog.register(
            ArtifactKind::UserStories,
            PromptTemplate::new(USER_STORIES_SYSTEM, user_stories_user),
            GenerationOptions::new(model_name, tokens::STORIES_MAX_TOKENS),
        );
        catalog.register(
            ArtifactKind::Requirements,
            PromptTemplate::new(REQUIREMENTS_SYSTEM, requirements_user),
            GenerationOptions::new(model_name, tokens::DOCUMENT_MAX_TOKENS),
        );
        for phase in SdlcPhase::ALL {
            catalog.register(
                ArtifactKind::Generic(phase),
                PromptTemplate::new(phase_system(phase), generic_user),
                GenerationOptions::new(model_name, tokens::GENERIC_MAX_TOKENS),
            );
        }

        catalog
    }

    fn register(
        &mut self,
        kind: ArtifactKind,
        template: PromptTemplate,
        options: GenerationOptions,
    ) {
        debug_assert!(options.is_valid());
        self.entries.insert(kind, CatalogEntry { template, options });
    }

    /// Look up the template for a kind. An unregistered kind is a
    /// configuration error, fatal to the request but not the process.
    pub fn lookup(&self, kind: ArtifactKind) -> std::result::Result<&PromptTemplate, GatewayError> {
        self.entries
            .get(&kind)
            .map(|e| &e.template)
            .ok_or_else(|| GatewayError::unknown_kind(kind))
    }

    /// Generation options for a kind
    pub fn options_for(
        &self,
        kind: ArtifactKind,
    ) -> std::result::Result<&GenerationOptions, GatewayError> {
        self.entries
            .get(&kind)
            .map(|e| &e.options)
            .ok_or_else(|| GatewayError::unknown_kind(kind))
    }

    pub fn registered_kinds(&self) -> impl Iterator<Item = ArtifactKind> + '_ {
        self.entries.keys().copied()
    }
}

// =============================================================================
// System Prompts
// =============================================================================

const ANALYSIS_SYSTEM: &str = "\
You are an expert software development consultant and business analyst. Analyze the given \
project concept and provide a comprehensive project analysis that includes:

1. **Project Scope & Goals** - Clear definition of what the project will accomplish
2. **Target Audience** - Detailed user personas and demographics
3. **User Stories** - Specific user scenarios and acceptance criteria
4. **Functional Requirements** - Core features and capabilities
5. **Non-Functional Requirements** - Performance, security, scalability needs
6. **Technical Requirements** - Technology stack, infrastructure, and architecture

Format your response in clean HTML with proper headings, sections, and bullet points. Use \
professional styling with clear structure. Make it comprehensive yet concise, suitable for \
project planning and stakeholder review.";

const DESIGN_SYSTEM: &str = "\
You are an expert system architect and technical lead. Analyze the given requirements \
document and generate a comprehensive high level design that includes:

1. **System Architecture Overview** - Overall system structure, layers, and architectural patterns
2. **Major Component Identification** - Key components, modules, and their responsibilities
3. **Technology Stack Decisions** - Recommended technologies, frameworks, and tools with justifications
4. **System-wide Design Patterns** - Architectural patterns, design principles, and best practices
5. **Integration Approaches** - How components communicate, APIs, messaging, and data flow
6. **Database Architecture** - Data models, storage solutions, and data management strategies

Format your response in clean HTML with proper headings, sections, bullet points, and \
professional styling. Make it comprehensive, technically sound, and suitable for development \
teams and technical stakeholders. Include specific recommendations and technical rationale \
for all decisions.";

const ERD_SYSTEM: &str = "\
You are an expert database architect and data modeler. Analyze the given data requirements \
and generate a comprehensive Entity-Relationship Diagram (ERD) that includes:

1. **Database Tables** - All entities with their attributes and data types
2. **Primary Keys** - Unique identifiers for each entity
3. **Foreign Keys** - Relationships between entities
4. **Relationships** - One-to-one, one-to-many, many-to-many relationships
5. **Cardinality** - Specific relationship constraints and multiplicity
6. **Indexes** - Performance optimization recommendations
7. **Constraints** - Data validation rules and business logic

Format your response in clean HTML with proper headings, sections, bullet points, and \
professional styling. Include detailed table structures, relationship descriptions, and \
SQL-like schema definitions. Make it comprehensive, technically accurate, and suitable for \
database developers and system architects.";

const LOWLEVEL_SYSTEM: &str = "\
You are an expert software architect and technical lead specializing in detailed system \
design. Analyze the given specifications and generate comprehensive low-level technical \
diagrams using TEXT-BASED representations only. Include:

1. **Class/Component Diagrams** - Use ASCII art or structured text to show class hierarchies, \
attributes, methods, and relationships. Use boxes and lines made of text characters.
2. **Sequence Diagrams** - Create text-based sequence diagrams showing step-by-step \
interactions between objects/components using arrows (-->) and text descriptions.
3. **Database Schema** - Present detailed table structures in formatted text tables showing \
columns, data types, constraints, and relationships.
4. **API Specifications** - Complete method signatures, parameters, return types, and HTTP \
endpoints in structured text format.
5. **Algorithms** - Pseudocode and text-based flowcharts for complex processing logic.
6. **Error Handling** - Specific exceptions, error codes, and recovery mechanisms in \
structured text.

IMPORTANT: Use ONLY text-based diagrams and representations. NO images or visual graphics. \
Use ASCII characters, tables, code blocks, and structured text formatting. Make all content \
responsive and readable on mobile devices. Format your response in clean HTML with proper \
headings, sections, code blocks, and professional styling.";

const WEBSITE_STRUCTURE_SYSTEM: &str = "\
You are an expert web developer and project architect specializing in website structure and \
organization. Analyze the given website concept and generate a comprehensive project \
structure that includes:

1. **Complete File Structure** - Organized folder hierarchy with all necessary files and directories
2. **HTML Pages** - All required pages with proper naming conventions
3. **CSS Organization** - Stylesheet structure and organization approach
4. **JavaScript Architecture** - Script organization and modular structure
5. **Asset Management** - Images, fonts, and media organization
6. **Configuration Files** - Build tools, package management, and deployment configs
7. **Documentation Structure** - README, documentation, and project guides

Format your response in clean HTML with proper headings, code blocks for file structures, \
and professional styling. Include detailed explanations of the organizational approach, \
naming conventions, and best practices. Make it comprehensive and ready for immediate \
implementation by web developers.";

const USER_STORIES_SYSTEM: &str = "\
You are an expert product manager and UX designer. Generate comprehensive user stories with \
specific features and implementation approaches.";

const REQUIREMENTS_SYSTEM: &str = "\
You are an expert business analyst and product manager. Generate a comprehensive requirements \
document that includes:

1. **Executive Summary** - Project overview, goals, and value proposition
2. **Functional Requirements** - Detailed feature specifications with acceptance criteria
3. **Non-Functional Requirements** - Performance, security, usability, scalability requirements
4. **User Requirements** - User roles, permissions, and interaction patterns
5. **System Requirements** - Technical specifications, platform requirements, and constraints
6. **Business Requirements** - Success metrics, compliance needs, and business rules
7. **Interface Requirements** - UI/UX specifications, API requirements, and integration needs

Format your response in clean HTML with proper headings, sections, numbered lists, and \
professional styling. Make it comprehensive, detailed, and suitable for development teams and \
stakeholders. Include specific acceptance criteria and measurable requirements.";

fn phase_system(phase: SdlcPhase) -> &'static str {
    match phase {
        SdlcPhase::Design => {
            "You are a UX/UI design expert. Generate wireframes, design specifications, and \
             user experience recommendations. Format your response in HTML."
        }
        SdlcPhase::Development => {
            "You are a senior software developer. Generate code structure, implementation \
             plans, and technical specifications. Format your response in HTML."
        }
        SdlcPhase::Testing => {
            "You are a QA engineer. Generate test plans, test cases, and quality assurance \
             strategies. Format your response in HTML."
        }
        SdlcPhase::Deployment => {
            "You are a DevOps engineer. Generate deployment strategies, CI/CD pipelines, and \
             infrastructure recommendations. Format your response in HTML."
        }
        SdlcPhase::Maintenance => {
            "You are a software maintenance specialist. Generate maintenance plans, monitoring \
             strategies, and update procedures. Format your response in HTML."
        }
    }
}

// =============================================================================
// User Message Builders
// =============================================================================

fn analysis_user(concept: &str) -> String {
    format!(
        "Analyze this project concept for comprehensive SDLC planning: {}\n\n\
         Please provide detailed analysis covering:\n\
         - Project scope and strategic goals\n\
         - Target audience definition and user personas\n\
         - User stories with acceptance criteria\n\
         - Complete functional requirements\n\
         - Non-functional requirements (performance, security, etc.)\n\
         - Technical requirements and architecture recommendations",
        concept
    )
}

fn design_user(requirements: &str) -> String {
    format!(
        "Based on these requirements, generate a comprehensive high level system design:\n\n{}\n\n\
         Please provide detailed technical analysis covering:\n\
         - Complete system architecture with component relationships\n\
         - Specific technology recommendations with reasoning\n\
         - Database design and data architecture decisions\n\
         - Integration patterns and communication protocols\n\
         - Security considerations and non-functional requirements\n\
         - Scalability and performance design decisions",
        requirements
    )
}

fn erd_user(requirements: &str) -> String {
    format!(
        "Based on these data requirements, generate a comprehensive Entity-Relationship Diagram:\n\n{}\n\n\
         Please provide detailed database design covering:\n\
         - Complete table structures with all attributes and data types\n\
         - Primary and foreign key definitions\n\
         - Detailed relationship mappings with cardinality\n\
         - Junction tables for many-to-many relationships\n\
         - Database constraints and validation rules\n\
         - Performance considerations and indexing recommendations",
        requirements
    )
}

fn lowlevel_user(requirements: &str) -> String {
    format!(
        "Based on these system specifications, generate comprehensive low-level technical diagrams:\n\n{}\n\n\
         Please provide detailed technical analysis covering:\n\
         - Complete class/component structures with all methods and properties\n\
         - Detailed sequence diagrams showing object interactions\n\
         - Full database schema with all constraints and relationships\n\
         - Complete API specifications with all endpoints and data formats\n\
         - Algorithmic implementations with pseudocode\n\
         - Comprehensive error handling strategies and exception management",
        requirements
    )
}

fn website_structure_user(concept: &str) -> String {
    format!(
        "Based on this website concept, generate a complete project structure and file organization:\n\n{}\n\n\
         Please provide detailed structure covering:\n\
         - Complete folder hierarchy and file organization\n\
         - All HTML pages and components needed\n\
         - CSS and JavaScript organization strategy\n\
         - Asset and media file management\n\
         - Build and deployment configuration\n\
         - Documentation and project setup guides",
        concept
    )
}

// The original forwarded the user-stories prompt untouched
fn user_stories_user(prompt: &str) -> String {
    prompt.to_string()
}

fn requirements_user(concept: &str) -> String {
    format!(
        "Generate a comprehensive requirements document for this project concept:\n\n{}\n\n\
         Please provide detailed requirements covering:\n\
         - Complete functional specifications with user scenarios\n\
         - Performance, security, and scalability requirements\n\
         - Technical requirements and system constraints\n\
         - Business requirements and success criteria\n\
         - User interface and experience requirements\n\
         - Integration and API specifications",
        concept
    )
}

fn generic_user(prompt: &str) -> String {
    prompt.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_every_kind_is_registered() {
        let catalog = PromptCatalog::standard();
        for kind in ArtifactKind::all() {
            let template = catalog.lookup(kind).unwrap();
            assert!(!template.system_text().is_empty(), "{} system", kind);
            assert!(!template.user_text("a blog platform").is_empty(), "{} user", kind);
            assert!(catalog.options_for(kind).unwrap().is_valid(), "{} options", kind);
        }
    }

    #[test]
    fn test_empty_catalog_fails_lookup() {
        let catalog = PromptCatalog::empty();
        let err = catalog.lookup(ArtifactKind::Erd).unwrap_err();
        assert_eq!(err.kind, crate::types::ErrorKind::UnknownArtifactKind);
    }

    #[test]
    fn test_token_budgets_match_kind() {
        let catalog = PromptCatalog::standard();
        assert_eq!(
            catalog.options_for(ArtifactKind::Analysis).unwrap().max_tokens,
            3000
        );
        assert_eq!(
            catalog.options_for(ArtifactKind::Erd).unwrap().max_tokens,
            4000
        );
        assert_eq!(
            catalog.options_for(ArtifactKind::UserStories).unwrap().max_tokens,
            2000
        );
        assert_eq!(
            catalog.options_for(ArtifactKind::Requirements).unwrap().max_tokens,
            4000
        );
        assert_eq!(
            catalog
                .options_for(ArtifactKind::Generic(SdlcPhase::Testing))
                .unwrap()
                .max_tokens,
            1500
        );
    }

    #[test]
    fn test_lowlevel_forbids_images() {
        let catalog = PromptCatalog::standard();
        let system = catalog
            .lookup(ArtifactKind::LowLevel)
            .unwrap()
            .system_text()
            .to_string();
        assert!(system.contains("TEXT-BASED"));
        assert!(system.contains("NO images"));
    }

    #[test]
    fn test_configured_model_flows_into_options() {
        let catalog = PromptCatalog::standard_with_model("gpt-4o-mini");
        for kind in ArtifactKind::all() {
            assert_eq!(catalog.options_for(kind).unwrap().model, "gpt-4o-mini");
        }
    }

    proptest! {
        #[test]
        fn prop_user_text_embeds_input(input in "[a-zA-Z0-9 ]{1,200}") {
            let catalog = PromptCatalog::standard();
            for kind in ArtifactKind::all() {
                let text = catalog.lookup(kind).unwrap().user_text(&input);
                prop_assert!(!text.is_empty());
                prop_assert!(text.contains(input.as_str()));
            }
        }
    }
}
