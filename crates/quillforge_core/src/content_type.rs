//! Content types and their generation prompt templates.

use serde::{Deserialize, Serialize};

/// The kinds of content the engine can generate.
///
/// This is a closed set: serde and strum parsing reject unknown tags rather
/// than falling back to an arbitrary default.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ContentType {
    /// Long-form informative article
    Article,
    /// Conversational blog post
    BlogPost,
    /// Persuasive marketing copy
    MarketingCopy,
    /// Product description
    ProductDescription,
    /// Professional email
    Email,
    /// Short-form social media post
    SocialMedia,
    /// Press release
    PressRelease,
    /// Research-backed white paper
    WhitePaper,
    /// Customer case study
    CaseStudy,
    /// Subscriber newsletter
    Newsletter,
}

impl Default for ContentType {
    fn default() -> Self {
        Self::Article
    }
}

impl ContentType {
    /// Opening instruction of the generation prompt.
    fn opener(&self, title: &str) -> String {
        match self {
            Self::Article => format!("Write a comprehensive article with the title: '{title}'"),
            Self::BlogPost => format!("Write an engaging blog post with the title: '{title}'"),
            Self::MarketingCopy => {
                format!("Write persuasive marketing copy with the title: '{title}'")
            }
            Self::ProductDescription => {
                format!("Write a detailed product description with the title: '{title}'")
            }
            Self::Email => format!("Write professional email content with the subject: '{title}'"),
            Self::SocialMedia => {
                format!("Write engaging social media content with the title: '{title}'")
            }
            Self::PressRelease => {
                format!("Write a professional press release with the headline: '{title}'")
            }
            Self::WhitePaper => {
                format!("Write a comprehensive white paper with the title: '{title}'")
            }
            Self::CaseStudy => format!("Write a detailed case study with the title: '{title}'"),
            Self::Newsletter => format!("Write an engaging newsletter with the title: '{title}'"),
        }
    }

    /// Structural requirements block appended to the generation prompt.
    fn requirements(&self) -> &'static str {
        match self {
            Self::Article => {
                "Article Requirements:\n\
                 - Write a comprehensive, informative article with clear structure\n\
                 - Include an engaging introduction that hooks the reader\n\
                 - Develop well-structured body sections with supporting details\n\
                 - Provide a strong conclusion that summarizes key points\n\
                 - Use clear and concise language throughout\n\
                 - Use subheadings to organize content effectively"
            }
            Self::BlogPost => {
                "Blog Post Requirements:\n\
                 - Write an engaging blog post that's conversational and relatable\n\
                 - Use a friendly, approachable tone\n\
                 - Include relevant examples and anecdotes\n\
                 - Use shorter paragraphs for better readability\n\
                 - Include a compelling call-to-action\n\
                 - End with questions or prompts for reader engagement"
            }
            Self::MarketingCopy => {
                "Marketing Copy Requirements:\n\
                 - Write persuasive marketing copy that highlights benefits\n\
                 - Focus on customer pain points and solutions\n\
                 - Include compelling calls-to-action\n\
                 - Highlight unique value propositions\n\
                 - Use clear, benefit-driven headlines\n\
                 - Make it conversion-focused"
            }
            Self::ProductDescription => {
                "Product Description Requirements:\n\
                 - Write clear, detailed product descriptions\n\
                 - Highlight key features and benefits\n\
                 - Use bullet points for easy scanning\n\
                 - Include usage scenarios and applications\n\
                 - Address common customer questions\n\
                 - End with a clear call-to-action"
            }
            Self::Email => {
                "Email Content Requirements:\n\
                 - Start with an engaging opening that captures attention\n\
                 - Use clear, concise language throughout\n\
                 - Structure content with proper paragraphs\n\
                 - Include clear next steps or call-to-action\n\
                 - End with professional closing\n\
                 - Keep it scannable and easy to read"
            }
            Self::SocialMedia => {
                "Social Media Content Requirements:\n\
                 - Write engaging social media content that's concise and shareable\n\
                 - Use attention-grabbing headlines and hooks\n\
                 - Include relevant hashtags where appropriate\n\
                 - Encourage interaction and engagement\n\
                 - Use conversational and relatable tone\n\
                 - Include clear call-to-action"
            }
            Self::PressRelease => {
                "Press Release Requirements:\n\
                 - Write a professional press release following standard format\n\
                 - Include compelling headline and subheadline\n\
                 - Start with strong lead paragraph (who, what, when, where, why)\n\
                 - Provide supporting details and quotes\n\
                 - Use third-person, objective tone\n\
                 - Make it newsworthy and media-friendly"
            }
            Self::WhitePaper => {
                "White Paper Requirements:\n\
                 - Write a comprehensive white paper with executive summary\n\
                 - Include detailed analysis and research findings\n\
                 - Provide actionable insights and recommendations\n\
                 - Use authoritative and professional tone\n\
                 - Structure with clear sections and subsections\n\
                 - End with conclusions and next steps"
            }
            Self::CaseStudy => {
                "Case Study Requirements:\n\
                 - Write a detailed case study with clear problem statement\n\
                 - Describe the solution approach and implementation\n\
                 - Include specific details and metrics\n\
                 - Show before and after scenarios\n\
                 - Highlight key success factors\n\
                 - End with actionable takeaways"
            }
            Self::Newsletter => {
                "Newsletter Requirements:\n\
                 - Write an engaging newsletter with multiple sections\n\
                 - Provide valuable content for subscribers\n\
                 - Use conversational and friendly tone\n\
                 - Include relevant updates and news\n\
                 - Make it scannable with subheadings\n\
                 - Include calls-to-action"
            }
        }
    }
}

/// Everything needed to assemble one generation prompt.
///
/// # Examples
///
/// ```
/// use quillforge_core::{ContentType, PromptSpec};
///
/// let spec = PromptSpec {
///     content_type: ContentType::BlogPost,
///     title: "Ten Rust Tips",
///     brief: Some("A listicle for intermediate developers"),
///     target_length: Some(800),
///     style_guidance: None,
///     additional_instructions: None,
/// };
/// let prompt = spec.render();
/// assert!(prompt.starts_with("Write an engaging blog post"));
/// assert!(prompt.contains("approximately 800 words"));
/// assert!(prompt.contains("Blog Post Requirements:"));
/// ```
#[derive(Debug, Clone)]
pub struct PromptSpec<'a> {
    /// Which template to use
    pub content_type: ContentType,
    /// Content title or email subject
    pub title: &'a str,
    /// Optional brief or outline
    pub brief: Option<&'a str>,
    /// Optional target word count
    pub target_length: Option<u32>,
    /// Opaque style guidance produced by the style pipeline
    pub style_guidance: Option<&'a str>,
    /// Free-form extra instructions from the caller
    pub additional_instructions: Option<&'a str>,
}

impl PromptSpec<'_> {
    /// Assemble the full generation prompt.
    pub fn render(&self) -> String {
        let mut parts = vec![self.content_type.opener(self.title)];
        if let Some(brief) = self.brief {
            parts.push(format!("Brief/Outline: {brief}"));
        }
        if let Some(words) = self.target_length {
            parts.push(format!("Target length: approximately {words} words"));
        }
        if let Some(guidance) = self.style_guidance {
            parts.push(format!("Writing Style Guidelines:\n{guidance}"));
        }
        if let Some(extra) = self.additional_instructions {
            parts.push(format!("Additional Instructions: {extra}"));
        }
        parts.push(self.content_type.requirements().to_string());
        parts.join("\n\n")
    }
}
