//! Static assistant configuration
//!
//! The Tax Provider instruction template is fixed at build time and is not
//! user-editable at runtime. Only the knowledge-source file varies per
//! session.

/// Assistant display name
pub const ASSISTANT_NAME: &str = "Tax Provider";

/// Core instructions for the tax-rate matching assistant
pub const ASSISTANT_INSTRUCTIONS: &str = "You are a Tax Rate Matcher. Your primary objective is \
to provide the exact tax value for products based on user queries. Interpret product \
descriptions, categorize them, and reference the attached text file to extract the precise tax \
rate for the specified product. Adhere strictly to the data in the text file, providing tax \
rates only from this source. Accurately categorize each product and find the single matching \
tax rate, asking for clarification if needed. Adapt your communication style for technical or \
casual interactions. Always include the category from the text file so the user can check \
accuracy.";

/// Prefix prepended to the instructions at provisioning time
pub const ASSISTANT_INSTRUCTIONS_PREFIX: &str = "You provide tax rates for products. Provide \
only the tax rate for the user's product, not a list of similar products. Each answer must \
include the product name, the corresponding import and local tax rates, and the category from \
the text file.";

/// Default model backing the assistant
pub const DEFAULT_MODEL: &str = "gpt-4-1106-preview";

/// Configuration for a remote assistant
///
/// The default profile is the fixed Tax Provider template.
#[derive(Debug, Clone)]
pub struct AssistantProfile {
    pub name: String,
    pub instructions: String,
    pub instructions_prefix: String,
    pub model: String,
}

impl AssistantProfile {
    /// The fixed Tax Provider profile
    pub fn tax_provider() -> Self {
        Self {
            name: ASSISTANT_NAME.to_string(),
            instructions: ASSISTANT_INSTRUCTIONS.to_string(),
            instructions_prefix: ASSISTANT_INSTRUCTIONS_PREFIX.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Use a different backing model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Full instruction text sent to the service (prefix first)
    pub fn combined_instructions(&self) -> String {
        format!("{}\n\n{}", self.instructions_prefix, self.instructions)
    }
}

impl Default for AssistantProfile {
    fn default() -> Self {
        Self::tax_provider()
    }
}
