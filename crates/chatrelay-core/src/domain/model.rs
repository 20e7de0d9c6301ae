//! The static catalog of advertised model identifiers.
//!
//! The bridge does not interpret model identifiers beyond membership
//! checks; the identifier is forwarded verbatim to the backend, which maps
//! it onto whatever the upstream service calls the model.

/// Set of model identifiers the bridge advertises and accepts.
#[derive(Debug, Clone)]
pub struct ModelCatalog {
    ids: Vec<String>,
}

impl ModelCatalog {
    /// Create a catalog from an explicit list of identifiers.
    #[must_use]
    pub fn new(ids: Vec<String>) -> Self {
        Self { ids }
    }

    /// The default catalog of upstream models.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(
            [
                "GPT-3.5-Turbo",
                "Assistant",
                "Code-Llama-70B-FW",
                "Gemini-Pro",
                "Web-Search",
                "Claude-instant",
                "ChatGPT",
                "Llama-2-7b",
                "Google-PaLM",
                "Llama-2-13b",
                "Claude-instant-100k",
                "Mistral-Medium",
                "Llama-2-70b-Groq",
                "RekaFlash",
                "Mixtral-8x7B-Chat",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        )
    }

    /// Whether `id` is a known model identifier.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|known| known == id)
    }

    /// All advertised identifiers, in catalog order.
    #[must_use]
    pub fn ids(&self) -> &[String] {
        &self.ids
    }
}
