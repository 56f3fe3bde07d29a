use crate::category::Category;
use crate::config::Config;
use crate::gemini::GeminiClient;
use crate::prompt::classification_prompt;

/// The AI scan stage: one model call per email, strict verdict parsing, and
/// a configured fallback on every failure path. Errors never escape this
/// component and no state is carried between invocations.
pub struct AiScan {
    config: Config,
}

impl AiScan {
    pub fn new(config: &Config) -> Self {
        AiScan {
            config: config.clone(),
        }
    }

    /// Classify one email. `narrowed` is the pre-filter's hint: a non-default
    /// value is excluded from the taxonomy offered to the model, so a
    /// category already ruled out upstream is never re-offered.
    pub async fn classify(&self, sender: &str, message: &str, narrowed: Category) -> Category {
        let excluded: Vec<Category> = if narrowed != Category::Unfiltered {
            vec![narrowed]
        } else {
            Vec::new()
        };
        let prompt = classification_prompt(sender, message, &excluded);

        // The client is scoped to this call and released on every exit path.
        let client = match GeminiClient::from_config(&self.config) {
            Ok(client) => client,
            Err(e) => {
                log::error!("classifier unavailable: {e}");
                return self.config.fallback;
            }
        };

        match client.generate(&prompt).await {
            Ok(text) => match parse_verdict(&text) {
                Some(category) => {
                    log::debug!("model classified email from {sender} as {category}");
                    category
                }
                None => {
                    log::warn!("model returned unparseable category: {text:?}");
                    self.config.fallback
                }
            },
            Err(e) => {
                log::error!("generateContent call failed: {e}");
                self.config.fallback
            }
        }
    }
}

/// Map a model reply onto the taxonomy: first line, trimmed, exact
/// case-insensitive name match. Anything else is a parse failure.
pub fn parse_verdict(text: &str) -> Option<Category> {
    Category::parse(text.lines().next().unwrap_or(""))
}
