use serde::{Deserialize, Serialize};

/// The closed set of categories an email can be triaged into.
///
/// Declaration order is the order categories are offered to the classifier,
/// so new members must be appended rather than inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    Spam,
    Phishing,
    School,
    Newsletter,
    Support,
    System,
    Welcome,
    Guide,
    Unfiltered,
    Long,
    Geminifail,
}

impl Category {
    /// All taxonomy members in declaration order. Downstream code iterates
    /// this slice instead of spelling out member lists.
    pub const ALL: &'static [Category] = &[
        Category::Spam,
        Category::Phishing,
        Category::School,
        Category::Newsletter,
        Category::Support,
        Category::System,
        Category::Welcome,
        Category::Guide,
        Category::Unfiltered,
        Category::Long,
        Category::Geminifail,
    ];

    /// Upper-case wire name, used for `CATEGORY:` output and verdict parsing.
    pub fn name(&self) -> &'static str {
        match self {
            Category::Spam => "SPAM",
            Category::Phishing => "PHISHING",
            Category::School => "SCHOOL",
            Category::Newsletter => "NEWSLETTER",
            Category::Support => "SUPPORT",
            Category::System => "SYSTEM",
            Category::Welcome => "WELCOME",
            Category::Guide => "GUIDE",
            Category::Unfiltered => "UNFILTERED",
            Category::Long => "LONG",
            Category::Geminifail => "GEMINIFAIL",
        }
    }

    /// Title-case form shown to the model in the prompt's category list.
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Spam => "Spam",
            Category::Phishing => "Phishing",
            Category::School => "School",
            Category::Newsletter => "Newsletter",
            Category::Support => "Support",
            Category::System => "System",
            Category::Welcome => "Welcome",
            Category::Guide => "Guide",
            Category::Unfiltered => "Unfiltered",
            Category::Long => "Long",
            Category::Geminifail => "Geminifail",
        }
    }

    /// Case-insensitive exact match against a taxonomy name. No fuzzy
    /// matching: model drift must surface as a parse failure, not a silent
    /// coercion into the wrong category.
    pub fn parse(text: &str) -> Option<Category> {
        let trimmed = text.trim();
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.name().eq_ignore_ascii_case(trimmed))
    }

    /// Render the taxonomy for prompt construction: declaration order,
    /// title-case, minus `exclude`, joined by ", ". Excluding every member
    /// yields an empty string.
    pub fn render_list(exclude: &[Category]) -> String {
        Category::ALL
            .iter()
            .copied()
            .filter(|c| !exclude.contains(c))
            .map(|c| c.display_name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_full_taxonomy() {
        assert_eq!(
            Category::render_list(&[]),
            "Spam, Phishing, School, Newsletter, Support, System, Welcome, \
             Guide, Unfiltered, Long, Geminifail"
        );
    }

    #[test]
    fn render_with_exclusions() {
        let rendered = Category::render_list(&[Category::Long, Category::Geminifail]);
        assert!(!rendered.contains("Long"));
        assert!(!rendered.contains("Geminifail"));
        assert!(rendered.starts_with("Spam, Phishing"));
        assert!(rendered.ends_with("Unfiltered"));
    }

    #[test]
    fn render_preserves_declaration_order() {
        let rendered = Category::render_list(&[Category::Spam]);
        let phishing = rendered.find("Phishing").unwrap();
        let school = rendered.find("School").unwrap();
        assert!(phishing < school);
    }

    #[test]
    fn render_every_member_exactly_once() {
        let rendered = Category::render_list(&[]);
        for category in Category::ALL {
            assert_eq!(
                rendered.matches(category.display_name()).count(),
                1,
                "{} should appear exactly once",
                category.display_name()
            );
        }
    }

    #[test]
    fn render_all_excluded_is_empty() {
        assert_eq!(Category::render_list(Category::ALL), "");
    }

    #[test]
    fn parse_exact_name() {
        assert_eq!(Category::parse("SPAM"), Some(Category::Spam));
        assert_eq!(Category::parse("GEMINIFAIL"), Some(Category::Geminifail));
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(Category::parse("Spam"), Some(Category::Spam));
        assert_eq!(Category::parse("newsletter"), Some(Category::Newsletter));
    }

    #[test]
    fn parse_trims_whitespace() {
        assert_eq!(Category::parse("  Long \n"), Some(Category::Long));
    }

    #[test]
    fn parse_rejects_unknown_text() {
        assert_eq!(Category::parse("not a category"), None);
        assert_eq!(Category::parse(""), None);
    }

    #[test]
    fn wire_name_round_trips_through_serde() {
        let yaml = serde_yaml::to_string(&Category::Geminifail).unwrap();
        assert_eq!(yaml.trim(), "GEMINIFAIL");
        let back: Category = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, Category::Geminifail);
    }

    #[test]
    fn display_matches_wire_name() {
        assert_eq!(Category::Unfiltered.to_string(), "UNFILTERED");
    }
}
