//! Prompt construction for the AI scan stages.
//!
//! The templates are fixed text: classifier behavior is only reproducible if
//! every deployment sends byte-identical instructions, so nothing here is
//! derived at runtime beyond the substituted fields.

use crate::category::Category;

/// Build the classification instruction sent to the model. `excluded`
/// categories are removed from the offered list, so a category the pre-filter
/// already ruled out is never re-offered.
pub fn classification_prompt(sender: &str, message: &str, excluded: &[Category]) -> String {
    format!(
        "You are an expert email classifier. Classify the following email into one single category from this list: [{}].\n\
         Email Sender: {}.\n\
         Email Content: {}.\n\
         Respond with only the category name, exactly as it appears in the list.\n",
        Category::render_list(excluded),
        sender,
        message
    )
}

const LOAD_PROMPT_HEADER: &str = "## INSTRUCTIONS\n\n\
1.  Analyze the provided EMAIL_TEXT.\n\
2.  Use the provided METRICS as objective data points in your analysis.\n\
3.  Calculate the final Cognitive Load Score (CLS) on a scale of 1.0 (Lowest Effort) to 5.0 (Highest Effort).\n\
4.  The CLS is calculated as: **Linguistic Load** (40% Weight) + **Action/Dependency Load** (60% Weight).\n\
\x20   * **Linguistic Load:** How difficult is the email to merely read and understand? Factor in the Flesch-Kincaid and Lexical Diversity scores.\n\
\x20   * **Action/Dependency Load:** How complex is the required response? Factor in the action items, decision complexity, and external link/attachment count.\n\
5.  Provide your step-by-step reasoning in the JSON's `reasoning` field.\n\
6.  The final output MUST be a single JSON object.\n\n\
## OBJECTIVE METRICS\n\n\
- **Flesch_Kincaid_Grade:** [Insert Pre-calculated FK Grade Level Here, e.g., 12.5]\n\
- **Lexical_Diversity_Ratio:** [Insert Pre-calculated TTR/Lexical Diversity Ratio Here, e.g., 0.58]\n\
- **External_Links_Count:** [Insert Count of Links/Attachments Here, e.g., 3]\n\n\
## EMAIL TEXT\n\n";

const LOAD_PROMPT_FOOTER: &str = "\n\n\
## REQUIRED OUTPUT FORMAT (JSON)\n\
{\n\
\x20 \"reasoning\": {\n\
\x20   \"linguistic_load_analysis\": \"Based on FK score [FK_SCORE], the text is rated as [RATING] (e.g., highly academic/simple and casual).\",\n\
\x20   \"action_load_analysis\": \"The email primarily requires [MAIN_ACTION] and involves [NUMBER] external dependencies, which increases the cognitive overhead.\",\n\
\x20   \"final_justification\": \"Combining the moderate linguistic load with the high-complexity, multi-step action requirement results in the final CLS.\"\n\
\x20 },\n\
\x20 \"Action_Intent\": \"[e.g., Scheduling a Meeting, Requires Budget Approval, Simple Information Share]\",\n\
\x20 \"CLS_Score\": [Final CLS number from 1.0 to 5.0, e.g., 4.2]\n\
}";

/// Build the cognitive-load assessment instruction. `email_text` is the
/// already-composed `Subject: ...` block plus body.
pub fn cognitive_load_prompt(email_text: &str) -> String {
    format!("{LOAD_PROMPT_HEADER}{email_text}{LOAD_PROMPT_FOOTER}")
}
