/// Department abbreviations and common spellings, mapped to catalog codes.
/// A hit emits both the upper-cased code and the matched spelling so the
/// scorer can match either the department field or free text.
const DEPARTMENTS: &[(&str, &str)] = &[
    ("art", "arts"),
    ("arts", "arts"),
    ("artistic", "arts"),
    ("comm", "comm"),
    ("communication", "comm"),
    ("communications", "comm"),
    ("cs", "cs"),
    ("computer science", "cs"),
    ("comp sci", "cs"),
    ("econ", "econ"),
    ("economics", "econ"),
    ("math", "math"),
    ("mathematics", "math"),
    ("eng", "engl"),
    ("english", "engl"),
    ("hist", "hist"),
    ("history", "hist"),
    ("bio", "biol"),
    ("biology", "biol"),
    ("chem", "chem"),
    ("chemistry", "chem"),
    ("phys", "phys"),
    ("physics", "phys"),
    ("psych", "psyc"),
    ("psychology", "psyc"),
    ("phil", "phil"),
    ("philosophy", "phil"),
    ("soc", "soci"),
    ("sociology", "soci"),
    ("anth", "anth"),
    ("anthropology", "anth"),
    ("span", "span"),
    ("spanish", "span"),
    ("fr", "fren"),
    ("french", "fren"),
    ("german", "germ"),
    ("music", "musc"),
    ("thea", "thea"),
    ("theater", "thea"),
    ("theatre", "thea"),
    ("dance", "danc"),
    ("film", "fstd"),
    ("govt", "govt"),
    ("government", "govt"),
    ("politics", "govt"),
    ("relg", "relg"),
    ("religion", "relg"),
    ("arch", "arch"),
    ("architecture", "arch"),
];

const CAREER_TERMS: &[&str] = &[
    "banking",
    "consulting",
    "finance",
    "tech",
    "coding",
    "data science",
    "grad school",
    "research",
];

/// Rule-based keyword extraction from a free-text query. Total and
/// deterministic; emission order is match order, and the same token may be
/// emitted by more than one dictionary.
pub fn extract_keywords(query: &str) -> Vec<String> {
    let query_lower = query.to_lowercase();
    let mut keywords = Vec::new();

    for (spelling, code) in DEPARTMENTS {
        if query_lower.contains(spelling) {
            keywords.push(code.to_uppercase());
            keywords.push((*spelling).to_string());
        }
    }

    for term in CAREER_TERMS {
        if query_lower.contains(term) {
            keywords.push((*term).to_string());
        }
    }

    if query_lower.contains("sql") {
        keywords.push("sql".to_string());
    }
    if query_lower.contains("philosophy") || query_lower.contains("philosophical") {
        keywords.push("philosophy".to_string());
    }
    if query_lower.contains("entrepreneur") || query_lower.contains("startup") {
        keywords.push("entrepreneurship".to_string());
    }
    if query_lower.contains("9am") || query_lower.contains("morning") || query_lower.contains("9-3")
    {
        keywords.push("morning".to_string());
    }
    if query_lower.contains("gened") || query_lower.contains("general education") {
        keywords.push("gened".to_string());
    }
    if query_lower.contains("4.0") || query_lower.contains("highly rated") {
        keywords.push("high rating".to_string());
    }

    if query_lower.contains("easy") || query_lower.contains("easier") {
        keywords.push("easy".to_string());
    }
    if query_lower.contains("challenging") || query_lower.contains("hard") {
        keywords.push("hard".to_string());
    }

    keywords
}
