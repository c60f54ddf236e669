use std::fmt::Write;

use tracing::warn;

use crate::judge::{strip_code_fence, Judge};
use crate::keywords::extract_keywords;
use crate::models::{QueryIntent, StudentProfile};

/// Resolves a free-text query into a structured intent via the judgment
/// service, falling back to rule-based keyword extraction on any failure.
/// Always returns a usable intent.
pub async fn resolve_intent(
    judge: Option<&dyn Judge>,
    query: &str,
    profile: &StudentProfile,
) -> QueryIntent {
    let Some(judge) = judge else {
        return fallback_intent(query);
    };

    match extract_with_judge(judge, query, profile).await {
        Ok(intent) => intent,
        Err(err) => {
            warn!("intent extraction failed, using keyword fallback: {err}");
            fallback_intent(query)
        }
    }
}

fn fallback_intent(query: &str) -> QueryIntent {
    QueryIntent {
        keywords: extract_keywords(query),
        ..QueryIntent::default()
    }
}

async fn extract_with_judge(
    judge: &dyn Judge,
    query: &str,
    profile: &StudentProfile,
) -> anyhow::Result<QueryIntent> {
    let prompt = intent_prompt(query, profile);
    let reply = judge.generate(&prompt).await?;
    let intent: QueryIntent = serde_json::from_str(strip_code_fence(&reply))?;
    Ok(intent)
}

fn intent_prompt(query: &str, profile: &StudentProfile) -> String {
    let mut prompt = String::new();

    let _ = writeln!(
        prompt,
        "Analyze this student's course search query and extract structured information."
    );
    let _ = writeln!(prompt);
    let _ = writeln!(prompt, "Student Query: \"{query}\"");
    let _ = writeln!(prompt);
    let _ = writeln!(prompt, "Student Profile:");
    let _ = writeln!(prompt, "- Major: {}", profile.major.join(", "));
    let _ = writeln!(prompt, "- Minor: {}", profile.minor.join(", "));
    let _ = writeln!(prompt, "- Career Goals: {}", profile.career_goals.join(", "));
    let _ = writeln!(prompt, "- Interests: {}", profile.interests.join(", "));
    let _ = writeln!(
        prompt,
        "- Completed Courses: {}",
        profile.completed_courses.join(", ")
    );
    let _ = writeln!(prompt);
    let _ = writeln!(prompt, "Extract and return a JSON object with:");
    let _ = writeln!(
        prompt,
        "1. keywords: important keywords/topics mentioned, including department names"
    );
    let _ = writeln!(
        prompt,
        "2. career_goals: career-related goals mentioned (e.g. \"banking\", \"consulting\", \"tech\")"
    );
    let _ = writeln!(
        prompt,
        "3. topics: specific subjects they want to learn; if the query names several, include all of them"
    );
    let _ = writeln!(
        prompt,
        "4. schedule_preferences: time preferences (e.g. \"morning\", \"afternoon\", specific times)"
    );
    let _ = writeln!(
        prompt,
        "5. difficulty_preference: \"easy\", \"moderate\", \"challenging\", or null"
    );
    let _ = writeln!(
        prompt,
        "6. instructor_preferences: instructor-related preferences (e.g. \"highly rated\")"
    );
    let _ = writeln!(prompt);
    let _ = writeln!(prompt, "Return ONLY valid JSON, no additional text.");

    prompt
}
