use std::fmt::Write;

use serde::Deserialize;
use tracing::warn;

use crate::judge::{strip_code_fence, Judge};
use crate::models::{Course, Instructor, QueryIntent, StudentProfile};
use crate::rules::score_rule;

/// How much syllabus text is offered to the judgment service.
const SYLLABUS_CONTEXT_CHARS: usize = 3000;

#[derive(Deserialize)]
struct ScoreReply {
    score: i64,
    #[serde(default)]
    reasons: Vec<String>,
}

/// Semantic match score in [0, 100] for one candidate, delegated to the
/// judgment service. Falls back to the rule scorer whenever the service
/// fails or replies with anything but the expected shape.
pub async fn score_semantic(
    judge: &dyn Judge,
    course: &Course,
    profile: &StudentProfile,
    instructor: Option<&Instructor>,
    query: &str,
    intent: &QueryIntent,
) -> (i32, Vec<String>) {
    match judge_score(judge, course, profile, instructor, query, intent).await {
        Ok((score, reasons)) => (score, reasons),
        Err(err) => {
            warn!(
                "semantic scoring failed for {}, using rule scorer: {err}",
                course.id
            );
            score_rule(course, profile, &intent.keywords, instructor)
        }
    }
}

async fn judge_score(
    judge: &dyn Judge,
    course: &Course,
    profile: &StudentProfile,
    instructor: Option<&Instructor>,
    query: &str,
    intent: &QueryIntent,
) -> anyhow::Result<(i32, Vec<String>)> {
    let prompt = scoring_prompt(course, profile, instructor, query, intent);
    let reply = judge.generate(&prompt).await?;
    let parsed: ScoreReply = serde_json::from_str(strip_code_fence(&reply))?;
    let score = parsed.score.clamp(0, 100) as i32;
    Ok((score, parsed.reasons))
}

fn scoring_prompt(
    course: &Course,
    profile: &StudentProfile,
    instructor: Option<&Instructor>,
    query: &str,
    intent: &QueryIntent,
) -> String {
    let mut prompt = String::new();

    let _ = writeln!(
        prompt,
        "You are an intelligent course recommendation system. Evaluate how well this course matches the student's query and profile."
    );
    let _ = writeln!(prompt);
    let _ = writeln!(prompt, "Student Query: \"{query}\"");
    let _ = writeln!(prompt);
    let _ = writeln!(
        prompt,
        "Query Intent:\n{}",
        serde_json::to_string_pretty(intent).unwrap_or_default()
    );
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
    let _ = writeln!(prompt, "- GPA: {}", profile.gpa);
    let _ = writeln!(
        prompt,
        "- Difficulty Preference: {}/5",
        profile.difficulty_preference
    );
    let _ = writeln!(
        prompt,
        "- GenEd Remaining: {}",
        profile.gened_remaining.join(", ")
    );
    let _ = writeln!(prompt);
    let _ = writeln!(prompt, "Course: {} ({})", course.title, course.id);
    let _ = writeln!(prompt, "Department: {}", course.department);
    let _ = writeln!(prompt, "Credits: {}", course.credits);
    let _ = writeln!(prompt, "Description: {}", course.description);
    let _ = writeln!(prompt, "Keywords: {}", course.keywords.join(", "));
    let _ = writeln!(prompt, "Difficulty: {}/5", course.difficulty);
    let _ = writeln!(prompt, "Prerequisites: {}", course.prerequisites.join(", "));
    let _ = writeln!(prompt, "GenEd: {}", course.gened.join(", "));
    let _ = writeln!(
        prompt,
        "Career Relevance: {}",
        course.career_relevance.join(", ")
    );
    let times: Vec<&str> = course.schedule.iter().map(|s| s.time.as_str()).collect();
    let _ = writeln!(prompt, "Schedule: {}", times.join(", "));

    if let Some(syllabus) = &course.syllabus {
        let excerpt: String = syllabus.chars().take(SYLLABUS_CONTEXT_CHARS).collect();
        let _ = writeln!(prompt);
        let _ = writeln!(
            prompt,
            "Syllabus Content (available - use this for detailed analysis):"
        );
        let _ = writeln!(prompt, "{excerpt}");
        let _ = writeln!(
            prompt,
            "Syllabus Topics: {}",
            course.syllabus_topics.join(", ")
        );
        let _ = writeln!(
            prompt,
            "Syllabus Skills: {}",
            course.syllabus_skills.join(", ")
        );
    }

    if let Some(instructor) = instructor {
        let rating = instructor
            .rating
            .map(|r| r.to_string())
            .unwrap_or_else(|| "N/A".to_string());
        let _ = writeln!(
            prompt,
            "Instructor: {}, Rating: {}, Background: {}",
            instructor.name, rating, instructor.background
        );
    }

    let _ = writeln!(prompt);
    let _ = writeln!(
        prompt,
        "Rate this course match on a scale of 0-100 and provide 2-4 specific reasons why it is a good or poor match."
    );
    let _ = writeln!(prompt);
    let _ = writeln!(prompt, "Return a JSON object with:");
    let _ = writeln!(prompt, "{{");
    let _ = writeln!(prompt, "  \"score\": <number 0-100>,");
    let _ = writeln!(prompt, "  \"reasons\": [\"reason1\", \"reason2\"]");
    let _ = writeln!(prompt, "}}");
    let _ = writeln!(prompt);
    let _ = writeln!(prompt, "Return ONLY valid JSON, no additional text.");

    prompt
}
