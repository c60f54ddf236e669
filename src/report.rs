use std::fmt::Write;

use chrono::Utc;

use crate::models::{ScoredCandidate, StudentProfile};

pub fn build_report(profile: &StudentProfile, query: &str, results: &[ScoredCandidate]) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Course Recommendations");
    let _ = writeln!(
        output,
        "Generated for {} on {}",
        profile.id,
        Utc::now().date_naive()
    );
    let _ = writeln!(output, "Query: \"{query}\"");
    let _ = writeln!(output);
    let _ = writeln!(output, "## Top Matches");

    if results.is_empty() {
        let _ = writeln!(output, "No courses matched this query.");
        return output;
    }

    for (rank, candidate) in results.iter().enumerate() {
        let course = &candidate.course;
        let _ = writeln!(output);
        let _ = writeln!(
            output,
            "### {}. {} ({})",
            rank + 1,
            course.title,
            course.id
        );
        let _ = writeln!(
            output,
            "- {} | {} credits | difficulty {}/5 | match score {}",
            course.department, course.credits, course.difficulty, candidate.score
        );
        if let Some(gpa) = course.average_gpa {
            let _ = writeln!(output, "- Average GPA: {gpa:.2}");
        }
        if let Some(instructor) = &candidate.instructor {
            match instructor.rating {
                Some(rating) => {
                    let _ = writeln!(
                        output,
                        "- Taught by {} (rating {rating})",
                        instructor.name
                    );
                }
                None => {
                    let _ = writeln!(output, "- Taught by {}", instructor.name);
                }
            }
        }
        for reason in &candidate.reasons {
            let _ = writeln!(output, "- {reason}");
        }
    }

    output
}
