use crate::models::{Course, Instructor, StudentProfile};

/// How much of the syllabus text participates in keyword matching.
const SYLLABUS_MATCH_CHARS: usize = 2000;
/// Reasons kept per candidate; evaluation order is preserved.
const MAX_REASONS: usize = 5;

/// Deterministic rule-based match score for a course against a profile and a
/// keyword set. Contributions are evaluated in a fixed order and reasons are
/// appended as each one fires. Total over any input; missing data is neutral.
pub fn score_rule(
    course: &Course,
    profile: &StudentProfile,
    keywords: &[String],
    instructor: Option<&Instructor>,
) -> (i32, Vec<String>) {
    let mut score = 0i32;
    let mut reasons = Vec::new();

    // Career relevance
    let career_overlap: Vec<&String> = profile
        .career_goals
        .iter()
        .filter(|goal| course.career_relevance.contains(goal))
        .collect();
    if !career_overlap.is_empty() {
        score += 30;
        let mut reason = format!(
            "Relevant for your {} goals",
            join_refs(&career_overlap, ", ")
        );
        if course.syllabus.is_some() && !course.syllabus_skills.is_empty() {
            let related: Vec<&String> = course
                .syllabus_skills
                .iter()
                .filter(|skill| {
                    career_overlap
                        .iter()
                        .any(|goal| loosely_contains(skill, goal))
                })
                .take(2)
                .collect();
            if !related.is_empty() {
                reason.push_str(&format!(
                    " (syllabus emphasizes skills: {})",
                    join_refs(&related, ", ")
                ));
            }
        }
        reasons.push(reason);
    }

    // Keyword matching against department code and course text
    if !keywords.is_empty() {
        let course_text = searchable_text(course);
        let dept = course.department.to_lowercase();
        let mut matched = Vec::new();

        for keyword in keywords {
            let kw = keyword.to_lowercase();
            if !dept.is_empty() && (kw == dept || dept.starts_with(&kw) || kw.starts_with(&dept)) {
                score += 20;
                matched.push(keyword);
            } else if course_text.contains(&kw) {
                score += 15;
                matched.push(keyword);
            }
        }

        if !matched.is_empty() {
            let shown: Vec<&String> = matched.iter().take(5).copied().collect();
            let mut reason = format!("Matches your search for: {}", join_refs(&shown, ", "));
            if course.syllabus.is_some() {
                let topics: Vec<&String> = course
                    .syllabus_topics
                    .iter()
                    .filter(|topic| {
                        keywords
                            .iter()
                            .any(|kw| topic.to_lowercase().contains(&kw.to_lowercase()))
                    })
                    .take(2)
                    .collect();
                if !topics.is_empty() {
                    reason.push_str(&format!(" (syllabus covers: {})", join_refs(&topics, ", ")));
                }
                let skills: Vec<&String> = course
                    .syllabus_skills
                    .iter()
                    .filter(|skill| {
                        keywords
                            .iter()
                            .any(|kw| skill.to_lowercase().contains(&kw.to_lowercase()))
                    })
                    .take(2)
                    .collect();
                if !skills.is_empty() {
                    reason.push_str(&format!(" (teaches: {})", join_refs(&skills, ", ")));
                }
            }
            reasons.push(reason);
        }
    }

    // Difficulty fit
    let diff_gap = (course.difficulty - profile.difficulty_preference).abs();
    if diff_gap == 0 {
        score += 15;
        reasons.push("Difficulty matches your preference".to_string());
    } else if diff_gap == 1 {
        score += 10;
    }

    // Prerequisites
    let met: Vec<&String> = course
        .prerequisites
        .iter()
        .filter(|p| profile.completed_courses.contains(p))
        .collect();
    if met.len() == course.prerequisites.len() {
        score += 20;
        reasons.push("You meet all prerequisites".to_string());
    } else if !met.is_empty() {
        score += 10;
        reasons.push(format!(
            "Partial prerequisites met: {}",
            join_refs(&met, ", ")
        ));
    } else {
        score -= 10;
    }

    // GenEd requirements
    let gened_overlap: Vec<&String> = profile
        .gened_remaining
        .iter()
        .filter(|g| course.gened.contains(g))
        .collect();
    if !gened_overlap.is_empty() {
        score += 20;
        reasons.push(format!(
            "Satisfies GenEd requirement: {}",
            join_refs(&gened_overlap, ", ")
        ));
    }

    // Major/minor alignment
    if profile.major.contains(&course.department) || profile.minor.contains(&course.department) {
        score += 15;
        reasons.push("Aligned with your major/minor".to_string());
    }

    // Instructor quality
    if let Some(instructor) = instructor {
        if instructor.rating.unwrap_or(0.0) >= 4.5 {
            score += 10;
            reasons.push(format!(
                "Highly rated professor ({})",
                instructor.rating.unwrap_or(0.0)
            ));
        }
        let wants_entrepreneurship = keywords.iter().any(|kw| {
            let kw = kw.to_lowercase();
            kw.contains("entrepreneur") || kw.contains("startup")
        });
        if wants_entrepreneurship && instructor.entrepreneurship {
            score += 15;
            reasons.push("Professor has entrepreneurial background".to_string());
        }
    }

    // Syllabus availability (informational only)
    if course.syllabus.is_some()
        && (!course.syllabus_topics.is_empty() || !course.syllabus_skills.is_empty())
    {
        let mut insight = "Detailed syllabus available".to_string();
        if !course.syllabus_topics.is_empty() {
            let shown: Vec<&String> = course.syllabus_topics.iter().take(2).collect();
            insight.push_str(&format!(" covering {}", join_refs(&shown, ", ")));
        }
        if !course.syllabus_skills.is_empty() {
            let shown: Vec<&String> = course.syllabus_skills.iter().take(2).collect();
            insight.push_str(&format!(" with focus on {}", join_refs(&shown, ", ")));
        }
        reasons.push(insight);
    }

    reasons.truncate(MAX_REASONS);
    (score.max(0), reasons)
}

/// Lower-cased haystack a keyword can match against: course keywords, title,
/// description, the leading slice of the syllabus, and syllabus-derived
/// topics and skills.
fn searchable_text(course: &Course) -> String {
    let mut text = course.keywords.join(" ");
    text.push(' ');
    text.push_str(&course.title);
    text.push(' ');
    text.push_str(&course.description);
    if let Some(syllabus) = &course.syllabus {
        text.push(' ');
        text.extend(syllabus.chars().take(SYLLABUS_MATCH_CHARS));
    }
    if !course.syllabus_topics.is_empty() {
        text.push(' ');
        text.push_str(&course.syllabus_topics.join(" "));
    }
    if !course.syllabus_skills.is_empty() {
        text.push(' ');
        text.push_str(&course.syllabus_skills.join(" "));
    }
    text.to_lowercase()
}

fn loosely_contains(a: &str, b: &str) -> bool {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    a.contains(&b) || b.contains(&a)
}

fn join_refs(items: &[&String], sep: &str) -> String {
    items
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(sep)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_course() -> Course {
        Course {
            id: "CS101".to_string(),
            title: "Introduction to Programming".to_string(),
            department: "CS".to_string(),
            credits: 3,
            description: "Fundamentals of programming and problem solving".to_string(),
            keywords: vec!["cs".to_string(), "coding".to_string()],
            difficulty: 3,
            prerequisites: Vec::new(),
            gened: Vec::new(),
            career_relevance: vec!["tech".to_string()],
            instructor: None,
            schedule: Vec::new(),
            average_gpa: None,
            syllabus: None,
            syllabus_topics: Vec::new(),
            syllabus_skills: Vec::new(),
        }
    }

    fn sample_profile() -> StudentProfile {
        StudentProfile {
            id: "student_demo".to_string(),
            major: Vec::new(),
            minor: Vec::new(),
            gpa: 3.4,
            completed_courses: Vec::new(),
            interests: Vec::new(),
            career_goals: vec!["tech".to_string()],
            difficulty_preference: 3,
            gened_remaining: Vec::new(),
        }
    }

    #[test]
    fn career_department_difficulty_and_prereqs_stack() {
        let keywords = vec!["tech".to_string(), "CS".to_string()];
        let (score, reasons) = score_rule(&sample_course(), &sample_profile(), &keywords, None);

        // 30 career + 20 dept code + 15 difficulty + 20 vacuous prereqs
        assert!(score >= 85);
        assert_eq!(reasons.len(), 4);
        assert!(reasons[0].starts_with("Relevant for your tech goals"));
        assert!(reasons[1].starts_with("Matches your search for:"));
        assert_eq!(reasons[2], "Difficulty matches your preference");
        assert_eq!(reasons[3], "You meet all prerequisites");
    }

    #[test]
    fn empty_prerequisites_always_award_full_credit() {
        let mut profile = sample_profile();
        profile.career_goals.clear();
        let (_, reasons) = score_rule(&sample_course(), &profile, &[], None);
        assert!(reasons.iter().any(|r| r == "You meet all prerequisites"));
    }

    #[test]
    fn difficulty_contribution_tiers() {
        let mut profile = sample_profile();
        profile.career_goals.clear();
        let mut course = sample_course();
        course.career_relevance.clear();

        course.difficulty = 3;
        let (exact, _) = score_rule(&course, &profile, &[], None);
        course.difficulty = 4;
        let (near, _) = score_rule(&course, &profile, &[], None);
        course.difficulty = 5;
        let (far, _) = score_rule(&course, &profile, &[], None);

        // Baseline of +20 from vacuous prerequisites in every case.
        assert_eq!(exact, 20 + 15);
        assert_eq!(near, 20 + 10);
        assert_eq!(far, 20);
    }

    #[test]
    fn unmet_prerequisites_clamp_to_zero() {
        let mut course = sample_course();
        course.career_relevance.clear();
        course.prerequisites = vec!["CS201".to_string()];
        course.difficulty = 5;
        let mut profile = sample_profile();
        profile.career_goals.clear();

        let (score, reasons) = score_rule(&course, &profile, &[], None);
        assert_eq!(score, 0);
        assert!(reasons.is_empty());
    }

    #[test]
    fn partial_prerequisites_list_the_met_subset() {
        let mut course = sample_course();
        course.prerequisites = vec!["CS201".to_string(), "MATH140".to_string()];
        let mut profile = sample_profile();
        profile.completed_courses = vec!["CS201".to_string()];

        let (_, reasons) = score_rule(&course, &profile, &[], None);
        assert!(reasons
            .iter()
            .any(|r| r == "Partial prerequisites met: CS201"));
    }

    #[test]
    fn gened_and_major_alignment_emit_reasons() {
        let mut course = sample_course();
        course.gened = vec!["Second Writing".to_string()];
        let mut profile = sample_profile();
        profile.gened_remaining = vec!["Second Writing".to_string()];
        profile.major = vec!["CS".to_string()];

        let (_, reasons) = score_rule(&course, &profile, &[], None);
        assert!(reasons
            .iter()
            .any(|r| r == "Satisfies GenEd requirement: Second Writing"));
        assert!(reasons.iter().any(|r| r == "Aligned with your major/minor"));
    }

    #[test]
    fn highly_rated_and_entrepreneurial_instructor() {
        let instructor = Instructor {
            id: "prof_1".to_string(),
            name: "Dana Ruiz".to_string(),
            rating: Some(4.8),
            background: "Founded two startups".to_string(),
            teaching_style: "Project-based".to_string(),
            entrepreneurship: true,
        };
        let keywords = vec!["entrepreneurship".to_string()];
        let course = sample_course();
        let profile = sample_profile();

        let (with_inst, reasons) = score_rule(&course, &profile, &keywords, Some(&instructor));
        let (without_inst, _) = score_rule(&course, &profile, &keywords, None);

        assert_eq!(with_inst - without_inst, 25);
        assert!(reasons.iter().any(|r| r == "Highly rated professor (4.8)"));
        assert!(reasons
            .iter()
            .any(|r| r == "Professor has entrepreneurial background"));
    }

    #[test]
    fn syllabus_insights_extend_reasons() {
        let mut course = sample_course();
        course.syllabus = Some("Weekly labs on data pipelines and SQL".to_string());
        course.syllabus_topics = vec!["databases".to_string(), "sql joins".to_string()];
        course.syllabus_skills = vec!["sql".to_string(), "tech writing".to_string()];

        let keywords = vec!["sql".to_string()];
        let (_, reasons) = score_rule(&course, &sample_profile(), &keywords, None);

        let keyword_reason = reasons
            .iter()
            .find(|r| r.starts_with("Matches your search for:"))
            .expect("keyword reason");
        assert!(keyword_reason.contains("syllabus covers: sql joins"));
        assert!(keyword_reason.contains("teaches: sql"));
        assert!(reasons
            .iter()
            .any(|r| r.starts_with("Detailed syllabus available covering databases, sql joins")));
    }

    #[test]
    fn reasons_never_exceed_cap_and_keep_order() {
        let mut course = sample_course();
        course.gened = vec!["Humanities".to_string()];
        course.syllabus = Some("syllabus text".to_string());
        course.syllabus_topics = vec!["coding".to_string()];
        course.syllabus_skills = vec!["coding".to_string()];
        let mut profile = sample_profile();
        profile.gened_remaining = vec!["Humanities".to_string()];
        profile.major = vec!["CS".to_string()];

        let keywords = vec!["CS".to_string(), "coding".to_string()];
        let (_, reasons) = score_rule(&course, &profile, &keywords, None);

        assert!(reasons.len() <= 5);
        assert!(reasons[0].starts_with("Relevant for your"));
        assert!(reasons[1].starts_with("Matches your search for:"));
    }

    #[test]
    fn scoring_is_deterministic() {
        let keywords = vec!["tech".to_string(), "CS".to_string()];
        let first = score_rule(&sample_course(), &sample_profile(), &keywords, None);
        let second = score_rule(&sample_course(), &sample_profile(), &keywords, None);
        assert_eq!(first, second);
    }
}
