use std::collections::HashSet;

use tracing::debug;

use crate::intent::resolve_intent;
use crate::judge::Judge;
use crate::keywords::extract_keywords;
use crate::models::{Course, Instructor, ScoredCandidate, StudentProfile};
use crate::rules::score_rule;
use crate::semantic::score_semantic;
use crate::store::InstructorDirectory;

/// Candidates surviving the rule-based pre-filter.
const PREFILTER_CANDIDATES: usize = 20;
/// Ranked window the diversity pass draws departments from.
const DIVERSITY_WINDOW: usize = 10;
const MAX_RESULTS: usize = 5;

/// Two-stage hybrid ranking over a read-only catalog snapshot: a cheap
/// rule-based pre-filter over every course, a semantic re-score of the
/// surviving candidates, then a diversity-aware top-5 selection.
pub struct Recommender<'a> {
    catalog: &'a [Course],
    instructors: &'a InstructorDirectory,
    judge: Option<&'a dyn Judge>,
}

impl<'a> Recommender<'a> {
    pub fn new(
        catalog: &'a [Course],
        instructors: &'a InstructorDirectory,
        judge: Option<&'a dyn Judge>,
    ) -> Self {
        Self {
            catalog,
            instructors,
            judge,
        }
    }

    pub async fn recommend(&self, profile: &StudentProfile, query: &str) -> Vec<ScoredCandidate> {
        let intent = resolve_intent(self.judge, query, profile).await;
        let keywords = if intent.keywords.is_empty() {
            extract_keywords(query)
        } else {
            intent.keywords.clone()
        };

        // Pre-filter the whole catalog with the rule scorer. Stable sort, so
        // equal scores keep catalog order.
        let mut prefiltered: Vec<(usize, i32)> = Vec::new();
        for (index, course) in self.catalog.iter().enumerate() {
            let instructor = self.resolve_instructor(course);
            let (score, _) = score_rule(course, profile, &keywords, instructor);
            if score > 0 {
                prefiltered.push((index, score));
            }
        }
        prefiltered.sort_by(|a, b| b.1.cmp(&a.1));
        debug!(
            "pre-filter kept {} of {} courses",
            prefiltered.len(),
            self.catalog.len()
        );

        // Re-score. With a judgment service the top candidates get a semantic
        // score; otherwise every pre-filtered course keeps its rule score,
        // this time with reasons attached.
        let mut scored: Vec<(usize, ScoredCandidate)> = Vec::new();
        match self.judge {
            Some(judge) if !prefiltered.is_empty() => {
                for &(index, _) in prefiltered.iter().take(PREFILTER_CANDIDATES) {
                    let course = &self.catalog[index];
                    let instructor = self.resolve_instructor(course);
                    let (score, reasons) =
                        score_semantic(judge, course, profile, instructor, query, &intent).await;
                    if score > 0 {
                        scored.push((
                            index,
                            ScoredCandidate {
                                course: course.clone(),
                                score,
                                reasons,
                                instructor: instructor.cloned(),
                            },
                        ));
                    }
                }
            }
            _ => {
                for &(index, _) in &prefiltered {
                    let course = &self.catalog[index];
                    let instructor = self.resolve_instructor(course);
                    let (score, reasons) = score_rule(course, profile, &keywords, instructor);
                    if score > 0 {
                        scored.push((
                            index,
                            ScoredCandidate {
                                course: course.clone(),
                                score,
                                reasons,
                                instructor: instructor.cloned(),
                            },
                        ));
                    }
                }
            }
        }

        sort_ranked(&mut scored);

        let spread_departments = intent.topics.len() > 1 || keywords.len() > 2;
        if spread_departments {
            diversity_select(scored)
        } else {
            scored
                .into_iter()
                .take(MAX_RESULTS)
                .map(|(_, candidate)| candidate)
                .collect()
        }
    }

    fn resolve_instructor(&self, course: &Course) -> Option<&Instructor> {
        course
            .instructor
            .as_deref()
            .and_then(|id| self.instructors.find(id))
    }
}

/// Descending by score; catalog index breaks ties so ranking is reproducible.
fn sort_ranked(scored: &mut [(usize, ScoredCandidate)]) {
    scored.sort_by(|a, b| b.1.score.cmp(&a.1.score).then(a.0.cmp(&b.0)));
}

/// Greedy department spread: walk the top of the ranking picking at most one
/// course per unseen department, then fill leftover slots with the best
/// remaining candidates regardless of department.
fn diversity_select(scored: Vec<(usize, ScoredCandidate)>) -> Vec<ScoredCandidate> {
    let mut picked: Vec<(usize, ScoredCandidate)> = Vec::new();
    let mut picked_indices: HashSet<usize> = HashSet::new();
    let mut seen_departments: HashSet<String> = HashSet::new();

    for (index, candidate) in scored.iter().take(DIVERSITY_WINDOW) {
        if seen_departments.insert(candidate.course.department.clone()) {
            picked.push((*index, candidate.clone()));
            picked_indices.insert(*index);
            if picked.len() == MAX_RESULTS {
                break;
            }
        }
    }

    if picked.len() < MAX_RESULTS {
        for (index, candidate) in &scored {
            if picked_indices.contains(index) {
                continue;
            }
            picked.push((*index, candidate.clone()));
            picked_indices.insert(*index);
            if picked.len() == MAX_RESULTS {
                break;
            }
        }
    }

    sort_ranked(&mut picked);
    picked.into_iter().map(|(_, candidate)| candidate).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::judge::JudgeError;
    use async_trait::async_trait;

    struct CannedJudge(String);

    #[async_trait]
    impl Judge for CannedJudge {
        async fn generate(&self, _prompt: &str) -> Result<String, JudgeError> {
            Ok(self.0.clone())
        }
    }

    struct FailingJudge;

    #[async_trait]
    impl Judge for FailingJudge {
        async fn generate(&self, _prompt: &str) -> Result<String, JudgeError> {
            Err(JudgeError::EmptyResponse)
        }
    }

    fn course(id: &str, department: &str) -> Course {
        Course {
            id: id.to_string(),
            title: format!("{id} Lecture"),
            department: department.to_string(),
            credits: 3,
            description: "Weekly lectures and problem sets.".to_string(),
            keywords: Vec::new(),
            difficulty: 3,
            prerequisites: Vec::new(),
            gened: Vec::new(),
            career_relevance: Vec::new(),
            instructor: None,
            schedule: Vec::new(),
            average_gpa: None,
            syllabus: None,
            syllabus_topics: Vec::new(),
            syllabus_skills: Vec::new(),
        }
    }

    fn profile() -> StudentProfile {
        StudentProfile {
            id: "student_demo".to_string(),
            major: Vec::new(),
            minor: Vec::new(),
            gpa: 3.5,
            completed_courses: Vec::new(),
            interests: Vec::new(),
            career_goals: vec!["tech".to_string()],
            difficulty_preference: 3,
            gened_remaining: Vec::new(),
        }
    }

    fn no_instructors() -> InstructorDirectory {
        InstructorDirectory::new(Vec::new())
    }

    #[tokio::test]
    async fn equal_scores_keep_catalog_order() {
        let catalog = vec![course("CS150", "CS"), course("CS160", "CS")];
        let instructors = no_instructors();
        let recommender = Recommender::new(&catalog, &instructors, None);

        let results = recommender.recommend(&profile(), "cs classes").await;
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].course.id, "CS150");
        assert_eq!(results[1].course.id, "CS160");
        assert_eq!(results[0].score, results[1].score);
    }

    #[tokio::test]
    async fn never_more_than_five_results_and_all_positive() {
        let catalog: Vec<Course> = (0..8).map(|i| course(&format!("CS{i}"), "CS")).collect();
        let instructors = no_instructors();
        let recommender = Recommender::new(&catalog, &instructors, None);

        let results = recommender.recommend(&profile(), "cs classes").await;
        assert_eq!(results.len(), 5);
        assert!(results.iter().all(|r| r.score > 0));
    }

    #[tokio::test]
    async fn empty_catalog_yields_empty_result() {
        let catalog: Vec<Course> = Vec::new();
        let instructors = no_instructors();
        let recommender = Recommender::new(&catalog, &instructors, None);

        let results = recommender.recommend(&profile(), "anything at all").await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn zero_scoring_catalog_yields_empty_result() {
        let mut blocked = course("CS400", "CS");
        blocked.prerequisites = vec!["CS300".to_string()];
        blocked.difficulty = 5;
        let catalog = vec![blocked];
        let instructors = no_instructors();
        let recommender = Recommender::new(&catalog, &instructors, None);

        let results = recommender.recommend(&profile(), "").await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn empty_query_still_surfaces_category_bonuses() {
        let catalog = vec![course("PHIL140", "PHIL")];
        let instructors = no_instructors();
        let recommender = Recommender::new(&catalog, &instructors, None);

        let results = recommender.recommend(&profile(), "").await;
        assert_eq!(results.len(), 1);
        assert!(results[0].score > 0);
    }

    #[tokio::test]
    async fn multi_topic_query_spreads_departments() {
        let mut catalog = Vec::new();
        for id in ["CS101", "CS102", "CS103"] {
            let mut c = course(id, "CS");
            c.career_relevance = vec!["tech".to_string()];
            catalog.push(c);
        }
        catalog.push(course("ARTS110", "ARTS"));
        catalog.push(course("COMM230", "COMM"));
        catalog.push(course("PHIL140", "PHIL"));
        catalog.push(course("MATH210", "MATH"));
        catalog.push(course("ECON201", "ECON"));

        let instructors = no_instructors();
        let recommender = Recommender::new(&catalog, &instructors, None);

        // "art and comm and cs" derives more than two keywords, so the
        // department spread kicks in even though the CS courses dominate on
        // raw score.
        let results = recommender
            .recommend(&profile(), "art and comm and cs classes")
            .await;

        assert_eq!(results.len(), 5);
        let departments: HashSet<&str> = results
            .iter()
            .map(|r| r.course.department.as_str())
            .collect();
        assert_eq!(departments.len(), 5);
    }

    #[tokio::test]
    async fn diversity_fill_falls_back_to_best_remaining() {
        let mut catalog = Vec::new();
        for id in ["CS101", "CS102", "CS103", "CS104"] {
            let mut c = course(id, "CS");
            c.career_relevance = vec!["tech".to_string()];
            catalog.push(c);
        }
        catalog.push(course("ARTS110", "ARTS"));
        catalog.push(course("ARTS111", "ARTS"));
        catalog.push(course("ARTS112", "ARTS"));

        let instructors = no_instructors();
        let recommender = Recommender::new(&catalog, &instructors, None);

        let results = recommender.recommend(&profile(), "art and cs stuff").await;

        // Only two departments exist; one slot each from the spread pass,
        // the rest filled by the highest remaining scores.
        assert_eq!(results.len(), 5);
        let cs_count = results
            .iter()
            .filter(|r| r.course.department == "CS")
            .count();
        assert_eq!(cs_count, 4);
        assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[tokio::test]
    async fn semantic_scores_drive_the_ranking() {
        let catalog = vec![course("CS150", "CS"), course("CS160", "CS")];
        let instructors = no_instructors();
        let judge = CannedJudge(r#"{"score": 60, "reasons": ["Good fit"]}"#.to_string());
        let recommender = Recommender::new(&catalog, &instructors, Some(&judge));

        let results = recommender.recommend(&profile(), "cs classes").await;
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.score == 60));
        assert_eq!(results[0].course.id, "CS150");
        assert_eq!(results[0].reasons, vec!["Good fit".to_string()]);
    }

    #[tokio::test]
    async fn failing_judge_matches_deterministic_ranking() {
        let catalog = vec![
            course("CS150", "CS"),
            course("ECON201", "ECON"),
            course("PHIL140", "PHIL"),
        ];
        let instructors = no_instructors();

        let offline = Recommender::new(&catalog, &instructors, None);
        let degraded = Recommender::new(&catalog, &instructors, Some(&FailingJudge));

        let expected = offline.recommend(&profile(), "cs classes").await;
        let actual = degraded.recommend(&profile(), "cs classes").await;

        assert_eq!(expected.len(), actual.len());
        for (e, a) in expected.iter().zip(actual.iter()) {
            assert_eq!(e.course.id, a.course.id);
            assert_eq!(e.score, a.score);
            assert_eq!(e.reasons, a.reasons);
        }
    }

    #[tokio::test]
    async fn resolved_instructor_is_attached() {
        let mut c = course("CS150", "CS");
        c.instructor = Some("prof_chen".to_string());
        let catalog = vec![c];
        let instructors = InstructorDirectory::new(vec![Instructor {
            id: "prof_chen".to_string(),
            name: "Marcus Chen".to_string(),
            rating: Some(4.6),
            background: String::new(),
            teaching_style: String::new(),
            entrepreneurship: true,
        }]);
        let recommender = Recommender::new(&catalog, &instructors, None);

        let results = recommender.recommend(&profile(), "cs classes").await;
        assert_eq!(results.len(), 1);
        let attached = results[0].instructor.as_ref().expect("instructor");
        assert_eq!(attached.name, "Marcus Chen");
    }
}
