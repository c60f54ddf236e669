use std::path::Path;

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::models::{Course, Instructor, StudentProfile, TimeSlot};

const COURSES_FILE: &str = "courses.json";
const PROFILES_FILE: &str = "profiles.json";
const INSTRUCTORS_FILE: &str = "instructors.json";

fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    let raw = serde_json::to_string_pretty(value)?;
    std::fs::write(path, raw).with_context(|| format!("failed to write {}", path.display()))
}

/// Read-only course catalog, file-backed. Only `seed` and `import` rewrite
/// the underlying file; the ranking engine never writes through this store.
pub struct Catalog {
    courses: Vec<Course>,
}

impl Catalog {
    pub fn new(courses: Vec<Course>) -> Self {
        Self { courses }
    }

    pub fn load(data_dir: &Path) -> anyhow::Result<Self> {
        let courses = read_json(&data_dir.join(COURSES_FILE))?;
        Ok(Self { courses })
    }

    pub fn save(&self, data_dir: &Path) -> anyhow::Result<()> {
        write_json(&data_dir.join(COURSES_FILE), &self.courses)
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn find(&self, id: &str) -> Option<&Course> {
        self.courses.iter().find(|c| c.id == id)
    }

    /// Appends courses from a CSV export, skipping ids already in the
    /// catalog. Returns the number of newly added courses.
    pub fn import_csv(&mut self, csv_path: &Path) -> anyhow::Result<usize> {
        #[derive(serde::Deserialize)]
        struct CsvRow {
            id: String,
            title: String,
            department: String,
            credits: u32,
            #[serde(default)]
            description: String,
            #[serde(default)]
            keywords: String,
            difficulty: Option<i32>,
            #[serde(default)]
            prerequisites: String,
            #[serde(default)]
            gened: String,
            #[serde(default)]
            career_relevance: String,
            #[serde(default)]
            instructor: Option<String>,
        }

        let mut reader = csv::Reader::from_path(csv_path)?;
        let mut inserted = 0usize;

        for result in reader.deserialize::<CsvRow>() {
            let row = result?;
            if self.find(&row.id).is_some() {
                continue;
            }
            self.courses.push(Course {
                id: row.id,
                title: row.title,
                department: row.department,
                credits: row.credits,
                description: row.description,
                keywords: split_list(&row.keywords),
                difficulty: row.difficulty.unwrap_or(3),
                prerequisites: split_list(&row.prerequisites),
                gened: split_list(&row.gened),
                career_relevance: split_list(&row.career_relevance),
                instructor: row.instructor.filter(|s| !s.is_empty()),
                schedule: Vec::new(),
                average_gpa: None,
                syllabus: None,
                syllabus_topics: Vec::new(),
                syllabus_skills: Vec::new(),
            });
            inserted += 1;
        }

        Ok(inserted)
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

pub struct ProfileStore {
    profiles: Vec<StudentProfile>,
}

impl ProfileStore {
    pub fn new(profiles: Vec<StudentProfile>) -> Self {
        Self { profiles }
    }

    pub fn load(data_dir: &Path) -> anyhow::Result<Self> {
        let profiles = read_json(&data_dir.join(PROFILES_FILE))?;
        Ok(Self { profiles })
    }

    /// Looks up a student by id, falling back to the first profile for
    /// unknown ids. `None` only when the store holds no profiles at all.
    pub fn resolve(&self, student_id: &str) -> Option<&StudentProfile> {
        self.profiles
            .iter()
            .find(|p| p.id == student_id)
            .or_else(|| self.profiles.first())
    }
}

pub struct InstructorDirectory {
    instructors: Vec<Instructor>,
}

impl InstructorDirectory {
    pub fn new(instructors: Vec<Instructor>) -> Self {
        Self { instructors }
    }

    pub fn load(data_dir: &Path) -> anyhow::Result<Self> {
        let instructors = read_json(&data_dir.join(INSTRUCTORS_FILE))?;
        Ok(Self { instructors })
    }

    pub fn find(&self, instructor_id: &str) -> Option<&Instructor> {
        self.instructors.iter().find(|i| i.id == instructor_id)
    }
}

/// Writes a realistic sample data set covering several departments, a
/// syllabus-enriched course, and both rated and unrated instructors.
pub fn seed(data_dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("failed to create {}", data_dir.display()))?;

    write_json(&data_dir.join(COURSES_FILE), &seed_courses())?;
    write_json(&data_dir.join(PROFILES_FILE), &seed_profiles())?;
    write_json(&data_dir.join(INSTRUCTORS_FILE), &seed_instructors())?;
    Ok(())
}

fn strs(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn slot(days: &[&str], time: &str) -> TimeSlot {
    TimeSlot {
        days: strs(days),
        time: time.to_string(),
    }
}

fn course(
    id: &str,
    title: &str,
    department: &str,
    credits: u32,
    difficulty: i32,
    description: &str,
) -> Course {
    Course {
        id: id.to_string(),
        title: title.to_string(),
        department: department.to_string(),
        credits,
        description: description.to_string(),
        keywords: Vec::new(),
        difficulty,
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

fn seed_courses() -> Vec<Course> {
    let mut intro_cs = course(
        "CS101",
        "Introduction to Programming",
        "CS",
        3,
        2,
        "Fundamentals of programming and problem solving in Python.",
    );
    intro_cs.keywords = strs(&["programming", "coding", "python"]);
    intro_cs.career_relevance = strs(&["tech", "data science"]);
    intro_cs.instructor = Some("prof_chen".to_string());
    intro_cs.schedule = vec![slot(&["Mon", "Wed", "Fri"], "9:00-9:50")];
    intro_cs.average_gpa = Some(3.42);
    intro_cs.syllabus = Some(
        "Weekly lectures on control flow, functions, and collections, with lab \
         sessions building small programs from scratch. The final third of the \
         semester covers testing habits and a capstone project."
            .to_string(),
    );
    intro_cs.syllabus_topics = strs(&["control flow", "functions", "testing"]);
    intro_cs.syllabus_skills = strs(&["python", "problem solving"]);

    let mut databases = course(
        "CS320",
        "Database Systems",
        "CS",
        3,
        4,
        "Relational modeling, SQL, query optimization, and transactions.",
    );
    databases.keywords = strs(&["databases", "sql", "data"]);
    databases.prerequisites = strs(&["CS201"]);
    databases.career_relevance = strs(&["tech", "data science"]);
    databases.instructor = Some("prof_chen".to_string());
    databases.schedule = vec![slot(&["Tue", "Thu"], "11:00-12:15")];
    databases.average_gpa = Some(3.18);

    let mut micro = course(
        "ECON201",
        "Intermediate Microeconomics",
        "ECON",
        3,
        4,
        "Consumer theory, firm behavior, and market structure.",
    );
    micro.keywords = strs(&["economics", "markets"]);
    micro.prerequisites = strs(&["ECON101"]);
    micro.career_relevance = strs(&["banking", "consulting", "finance"]);
    micro.instructor = Some("prof_rivera".to_string());
    micro.schedule = vec![slot(&["Mon", "Wed"], "9:30-10:45")];
    micro.average_gpa = Some(3.05);

    let mut drawing = course(
        "ARTS110",
        "Foundations of Drawing",
        "ARTS",
        3,
        2,
        "Studio practice in observational drawing and composition.",
    );
    drawing.keywords = strs(&["drawing", "studio", "art"]);
    drawing.gened = strs(&["Artistic Interpretation"]);
    drawing.instructor = Some("prof_okafor".to_string());
    drawing.schedule = vec![slot(&["Tue", "Thu"], "14:00-15:15")];

    let mut speaking = course(
        "COMM230",
        "Public Speaking",
        "COMM",
        3,
        2,
        "Speech construction and delivery for professional settings.",
    );
    speaking.keywords = strs(&["speaking", "presentation", "communication"]);
    speaking.gened = strs(&["Second Writing"]);
    speaking.career_relevance = strs(&["consulting"]);
    speaking.instructor = Some("prof_okafor".to_string());
    speaking.schedule = vec![slot(&["Mon", "Wed", "Fri"], "10:00-10:50")];

    let mut ethics = course(
        "PHIL140",
        "Introduction to Ethics",
        "PHIL",
        3,
        3,
        "Classical and contemporary moral theory with weekly case studies.",
    );
    ethics.keywords = strs(&["ethics", "philosophy"]);
    ethics.gened = strs(&["Humanities"]);
    ethics.career_relevance = strs(&["grad school"]);
    ethics.schedule = vec![slot(&["Tue", "Thu"], "9:30-10:45")];

    let mut linear = course(
        "MATH210",
        "Linear Algebra",
        "MATH",
        4,
        4,
        "Vector spaces, linear maps, eigenvalues, and applications.",
    );
    linear.keywords = strs(&["math", "linear algebra", "proofs"]);
    linear.prerequisites = strs(&["MATH131"]);
    linear.career_relevance = strs(&["data science", "research"]);
    linear.instructor = Some("prof_novak".to_string());
    linear.schedule = vec![slot(&["Mon", "Wed", "Fri"], "13:00-13:50")];
    linear.average_gpa = Some(2.96);

    let mut venture = course(
        "CS410",
        "Software Ventures",
        "CS",
        3,
        3,
        "Taking a software product from prototype to first customers.",
    );
    venture.keywords = strs(&["startup", "entrepreneurship", "product"]);
    venture.prerequisites = strs(&["CS101"]);
    venture.career_relevance = strs(&["tech", "entrepreneurship"]);
    venture.instructor = Some("prof_chen".to_string());
    venture.schedule = vec![slot(&["Wed"], "15:00-17:30")];

    vec![
        intro_cs, databases, micro, drawing, speaking, ethics, linear, venture,
    ]
}

fn seed_profiles() -> Vec<StudentProfile> {
    vec![
        StudentProfile {
            id: "student_demo".to_string(),
            major: strs(&["CS"]),
            minor: strs(&["ECON"]),
            gpa: 3.5,
            completed_courses: strs(&["CS101", "ECON101"]),
            interests: strs(&["coding", "economics"]),
            career_goals: strs(&["tech"]),
            difficulty_preference: 3,
            gened_remaining: strs(&["Humanities", "Artistic Interpretation"]),
        },
        StudentProfile {
            id: "student_econ".to_string(),
            major: strs(&["ECON"]),
            minor: Vec::new(),
            gpa: 3.7,
            completed_courses: strs(&["ECON101", "MATH131"]),
            interests: strs(&["markets", "public policy"]),
            career_goals: strs(&["banking", "consulting"]),
            difficulty_preference: 4,
            gened_remaining: strs(&["Second Writing"]),
        },
    ]
}

fn seed_instructors() -> Vec<Instructor> {
    vec![
        Instructor {
            id: "prof_rivera".to_string(),
            name: "Elena Rivera".to_string(),
            rating: Some(4.8),
            background: "Former quantitative analyst at a trading desk".to_string(),
            teaching_style: "Lecture with weekly problem sets".to_string(),
            entrepreneurship: false,
        },
        Instructor {
            id: "prof_chen".to_string(),
            name: "Marcus Chen".to_string(),
            rating: Some(4.6),
            background: "Founded two developer-tools startups".to_string(),
            teaching_style: "Project-based studio".to_string(),
            entrepreneurship: true,
        },
        Instructor {
            id: "prof_okafor".to_string(),
            name: "Adaeze Okafor".to_string(),
            rating: Some(4.2),
            background: "Documentary producer and speech coach".to_string(),
            teaching_style: "Discussion seminars".to_string(),
            entrepreneurship: false,
        },
        Instructor {
            id: "prof_novak".to_string(),
            name: "Petra Novak".to_string(),
            rating: None,
            background: "Joined the department this year".to_string(),
            teaching_style: String::new(),
            entrepreneurship: false,
        },
    ]
}
