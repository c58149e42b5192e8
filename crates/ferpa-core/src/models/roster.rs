use serde::{Deserialize, Serialize};

/// A single student in a class roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub student_id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub preferred_name: Option<String>,
}

impl RosterEntry {
    pub fn new(
        student_id: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            student_id: student_id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            preferred_name: None,
        }
    }

    pub fn with_preferred_name(mut self, preferred_name: impl Into<String>) -> Self {
        self.preferred_name = Some(preferred_name.into());
        self
    }

    /// The canonical identity every variant of this student resolves to.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn display_name(&self) -> String {
        match &self.preferred_name {
            Some(preferred) => format!("{preferred} {}", self.last_name),
            None => self.full_name(),
        }
    }

    /// Every way the roster itself says this student may be written.
    pub fn all_name_variants(&self) -> Vec<String> {
        let mut variants = vec![
            self.full_name(),
            self.first_name.clone(),
            self.last_name.clone(),
            format!("{}, {}", self.last_name, self.first_name),
        ];
        if let Some(preferred) = &self.preferred_name {
            variants.push(preferred.clone());
            variants.push(format!("{preferred} {}", self.last_name));
        }
        variants
    }
}

/// The roster for one class.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassRoster {
    pub class_id: String,
    pub class_name: String,
    pub teacher_name: String,
    pub term: String,
    #[serde(default)]
    pub students: Vec<RosterEntry>,
}

impl ClassRoster {
    /// All roster-provided name variants across every student.
    pub fn all_names(&self) -> Vec<String> {
        self.students
            .iter()
            .flat_map(RosterEntry::all_name_variants)
            .collect()
    }

    /// Find a student by any of their roster variants (case-insensitive).
    pub fn find_student(&self, name: &str) -> Option<&RosterEntry> {
        let needle = name.trim().to_lowercase();
        self.students.iter().find(|s| {
            s.all_name_variants()
                .iter()
                .any(|v| v.to_lowercase() == needle)
        })
    }
}
