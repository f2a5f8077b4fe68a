use serde::{Deserialize, Serialize};

use crate::models::job::{EmploymentType, Job, RemoteType};
use crate::search::SearchError;

/// Caller-supplied search parameters. Empty id lists and `None` mean "no filter".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchFilters {
    pub disability_ids: Vec<i64>,
    pub skill_ids: Vec<i64>,
    pub employment_type: Option<EmploymentType>,
    pub remote_type: Option<RemoteType>,
    pub query: Option<String>,
}

impl SearchFilters {
    /// The query, trimmed, when it has any content.
    pub fn query_text(&self) -> Option<&str> {
        self.query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
    }

    /// Resolves the structural part of the filters. `skill_names` are the names
    /// storage found for `skill_ids`.
    pub fn structural(&self, skill_names: Vec<String>) -> StructuralFilters {
        StructuralFilters {
            disability_ids: self.disability_ids.clone(),
            skill_ids: self.skill_ids.clone(),
            skill_names: skill_names
                .into_iter()
                .map(|n| n.trim().to_lowercase())
                .filter(|n| !n.is_empty())
                .collect(),
            employment_type: self.employment_type,
            remote_type: self.remote_type,
        }
    }

    /// Rejects ids that can never name a stored row.
    pub fn validate_ids(&self) -> Result<(), SearchError> {
        for (kind, ids) in [("disability", &self.disability_ids), ("skill", &self.skill_ids)] {
            if let Some(bad) = ids.iter().find(|&&id| id <= 0) {
                return Err(SearchError::InvalidInput(format!("Invalid {kind} ID: {bad}")));
            }
        }
        Ok(())
    }
}

/// Structural predicates applied before scoring, both by storage and again in memory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructuralFilters {
    pub disability_ids: Vec<i64>,
    pub skill_ids: Vec<i64>,
    /// Lowercase skill names resolved from `skill_ids`.
    pub skill_names: Vec<String>,
    pub employment_type: Option<EmploymentType>,
    pub remote_type: Option<RemoteType>,
}

impl StructuralFilters {
    /// True when at least one filter carries a real selection.
    ///
    /// Skill ids count even when none resolved to a name.
    pub fn is_active(&self) -> bool {
        !self.disability_ids.is_empty()
            || !self.skill_ids.is_empty()
            || self.employment_type.is_some()
            || self.remote_type.is_some()
    }

    /// Whether `job` passes every structural predicate.
    pub fn admits(&self, job: &Job) -> bool {
        if !self.disability_ids.is_empty()
            && !job
                .disability_support
                .iter()
                .any(|d| self.disability_ids.contains(&d.id))
        {
            return false;
        }

        if !self.skill_names.is_empty()
            && !job.requirements.iter().any(|req| {
                let req = req.to_lowercase();
                self.skill_names.iter().any(|name| req.contains(name.as_str()))
            })
        {
            return false;
        }

        if self.employment_type.is_some_and(|t| t != job.employment_type) {
            return false;
        }

        if self.remote_type.is_some_and(|t| t != job.remote_type) {
            return false;
        }

        true
    }
}

/// Coarse query pre-filter: some keyword appears in the title, the description
/// or any requirement. Without keywords, the raw query must appear in the title
/// or description.
pub fn matches_query(job: &Job, keywords: &[String], raw_query: &str) -> bool {
    let title = job.title.to_lowercase();
    let description = job.description.to_lowercase();

    if keywords.is_empty() {
        let needle = raw_query.trim().to_lowercase();
        return title.contains(&needle) || description.contains(&needle);
    }

    let requirements: Vec<String> = job.requirements.iter().map(|r| r.to_lowercase()).collect();

    keywords.iter().any(|kw| {
        title.contains(kw.as_str())
            || description.contains(kw.as_str())
            || requirements.iter().any(|r| r.contains(kw.as_str()))
    })
}

/// Parses a filter value where blank or "all" means no filter.
pub fn parse_optional<T>(raw: Option<&str>, field: &str) -> Result<Option<T>, SearchError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw.map(str::trim) {
        None => Ok(None),
        Some(v) if v.is_empty() || v.eq_ignore_ascii_case("all") => Ok(None),
        Some(v) => v
            .parse::<T>()
            .map(Some)
            .map_err(|e| SearchError::InvalidInput(format!("Invalid {field}: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::job::Disability;

    fn job() -> Job {
        Job {
            id: 1,
            title: "Data Entry Clerk".to_string(),
            description: "Enter records into our CRM".to_string(),
            employment_type: EmploymentType::PartTime,
            remote_type: RemoteType::Remote,
            company: None,
            location: None,
            requirements: vec!["Excel proficiency".to_string(), "Typing 40 wpm".to_string()],
            disability_support: vec![Disability {
                id: 7,
                name: "Mobility Impairment".to_string(),
            }],
            posted_at: None,
        }
    }

    #[test]
    fn test_default_filters_are_inactive_and_admit_everything() {
        let f = SearchFilters::default().structural(vec![]);
        assert!(!f.is_active());
        assert!(f.admits(&job()));
    }

    #[test]
    fn test_unresolved_skill_ids_still_count_as_active() {
        let filters = SearchFilters {
            skill_ids: vec![99],
            ..Default::default()
        };
        let f = filters.structural(vec![]);
        assert!(f.is_active());
        assert!(f.admits(&job()), "no names resolved → no skill predicate");
    }

    #[test]
    fn test_disability_id_membership() {
        let mut f = StructuralFilters {
            disability_ids: vec![7, 8],
            ..Default::default()
        };
        assert!(f.admits(&job()));
        f.disability_ids = vec![8];
        assert!(!f.admits(&job()));
    }

    #[test]
    fn test_skill_name_substring_in_requirements() {
        let filters = SearchFilters {
            skill_ids: vec![3],
            ..Default::default()
        };
        assert!(filters.structural(vec!["EXCEL".to_string()]).admits(&job()));
        assert!(!filters.structural(vec!["python".to_string()]).admits(&job()));
    }

    #[test]
    fn test_type_equality_filters() {
        let f = StructuralFilters {
            employment_type: Some(EmploymentType::PartTime),
            remote_type: Some(RemoteType::Remote),
            ..Default::default()
        };
        assert!(f.admits(&job()));

        let f = StructuralFilters {
            remote_type: Some(RemoteType::OnSite),
            ..Default::default()
        };
        assert!(!f.admits(&job()));
    }

    #[test]
    fn test_query_text_ignores_blank() {
        let filters = SearchFilters {
            query: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(filters.query_text(), None);
    }

    #[test]
    fn test_matches_query_checks_all_three_fields() {
        let j = job();
        assert!(matches_query(&j, &["clerk".to_string()], "clerk"));
        assert!(matches_query(&j, &["crm".to_string()], "crm"));
        assert!(matches_query(&j, &["typing".to_string()], "typing"));
        assert!(!matches_query(&j, &["python".to_string()], "python"));
    }

    #[test]
    fn test_matches_query_without_keywords_uses_raw_query() {
        let j = job();
        assert!(matches_query(&j, &[], " Data Entry "));
        assert!(!matches_query(&j, &[], "the"));
    }

    #[test]
    fn test_parse_optional_treats_all_as_absent() {
        assert_eq!(
            parse_optional::<EmploymentType>(Some("All"), "employment type").unwrap(),
            None
        );
        assert_eq!(
            parse_optional::<EmploymentType>(Some(""), "employment type").unwrap(),
            None
        );
        assert_eq!(
            parse_optional::<RemoteType>(Some("hybrid"), "remote type").unwrap(),
            Some(RemoteType::Hybrid)
        );
        assert!(parse_optional::<RemoteType>(Some("moon"), "remote type").is_err());
    }

    #[test]
    fn test_non_positive_ids_rejected() {
        let filters = SearchFilters {
            disability_ids: vec![1, 0],
            ..Default::default()
        };
        assert!(filters.validate_ids().is_err());
        assert!(SearchFilters::default().validate_ids().is_ok());
    }
}
