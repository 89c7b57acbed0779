use std::collections::HashMap;

const DEFAULT_ROLE: &str = "Technical Interviewer";

/// Interviewer persona per domain
#[derive(Debug, Clone)]
pub struct InterviewerRoles {
    roles: HashMap<String, String>,
}

impl Default for InterviewerRoles {
    fn default() -> Self {
        let roles = [
            ("JavaScript", "Senior JavaScript Developer at Google"),
            ("Python", "Python Tech Lead at a AI startup"),
            ("React", "React Core Team Member"),
            ("Node.js", "Backend Architect at Netflix"),
            ("AI/ML", "Machine Learning Research Scientist"),
            ("DevOps", "Site Reliability Engineer at AWS"),
            ("Cybersecurity", "Security Engineer on a red team"),
        ]
        .into_iter()
        .map(|(domain, role)| (domain.to_string(), role.to_string()))
        .collect();

        Self { roles }
    }
}

impl InterviewerRoles {
    /// Register or replace the persona for a domain
    pub fn with_role(mut self, domain: impl Into<String>, role: impl Into<String>) -> Self {
        self.roles.insert(domain.into(), role.into());
        self
    }

    pub fn role_for(&self, domain: &str) -> &str {
        self.roles
            .get(domain)
            .map(String::as_str)
            .unwrap_or(DEFAULT_ROLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_and_default_roles() {
        let roles = InterviewerRoles::default();
        assert_eq!(roles.role_for("DevOps"), "Site Reliability Engineer at AWS");
        assert_eq!(roles.role_for("Haskell"), "Technical Interviewer");
    }

    #[test]
    fn test_custom_role_overrides() {
        let roles = InterviewerRoles::default().with_role("React", "Frontend Lead");
        assert_eq!(roles.role_for("React"), "Frontend Lead");
    }
}
