use crate::models::{Employee, Pharmacy};

/// A signed-in employee: bearer token plus the employee and pharmacy records.
///
/// A `Session` is always complete. The unauthenticated state is the absence
/// of one (`Option<Session>`), never a partially filled value.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    token: String,
    employee: Employee,
    pharmacy: Pharmacy,
}

impl Session {
    /// Returns `None` for an empty token.
    pub fn new(token: String, employee: Employee, pharmacy: Pharmacy) -> Option<Self> {
        if token.is_empty() {
            return None;
        }
        Some(Self {
            token,
            employee,
            pharmacy,
        })
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn employee(&self) -> &Employee {
        &self.employee
    }

    pub fn pharmacy(&self) -> &Pharmacy {
        &self.pharmacy
    }
}

/// What UI consumers read: the employee and pharmacy, both absent when
/// nobody is signed in. Callers must not assume either is present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurrentSession {
    pub employee: Option<Employee>,
    pub pharmacy: Option<Pharmacy>,
}

impl CurrentSession {
    pub fn is_authenticated(&self) -> bool {
        self.employee.is_some() && self.pharmacy.is_some()
    }
}

impl From<Option<&Session>> for CurrentSession {
    fn from(session: Option<&Session>) -> Self {
        match session {
            Some(s) => Self {
                employee: Some(s.employee.clone()),
                pharmacy: Some(s.pharmacy.clone()),
            },
            None => Self::default(),
        }
    }
}
