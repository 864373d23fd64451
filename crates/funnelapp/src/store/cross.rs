use super::RecordProvider;
use crate::error::Result;
use crate::model::Record;

const SAMPLE_NAMES: [&str; 4] = ["David", "Joe", "Bob", "Kevin"];
const SAMPLE_ROLES: [&str; 4] = ["User", "Admin", "Guest", "Supervisor"];
const SAMPLE_APPS: [&str; 4] = ["Diablo", "Horizons", "Pac-Man", "Frogger"];

/// Produces one record per (name, role, application) combination, name-major.
#[derive(Debug, Clone, Default)]
pub struct CrossProductProvider {
    pub names: Vec<String>,
    pub roles: Vec<String>,
    pub apps: Vec<String>,
}

impl CrossProductProvider {
    pub fn new<N, R, A>(names: N, roles: R, apps: A) -> Self
    where
        N: IntoIterator,
        N::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
        A: IntoIterator,
        A::Item: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            roles: roles.into_iter().map(Into::into).collect(),
            apps: apps.into_iter().map(Into::into).collect(),
        }
    }

    /// The demo data set: four names, four roles, four applications.
    pub fn sample() -> Self {
        Self::new(SAMPLE_NAMES, SAMPLE_ROLES, SAMPLE_APPS)
    }
}

impl RecordProvider for CrossProductProvider {
    fn load(&self) -> Result<Vec<Record>> {
        let mut records =
            Vec::with_capacity(self.names.len() * self.roles.len() * self.apps.len());
        for name in &self.names {
            for role in &self.roles {
                for app in &self.apps {
                    records.push(Record::new(name.as_str(), role.as_str(), app.as_str()));
                }
            }
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_is_name_major() {
        let provider = CrossProductProvider::new(["A", "B"], ["r"], ["x", "y"]);
        let records = provider.load().unwrap();
        assert_eq!(
            records,
            vec![
                Record::new("A", "r", "x"),
                Record::new("A", "r", "y"),
                Record::new("B", "r", "x"),
                Record::new("B", "r", "y"),
            ]
        );
    }

    #[test]
    fn test_empty_axis_yields_no_records() {
        let provider = CrossProductProvider::new(["A"], Vec::<String>::new(), ["x"]);
        assert!(provider.load().unwrap().is_empty());
    }

    #[test]
    fn test_sample_covers_every_combination() {
        let records = CrossProductProvider::sample().load().unwrap();
        assert_eq!(records.len(), 64);
        assert_eq!(records[0], Record::new("David", "User", "Diablo"));
        assert_eq!(records[63], Record::new("Kevin", "Supervisor", "Frogger"));
    }
}
