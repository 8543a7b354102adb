use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::{normalize, Child, Error, Location};

/// One textual spelling of a team name as it appears in a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSpelling {
    pub spelling: String,
    pub child: Child,
}

/// Read-only lookup tables for teams and venues.
///
/// Spellings and location codes are stored compacted and upper-cased, and
/// ordered longest first so a short entry can never shadow a longer one
/// that contains it. Entries of equal length keep their input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry {
    teams: Vec<TeamSpelling>,
    team_codes: BTreeMap<Child, String>,
    locations: Vec<Location>,
}

#[derive(Deserialize)]
struct RawRegistry {
    teams: Vec<TeamSpelling>,
    team_codes: BTreeMap<Child, String>,
    locations: Vec<Location>,
}

impl Registry {
    pub fn new(
        teams: Vec<TeamSpelling>,
        team_codes: BTreeMap<Child, String>,
        locations: Vec<Location>,
    ) -> Result<Self, Error> {
        let registry = Registry::build(teams, team_codes, locations);
        registry.validate()?;
        Ok(registry)
    }

    pub fn from_json(json: &str) -> Result<Self, Error> {
        let raw: RawRegistry = serde_json::from_str(json)?;
        Registry::new(raw.teams, raw.team_codes, raw.locations)
    }

    fn build(
        teams: Vec<TeamSpelling>,
        team_codes: BTreeMap<Child, String>,
        locations: Vec<Location>,
    ) -> Self {
        let mut teams: Vec<TeamSpelling> = teams
            .into_iter()
            .map(|team| TeamSpelling {
                spelling: key(&team.spelling),
                child: team.child,
            })
            .collect();
        teams.sort_by_key(|team| std::cmp::Reverse(team.spelling.len()));

        let mut locations: Vec<Location> = locations
            .into_iter()
            .map(|location| Location {
                code: key(&location.code),
                ..location
            })
            .collect();
        locations.sort_by_key(|location| std::cmp::Reverse(location.code.len()));

        Registry {
            teams,
            team_codes,
            locations,
        }
    }

    fn validate(&self) -> Result<(), Error> {
        if let Some(team) = self.teams.iter().find(|team| team.spelling.is_empty()) {
            return Err(Error::InvalidRegistry(format!(
                "empty team spelling for {}",
                team.child
            )));
        }

        for team in &self.teams {
            if !self.team_codes.contains_key(&team.child) {
                return Err(Error::InvalidRegistry(format!(
                    "{} has a team spelling but no team code",
                    team.child
                )));
            }
        }

        let mut seen = BTreeSet::new();
        for location in &self.locations {
            if location.code.is_empty() {
                return Err(Error::InvalidRegistry(format!(
                    "empty location code for {}",
                    location.name
                )));
            }
            if !seen.insert(location.code.as_str()) {
                return Err(Error::InvalidRegistry(format!(
                    "duplicate location code {}",
                    location.code
                )));
            }
        }

        Ok(())
    }

    /// Team spellings, longest first.
    pub fn teams(&self) -> &[TeamSpelling] {
        &self.teams
    }

    /// Locations, longest code first.
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn team_code(&self, child: Child) -> Option<&str> {
        self.team_codes.get(&child).map(String::as_str)
    }

    /// Exact lookup by code, ignoring case and whitespace.
    pub fn location(&self, code: &str) -> Option<&Location> {
        let code = key(code);
        self.locations.iter().find(|location| location.code == code)
    }
}

fn key(text: &str) -> String {
    normalize::compact(text).to_ascii_uppercase()
}

impl Default for Registry {
    fn default() -> Self {
        let teams = [
            ("JUN2", Child::Nastya),
            ("JUNIOR2", Child::Nastya),
            ("JR2", Child::Nastya),
            ("JUN1R", Child::Liza),
            ("JUN1RED", Child::Liza),
            ("JUNIOR1RED", Child::Liza),
            ("JR1R", Child::Liza),
            ("JUN1B", Child::Sonya),
            ("JUN1BLACK", Child::Sonya),
            ("JUNIOR1BLACK", Child::Sonya),
            ("JR1B", Child::Sonya),
        ]
        .into_iter()
        .map(|(spelling, child)| TeamSpelling {
            spelling: spelling.to_string(),
            child,
        })
        .collect();

        let team_codes = BTreeMap::from([
            (Child::Nastya, "JUN2".to_string()),
            (Child::Liza, "JUN1R".to_string()),
            (Child::Sonya, "JUN1B".to_string()),
        ]);

        let locations = [
            (
                "MICC",
                "Mercer Island Country Club",
                "8700 SE 71st St, Mercer Island, WA 98040",
            ),
            (
                "MIBC",
                "Mercer Island Beach Club",
                "8326 Avalon Dr, Mercer Island, WA 98040",
            ),
            (
                "BAC",
                "Bellevue Aquatic Center",
                "601 143rd Ave NE, Bellevue, WA 98007",
            ),
            (
                "MW",
                "Mary Wayte Swimming Pool",
                "8815 SE 40th St, Mercer Island, WA 98040",
            ),
        ]
        .into_iter()
        .map(|(code, name, address)| Location {
            code: code.to_string(),
            name: name.to_string(),
            address: address.to_string(),
        })
        .collect();

        Registry::build(teams, team_codes, locations)
    }
}
