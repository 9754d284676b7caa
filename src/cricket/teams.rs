//! Closed vocabularies for the categorical model inputs.
//!
//! The trained models only know the teams and host cities they were fitted
//! on, so both are validated here before anything reaches a model.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// ODI sides covered by the trained models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Team {
    India,
    Pakistan,
    Australia,
    England,
    #[serde(rename = "South Africa")]
    SouthAfrica,
    #[serde(rename = "Sri Lanka")]
    SriLanka,
    Bangladesh,
    Afghanistan,
    Netherlands,
    #[serde(rename = "West Indies")]
    WestIndies,
    #[serde(rename = "New Zealand")]
    NewZealand,
}

impl Team {
    /// All teams in form display order.
    pub const ALL: [Team; 11] = [
        Team::India,
        Team::Pakistan,
        Team::Australia,
        Team::England,
        Team::SouthAfrica,
        Team::SriLanka,
        Team::Bangladesh,
        Team::Afghanistan,
        Team::Netherlands,
        Team::WestIndies,
        Team::NewZealand,
    ];

    /// Name as it appears in the training data and the stats tables.
    pub fn name(&self) -> &'static str {
        match self {
            Team::India => "India",
            Team::Pakistan => "Pakistan",
            Team::Australia => "Australia",
            Team::England => "England",
            Team::SouthAfrica => "South Africa",
            Team::SriLanka => "Sri Lanka",
            Team::Bangladesh => "Bangladesh",
            Team::Afghanistan => "Afghanistan",
            Team::Netherlands => "Netherlands",
            Team::WestIndies => "West Indies",
            Team::NewZealand => "New Zealand",
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownName(pub String);

impl FromStr for Team {
    type Err = UnknownName;

    /// Exact, case-sensitive match on [`Team::name`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Team::ALL
            .iter()
            .copied()
            .find(|t| t.name() == s)
            .ok_or_else(|| UnknownName(s.to_string()))
    }
}

/// Host cities seen in the training data. Duplicates are tolerated here;
/// [`Venue::all`] hands out the de-duplicated, sorted list.
const VENUE_NAMES: &[&str] = &[
    "Dhaka", "Chandigarh", "Colombo", "Johannesburg", "London", "Centurion",
    "Potchefstroom", "Southampton", "Bloemfontein", "Cardiff", "Lahore", "Kandy",
    "Hambantota", "Chattogram", "Harare", "Bulawayo", "Karachi", "Rawalpindi",
    "Benoni", "Hamilton", "Auckland", "Chennai", "Visakhapatnam", "Mumbai",
    "Kimberley", "Indore", "Raipur", "Hyderabad", "Thiruvananthapuram", "Kolkata",
    "Guwahati", "Sydney", "Adelaide", "Delhi", "Ranchi", "Lucknow", "Cairns",
    "Rotterdam", "Manchester", "Chester-le-Street", "Amstelveen", "Mount Maunganui",
    "Doha", "Cape Town", "Paarl", "Birmingham", "Pune", "Wellington", "Christchurch",
    "Dunedin", "Canberra", "Bengaluru", "Rajkot", "Leeds", "Nottingham", "Taunton",
    "Bristol", "Dubai", "Abu Dhabi", "Sharjah", "Port Elizabeth", "Nagpur", "Napier",
    "Durban", "Melbourne", "Nelson", "Hobart", "Brisbane", "Dharamsala", "Kanpur",
    "East London", "Dublin", "Cuttack", "Perth", "Chittagong", "Mirpur", "St Kitts",
    "Guyana", "Ahmedabad", "Fatullah", "Bangalore", "Jaipur", "Trinidad", "Jamaica",
    "Kochi", "Vadodara", "Gwalior", "Darwin", "Faisalabad", "Belfast", "St Lucia",
    "Grenada", "Barbados", "Antigua", "Margao", "Kuala Lumpur", "Jamshedpur",
    "Faridabad", "Bogra", "Queenstown", "Canterbury", "Dambulla", "Peshawar",
    "Multan", "Gqeberha", "Port Moresby", "Lauderhill", "Bermuda", "St Vincent",
    "St Lucia", "Bridgetown", "Kingston", "Grenada", "Antigua", "Guyana",
];

/// A validated host city.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Venue(&'static str);

impl Venue {
    pub fn name(&self) -> &'static str {
        self.0
    }

    /// Sorted, de-duplicated venues for the forms.
    pub fn all() -> Vec<Venue> {
        let mut names: Vec<&'static str> = VENUE_NAMES.to_vec();
        names.sort_unstable();
        names.dedup();
        names.into_iter().map(Venue).collect()
    }
}

impl fmt::Display for Venue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl FromStr for Venue {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VENUE_NAMES
            .iter()
            .copied()
            .find(|v| *v == s)
            .map(Venue)
            .ok_or_else(|| UnknownName(s.to_string()))
    }
}
